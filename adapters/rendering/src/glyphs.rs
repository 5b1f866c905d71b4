//! Static ASCII art for every building kind.
//!
//! Frames are authored with a compact token alphabet so the table stays
//! readable in source. [`map_glyph`] expands the tokens into box-drawing
//! characters when a backend draws them.

use ascii_city_core::{BuildingKind, VisualState};

/// One animation frame: a row of text per footprint row.
pub type Frame = &'static [&'static str];

const SMALL_HOUSE: &[Frame] = &[
    &["<--->", "|X  |", "|  X|", "[---]"],
    &["<--->", "|X  |", "|   |", "[---]"],
    &["<--->", "|   |", "|  X|", "[---]"],
];

const SMALL_HOUSE_ABANDONED: Frame = &["<- ->", "|   /", "| . |", "[-  ]"];

const HOUSE: &[Frame] = &[
    &["<----->", "|X X X|", "|     |", "|X X X|", "[-----]"],
    &["<----->", "|X   X|", "|     |", "|  X  |", "[-----]"],
    &["<----->", "|  X  |", "|     |", "|X   X|", "[-----]"],
];

const HOUSE_ABANDONED: Frame = &["<-- -->", "|  /  |", "|     |", "| .  \\|", "[--  -]"];

const SHOP: &[Frame] = &[
    &["<--->", "|$ $|", "[---]"],
    &["<--->", "| $ |", "[---]"],
];

const FACTORY: &[Frame] = &[
    &["|| ~  ", "||    ", "|----|", "|    |", "[----]"],
    &["||  ~ ", "|| ~  ", "|----|", "|    |", "[----]"],
    &["||   ~", "||  ~ ", "|----|", "|    |", "[----]"],
];

const BIG_FACTORY: &[Frame] = &[
    &[
        "|| ||  ~ ",
        "|| ||    ",
        "|-------|",
        "| XX XX |",
        "|       |",
        "[-------]",
    ],
    &[
        "|| ||~  ~",
        "|| ||  ~ ",
        "|-------|",
        "| XX XX |",
        "|       |",
        "[-------]",
    ],
    &[
        "|| ||  ~~",
        "|| ||~   ",
        "|-------|",
        "| XX XX |",
        "|       |",
        "[-------]",
    ],
];

const OFFICE: &[Frame] = &[
    &["<--->", "|X X|", "| X |", "|X X|", "| X |", "[---]"],
    &["<--->", "| X |", "|X X|", "| X |", "|X X|", "[---]"],
];

/// Animation frames for a building kind, in playback order.
#[must_use]
pub fn frames(kind: BuildingKind) -> &'static [Frame] {
    match kind {
        BuildingKind::SmallHouse => SMALL_HOUSE,
        BuildingKind::House => HOUSE,
        BuildingKind::Shop => SHOP,
        BuildingKind::Factory => FACTORY,
        BuildingKind::BigFactory => BIG_FACTORY,
        BuildingKind::Office => OFFICE,
    }
}

/// Frame shown for a building in the given visual state.
///
/// Frame indices wrap, and an abandoned state on a kind without ruined art
/// falls back to its first frame.
#[must_use]
pub fn frame(kind: BuildingKind, visual: VisualState) -> Frame {
    let frames = frames(kind);
    match (kind, visual) {
        (BuildingKind::SmallHouse, VisualState::Abandoned) => SMALL_HOUSE_ABANDONED,
        (BuildingKind::House, VisualState::Abandoned) => HOUSE_ABANDONED,
        (_, VisualState::Abandoned) => frames[0],
        (_, VisualState::Frame(index)) => frames[usize::from(index) % frames.len()],
    }
}

/// Expands an art token into the character drawn on screen.
#[must_use]
pub const fn map_glyph(token: char) -> char {
    match token {
        '<' => '┌',
        '>' => '┐',
        '[' => '└',
        ']' => '┘',
        '|' => '│',
        '-' => '─',
        'X' => '▒',
        other => other,
    }
}
