#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for turning player input into placement commands.

use ascii_city_core::{BuildingKind, Command, Direction, Event, PendingSnapshot};

/// Discrete action decoded from a single input character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Nudges the pending building.
    Move(Direction),
    /// Selects a catalog entry for placement.
    Select(BuildingKind),
    /// Commits the pending building.
    Commit,
    /// Leaves the session.
    Quit,
}

impl PlayerAction {
    /// Decodes an input character, returning `None` for unrecognised tokens.
    ///
    /// Digits select [`BuildingKind::CATALOG`] entries in order.
    #[must_use]
    pub fn from_char(token: char) -> Option<Self> {
        let action = match token.to_ascii_lowercase() {
            'w' => Self::Move(Direction::North),
            'a' => Self::Move(Direction::West),
            's' => Self::Move(Direction::South),
            'd' => Self::Move(Direction::East),
            'p' => Self::Commit,
            'q' => Self::Quit,
            digit @ '1'..='9' => Self::Select(BuildingKind::from_selection_token(digit)?),
            _ => return None,
        };
        Some(action)
    }
}

/// Builder system that translates player actions into world commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    finished: bool,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { finished: false }
    }

    /// Consumes world events and the frame's action to emit builder commands.
    ///
    /// Commits are only forwarded when `pending` reports a legal position;
    /// funds are judged by the world. Nothing is emitted once the city is
    /// empty. [`PlayerAction::Quit`] is left to the adapter.
    pub fn handle(
        &mut self,
        events: &[Event],
        action: Option<PlayerAction>,
        pending: Option<PendingSnapshot>,
        out: &mut Vec<Command>,
    ) {
        if events
            .iter()
            .any(|event| matches!(event, Event::CityAbandoned))
        {
            self.finished = true;
        }

        if self.finished {
            return;
        }

        match action {
            Some(PlayerAction::Select(kind)) => out.push(Command::SelectBuilding { kind }),
            Some(PlayerAction::Move(direction)) => {
                if pending.is_some() {
                    out.push(Command::MovePending { direction });
                }
            }
            Some(PlayerAction::Commit) => {
                if pending.is_some_and(|pending| pending.is_legal()) {
                    out.push(Command::Build);
                }
            }
            Some(PlayerAction::Quit) | None => {}
        }
    }
}
