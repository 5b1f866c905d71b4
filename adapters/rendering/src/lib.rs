#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for ascii-city adapters.

pub mod glyphs;

use std::time::Duration;

use anyhow::Result as AnyResult;
use ascii_city_core::{
    BuildingKind, BuildingSnapshot, BuildingView, EconomySnapshot, GameStatus, PendingSnapshot,
};
use thiserror::Error;

/// Number of terminal rows reserved below the map for the status readout.
pub const HUD_ROWS: u32 = 3;

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Character read from the keyboard during the frame, if any.
    pub key: Option<char>,
}

impl FrameInput {
    /// Creates an input snapshot carrying a single key press.
    #[must_use]
    pub const fn key(key: char) -> Self {
        Self { key: Some(key) }
    }
}

/// Verdict returned by the scene update closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Tear down the backend and return.
    Quit,
}

/// Dimensions of the playable map in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapPresentation {
    /// Number of columns in the map.
    pub columns: u32,
    /// Number of rows in the map.
    pub rows: u32,
}

impl MapPresentation {
    /// Creates a map descriptor, rejecting degenerate sizes.
    pub fn new(columns: u32, rows: u32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyMap { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Map size that fits a terminal of the given dimensions below the HUD.
    pub fn fit_terminal(columns: u16, rows: u16) -> Result<Self, RenderingError> {
        Self::new(
            u32::from(columns),
            u32::from(rows).saturating_sub(HUD_ROWS),
        )
    }
}

/// Catalog line shown in the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Key that selects the entry.
    pub token: char,
    /// Kind of building offered.
    pub kind: BuildingKind,
    /// Construction price.
    pub price: u32,
    /// Whether the treasury currently covers the price.
    pub affordable: bool,
}

impl CatalogEntry {
    /// Lists every buildable kind with its affordability under `economy`.
    #[must_use]
    pub fn listing(economy: &EconomySnapshot) -> Vec<Self> {
        BuildingKind::CATALOG
            .into_iter()
            .filter_map(|kind| {
                let price = kind.price()?;
                Some(Self {
                    token: kind.selection_token()?,
                    kind,
                    price,
                    affordable: economy.can_afford(price),
                })
            })
            .collect()
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the playable map.
    pub map: MapPresentation,
    /// Placed buildings in registry order.
    pub buildings: Vec<BuildingSnapshot>,
    /// Aggregate economy counters.
    pub economy: EconomySnapshot,
    /// Buildable kinds shown in the HUD.
    pub catalog: Vec<CatalogEntry>,
    /// Building the player is positioning, if any.
    pub pending: Option<PendingSnapshot>,
    /// Whether the session is still running.
    pub status: GameStatus,
}

impl Scene {
    /// Creates a new scene descriptor from world snapshots.
    #[must_use]
    pub fn new(
        map: MapPresentation,
        buildings: BuildingView,
        economy: EconomySnapshot,
        pending: Option<PendingSnapshot>,
        status: GameStatus,
    ) -> Self {
        Self {
            map,
            buildings: buildings.into_vec(),
            catalog: CatalogEntry::listing(&economy),
            economy,
            pending,
            status,
        }
    }

    /// Reports whether the win screen should be shown.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Banner shown in the status bar next to the key help.
    pub banner: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(banner: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            banner: banner.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting ascii-city scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until `update_scene` asks it to stop.
    ///
    /// The closure receives the wall-clock delta since the previous frame and
    /// the input captured during it, and may mutate the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The map must hold at least one cell.
    #[error("map must be at least 1x1 cells (received {columns}x{rows})")]
    EmptyMap {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}
