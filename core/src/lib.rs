#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the ascii-city engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to ascii-city. Drive everyone out.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reports that wall-clock time elapsed since the previous frame.
    Tick {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Runs one discrete simulation step over every placed building.
    Simulate,
    /// Selects a building kind for placement, toggling the pending slot.
    SelectBuilding {
        /// Kind of building the player wants to position.
        kind: BuildingKind,
    },
    /// Nudges the pending building by a single cell.
    MovePending {
        /// Direction of travel for the pending building.
        direction: Direction,
    },
    /// Commits the pending building into the registry.
    Build,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the real-time clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that a simulation step finished.
    Simulated {
        /// Sequence number of the completed step, starting at one.
        step: u64,
        /// Economy state captured after the step.
        economy: EconomySnapshot,
    },
    /// Announces that an office contributed its one-time production boost.
    ProductionBoosted {
        /// Office that granted the boost.
        building: BuildingId,
        /// Aggregate production boost after the contribution.
        boost: f64,
    },
    /// Announces that a house was permanently abandoned.
    HouseAbandoned {
        /// House that lost its residents.
        building: BuildingId,
        /// Number of residents removed from the population.
        residents: u32,
    },
    /// Announces that the last resident left and the game is won.
    CityAbandoned,
    /// Reports that the pending slot changed kind, position, or emptied.
    PendingChanged {
        /// Pending building after the change, if any.
        pending: Option<PendingSnapshot>,
    },
    /// Confirms that a building was placed into the registry.
    BuildingPlaced {
        /// Identifier assigned to the building by the world.
        building: BuildingId,
        /// Kind of building that was placed.
        kind: BuildingKind,
        /// Region of cells occupied by the building.
        region: CellRect,
        /// Cash deducted for the construction.
        price: u32,
    },
    /// Reports that a build request was rejected.
    BuildRejected {
        /// Specific reason the build failed.
        reason: BuildError,
    },
}

/// Cardinal movement directions available to the pending building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Unique identifier assigned to a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Steps one cell in `direction`, keeping a footprint inside `bounds`.
    ///
    /// The result never leaves the map: a box of size `footprint` anchored at
    /// the returned cell satisfies `column + width <= bounds.width` and
    /// `row + height <= bounds.height` whenever the map can hold it at all.
    #[must_use]
    pub fn step_within(self, direction: Direction, footprint: Footprint, bounds: Footprint) -> Self {
        let (column, row) = match direction {
            Direction::North => (self.column, self.row.saturating_sub(1)),
            Direction::South => (self.column, self.row.saturating_add(1)),
            Direction::West => (self.column.saturating_sub(1), self.row),
            Direction::East => (self.column.saturating_add(1), self.row),
        };
        Self::new(column, row).clamp_within(footprint, bounds)
    }

    /// Clamps the coordinate so a box of `footprint` stays inside `bounds`.
    #[must_use]
    pub fn clamp_within(self, footprint: Footprint, bounds: Footprint) -> Self {
        let max_column = bounds.width().saturating_sub(footprint.width());
        let max_row = bounds.height().saturating_sub(footprint.height());
        Self::new(self.column.min(max_column), self.row.min(max_row))
    }
}

/// Width and height of a rectangular area measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    width: u32,
    height: u32,
}

impl Footprint {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    origin: CellCoord,
    size: Footprint,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: Footprint) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Reports whether two rectangles collide once each is grown by one cell
    /// on its right and bottom edges.
    ///
    /// The extra cell enforces a mandatory one-cell gap between buildings.
    /// The test is symmetric and holds for a rectangle against itself.
    #[must_use]
    pub const fn overlaps_with_margin(&self, other: &CellRect) -> bool {
        let (ax, ay) = (self.origin.column as u64, self.origin.row as u64);
        let (aw, ah) = (self.size.width as u64, self.size.height as u64);
        let (bx, by) = (other.origin.column as u64, other.origin.row as u64);
        let (bw, bh) = (other.size.width as u64, other.size.height as u64);

        ax < bx + bw + 1 && ax + aw + 1 > bx && ay < by + bh + 1 && ay + ah + 1 > by
    }

    /// Reports whether the rectangle lies strictly inside `bounds`.
    ///
    /// The bottom-right corner `(x + w, y + h)` must be smaller than the
    /// bounds on both axes; touching the bounds exactly is rejected.
    #[must_use]
    pub const fn lies_within(&self, bounds: Footprint) -> bool {
        let right = self.origin.column as u64 + self.size.width as u64;
        let bottom = self.origin.row as u64 + self.size.height as u64;
        right < bounds.width as u64 && bottom < bounds.height as u64
    }
}

/// Closed set of building variants that can exist on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildingKind {
    /// Cottage housing ten residents.
    SmallHouse,
    /// Block housing forty residents.
    House,
    /// Small earner without pollution.
    Shop,
    /// Earner that pollutes a little.
    Factory,
    /// Big earner that pollutes heavily.
    BigFactory,
    /// Grants a one-time production boost to every earner.
    Office,
}

impl BuildingKind {
    /// Every variant, ordered as houses first and then the build catalog.
    pub const ALL: [BuildingKind; 6] = [
        Self::SmallHouse,
        Self::House,
        Self::Shop,
        Self::Factory,
        Self::BigFactory,
        Self::Office,
    ];

    /// Variants the player may construct, in selection-token order.
    pub const CATALOG: [BuildingKind; 4] =
        [Self::Shop, Self::Factory, Self::BigFactory, Self::Office];

    /// Digit that selects the variant, counting catalog entries from `1`.
    #[must_use]
    pub fn selection_token(self) -> Option<char> {
        let index = Self::CATALOG.iter().position(|kind| *kind == self)?;
        char::from_digit(u32::try_from(index + 1).ok()?, 10)
    }

    /// Resolves a selection digit back into its catalog entry.
    #[must_use]
    pub fn from_selection_token(token: char) -> Option<Self> {
        let index = usize::try_from(token.to_digit(10)?.checked_sub(1)?).ok()?;
        Self::CATALOG.get(index).copied()
    }

    /// Fixed footprint occupied by the variant.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::SmallHouse => Footprint::new(5, 4),
            Self::House => Footprint::new(7, 5),
            Self::Shop => Footprint::new(5, 3),
            Self::Factory => Footprint::new(6, 5),
            Self::BigFactory => Footprint::new(9, 6),
            Self::Office => Footprint::new(5, 6),
        }
    }

    /// Construction price, or `None` for variants that are only seeded.
    #[must_use]
    pub const fn price(self) -> Option<u32> {
        match self {
            Self::SmallHouse | Self::House => None,
            Self::Shop => Some(100),
            Self::Factory => Some(600),
            Self::BigFactory => Some(1_500),
            Self::Office => Some(800),
        }
    }

    /// Number of animation frames the variant cycles through while active.
    #[must_use]
    pub const fn frame_count(self) -> u8 {
        match self {
            Self::SmallHouse | Self::House | Self::Factory | Self::BigFactory => 3,
            Self::Shop | Self::Office => 2,
        }
    }

    /// Residents that live in the variant while it is inhabited.
    #[must_use]
    pub const fn residents(self) -> u32 {
        match self {
            Self::SmallHouse => 10,
            Self::House => 40,
            Self::Shop | Self::Factory | Self::BigFactory | Self::Office => 0,
        }
    }

    /// Reports whether the variant houses residents.
    #[must_use]
    pub const fn is_residential(self) -> bool {
        matches!(self, Self::SmallHouse | Self::House)
    }

    /// Human readable label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SmallHouse => "Small house",
            Self::House => "House",
            Self::Shop => "Shop",
            Self::Factory => "Factory",
            Self::BigFactory => "Big factory",
            Self::Office => "Office",
        }
    }
}

/// Per-building visual state that adapters map onto glyph frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Active animation frame, always below the kind's frame count.
    Frame(u8),
    /// Pinned visual of an abandoned house.
    Abandoned,
}

/// Reasons a candidate placement may be illegal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementError {
    /// The footprint reaches or crosses the map bounds.
    OutOfBounds,
    /// The footprint, including its one-cell margin, overlaps a building.
    Overlapping,
}

/// Reasons a build request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildError {
    /// No building is currently being positioned.
    NothingPending,
    /// The pending building sits on an illegal spot.
    Placement(PlacementError),
    /// The treasury cannot cover the price.
    InsufficientFunds {
        /// Price of the pending building.
        price: u32,
    },
    /// The city is already empty; no further construction happens.
    GameOver,
}

/// Lifecycle of a single session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Residents remain and the simulation keeps ticking.
    Running,
    /// The population reached zero.
    Won,
}

/// Immutable copy of the aggregate economy counters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EconomySnapshot {
    /// Money available for construction.
    pub cash: f64,
    /// Residents still living in the city.
    pub population: u32,
    /// Accumulated pollution.
    pub pollution: u32,
    /// Aggregate production bonus granted by offices.
    pub production_boost: f64,
    /// Number of abandonments so far; raises the next abandonment threshold.
    pub abandonment_pressure: u32,
    /// Cash earned during the last simulation step.
    pub cash_delta: f64,
    /// Pollution produced during the last simulation step.
    pub pollution_delta: u32,
}

impl EconomySnapshot {
    /// Reports whether the treasury covers `price`.
    #[must_use]
    pub fn can_afford(&self, price: u32) -> bool {
        self.cash >= f64::from(price)
    }
}

/// Immutable representation of a placed building used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingSnapshot {
    /// Identifier allocated to the building by the world.
    pub id: BuildingId,
    /// Kind of building that was constructed.
    pub kind: BuildingKind,
    /// Region of cells occupied by the building.
    pub region: CellRect,
    /// Visual state adapters should draw.
    pub visual: VisualState,
}

/// Read-only snapshot describing every placed building.
#[derive(Clone, Debug, Default)]
pub struct BuildingView {
    snapshots: Vec<BuildingSnapshot>,
}

impl BuildingView {
    /// Creates a new building view from snapshots listed in registry order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<BuildingSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &BuildingSnapshot> {
        self.snapshots.iter()
    }

    /// Number of buildings captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no buildings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BuildingSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the pending building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSnapshot {
    /// Kind of building being positioned.
    pub kind: BuildingKind,
    /// Region the building would occupy if committed.
    pub region: CellRect,
    /// Cached validator verdict for the current position.
    pub placement: Result<(), PlacementError>,
}

impl PendingSnapshot {
    /// Reports whether the pending building may be committed at its position.
    #[must_use]
    pub const fn is_legal(&self) -> bool {
        self.placement.is_ok()
    }
}
