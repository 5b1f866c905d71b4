#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for ascii-city.

mod buildings;
mod economy;
pub mod placement;
mod seeding;

use ascii_city_core::{
    BuildError, BuildingKind, CellCoord, CellRect, Command, Direction, Event, Footprint,
    GameStatus, PendingSnapshot, PlacementError, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    buildings::{BuildingRegistry, EffectOutcome},
    economy::Economy,
};

const DEFAULT_RNG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_PENDING_ORIGIN: CellCoord = CellCoord::new(10, 10);

/// Tunable parameters used when a world is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Number of map columns.
    pub columns: u32,
    /// Number of map rows.
    pub rows: u32,
    /// Cash available before the first step.
    pub starting_cash: f64,
    /// Number of houses scattered over the map at start.
    pub seeded_houses: usize,
    /// Attempts each seeded house gets before it is skipped.
    pub max_placement_attempts: u32,
    /// Seed of the world's random stream.
    pub rng_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 22,
            starting_cash: 1_000.0,
            seeded_houses: 20,
            max_placement_attempts: 10_000,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Errors reported when constructing a world from an explicit layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A layout entry sits on an illegal spot.
    #[error("{kind:?} at {origin:?} cannot be placed: {reason:?}")]
    IllegalPlacement {
        /// Kind of the offending entry.
        kind: BuildingKind,
        /// Origin of the offending entry.
        origin: CellCoord,
        /// Validator verdict for the entry.
        reason: PlacementError,
    },
}

/// Building positioned by the player but not yet committed.
#[derive(Clone, Copy, Debug)]
struct PendingBuilding {
    kind: BuildingKind,
    origin: CellCoord,
    placement: Result<(), PlacementError>,
}

impl PendingBuilding {
    fn region(&self) -> CellRect {
        CellRect::from_origin_and_size(self.origin, self.kind.footprint())
    }

    fn snapshot(&self) -> PendingSnapshot {
        PendingSnapshot {
            kind: self.kind,
            region: self.region(),
            placement: self.placement,
        }
    }
}

/// Represents the authoritative ascii-city world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    bounds: Footprint,
    buildings: BuildingRegistry,
    pending: Option<PendingBuilding>,
    economy: Economy,
    rng: ChaCha8Rng,
    status: GameStatus,
    step_index: u64,
}

impl World {
    /// Creates a world with houses scattered at random legal positions.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let bounds = Footprint::new(config.columns, config.rows);
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let mut buildings = BuildingRegistry::new();
        let population = seeding::seed_houses(
            &mut buildings,
            bounds,
            config.seeded_houses,
            config.max_placement_attempts,
            &mut rng,
        );
        tracing::info!(
            houses = buildings.len(),
            population,
            columns = config.columns,
            rows = config.rows,
            "city founded"
        );

        Self::assemble(config, bounds, buildings, population, rng)
    }

    /// Creates a world holding exactly the provided buildings, in order.
    ///
    /// The initial population is the sum of the listed houses' residents.
    pub fn from_layout(
        config: &WorldConfig,
        layout: &[(BuildingKind, CellCoord)],
    ) -> Result<Self, LayoutError> {
        let bounds = Footprint::new(config.columns, config.rows);
        let mut buildings = BuildingRegistry::new();
        let mut population: u32 = 0;

        for &(kind, origin) in layout {
            let region = CellRect::from_origin_and_size(origin, kind.footprint());
            placement::validate(region, buildings.regions(), bounds).map_err(|reason| {
                LayoutError::IllegalPlacement {
                    kind,
                    origin,
                    reason,
                }
            })?;
            let _ = buildings.insert(kind, origin);
            population = population.saturating_add(kind.residents());
        }

        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Ok(Self::assemble(config, bounds, buildings, population, rng))
    }

    fn assemble(
        config: &WorldConfig,
        bounds: Footprint,
        buildings: BuildingRegistry,
        population: u32,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            banner: WELCOME_BANNER,
            bounds,
            buildings,
            pending: None,
            economy: Economy::new(config.starting_cash, population),
            rng,
            status: GameStatus::Running,
            step_index: 0,
        }
    }

    fn simulate(&mut self, out_events: &mut Vec<Event>) {
        self.step_index = self.step_index.saturating_add(1);
        self.economy.begin_step();

        for building in self.buildings.iter_mut() {
            match building.apply_effect(&mut self.economy, &mut self.rng) {
                Some(EffectOutcome::Boosted(boost)) => {
                    tracing::debug!(building = building.id().get(), boost, "office boost applied");
                    out_events.push(Event::ProductionBoosted {
                        building: building.id(),
                        boost,
                    });
                }
                Some(EffectOutcome::Abandoned(residents)) => {
                    tracing::debug!(
                        building = building.id().get(),
                        residents,
                        pollution = self.economy.pollution(),
                        "house abandoned"
                    );
                    out_events.push(Event::HouseAbandoned {
                        building: building.id(),
                        residents,
                    });
                }
                None => {}
            }
        }

        for building in self.buildings.iter_mut() {
            building.refresh_animation(&mut self.rng);
        }

        out_events.push(Event::Simulated {
            step: self.step_index,
            economy: self.economy.snapshot(),
        });

        if self.economy.population() == 0 {
            self.status = GameStatus::Won;
            tracing::info!(step = self.step_index, "last resident left the city");
            out_events.push(Event::CityAbandoned);
        }
    }

    fn select(&mut self, kind: BuildingKind, out_events: &mut Vec<Event>) {
        if kind.price().is_none() {
            return;
        }

        self.pending = match self.pending {
            Some(pending) if pending.kind == kind => None,
            Some(pending) => Some(self.position_pending(kind, pending.origin)),
            None => Some(self.position_pending(kind, DEFAULT_PENDING_ORIGIN)),
        };

        out_events.push(Event::PendingChanged {
            pending: self.pending.map(|pending| pending.snapshot()),
        });
    }

    fn move_pending(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(pending) = self.pending else {
            return;
        };

        let origin = pending
            .origin
            .step_within(direction, pending.kind.footprint(), self.bounds);
        if origin == pending.origin {
            return;
        }

        let moved = self.position_pending(pending.kind, origin);
        self.pending = Some(moved);
        out_events.push(Event::PendingChanged {
            pending: Some(moved.snapshot()),
        });
    }

    fn position_pending(&self, kind: BuildingKind, origin: CellCoord) -> PendingBuilding {
        let origin = origin.clamp_within(kind.footprint(), self.bounds);
        PendingBuilding {
            kind,
            origin,
            placement: query::validate_placement(self, kind, origin),
        }
    }

    fn build(&mut self, out_events: &mut Vec<Event>) {
        match self.try_build() {
            Ok(event) => {
                out_events.push(event);
                out_events.push(Event::PendingChanged { pending: None });
            }
            Err(reason) => {
                tracing::trace!(?reason, "build rejected");
                out_events.push(Event::BuildRejected { reason });
            }
        }
    }

    fn try_build(&mut self) -> Result<Event, BuildError> {
        if self.status == GameStatus::Won {
            return Err(BuildError::GameOver);
        }

        let pending = self.pending.ok_or(BuildError::NothingPending)?;
        pending.placement.map_err(BuildError::Placement)?;
        let price = pending.kind.price().ok_or(BuildError::NothingPending)?;
        if !self.economy.try_spend(price) {
            return Err(BuildError::InsufficientFunds { price });
        }

        let building = self.buildings.insert(pending.kind, pending.origin);
        self.pending = None;
        tracing::debug!(
            building = building.get(),
            kind = ?pending.kind,
            column = pending.origin.column(),
            row = pending.origin.row(),
            price,
            "building placed"
        );

        Ok(Event::BuildingPlaced {
            building,
            kind: pending.kind,
            region: pending.region(),
            price,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Command::Tick { dt } = command {
        out_events.push(Event::TimeAdvanced { dt });
        return;
    }

    if world.status == GameStatus::Won {
        if command == Command::Build {
            world.build(out_events);
        }
        return;
    }

    match command {
        Command::Tick { .. } => {}
        Command::Simulate => world.simulate(out_events),
        Command::SelectBuilding { kind } => world.select(kind, out_events),
        Command::MovePending { direction } => world.move_pending(direction, out_events),
        Command::Build => world.build(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ascii_city_core::{
        BuildingKind, BuildingSnapshot, BuildingView, CellCoord, CellRect, EconomySnapshot,
        Footprint, GameStatus, PendingSnapshot, PlacementError,
    };

    use super::{placement, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the playable map.
    #[must_use]
    pub fn bounds(world: &World) -> Footprint {
        world.bounds
    }

    /// Captures the aggregate economy counters.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        world.economy.snapshot()
    }

    /// Reports whether the session is still running.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Number of simulation steps executed so far.
    #[must_use]
    pub fn step_index(world: &World) -> u64 {
        world.step_index
    }

    /// Captures the pending building together with its cached legality.
    #[must_use]
    pub fn pending(world: &World) -> Option<PendingSnapshot> {
        world.pending.map(|pending| pending.snapshot())
    }

    /// Captures a read-only view of every placed building in registry order.
    #[must_use]
    pub fn building_view(world: &World) -> BuildingView {
        let snapshots = world
            .buildings
            .iter()
            .map(|building| BuildingSnapshot {
                id: building.id(),
                kind: building.kind(),
                region: building.region(),
                visual: building.visual(),
            })
            .collect();
        BuildingView::from_snapshots(snapshots)
    }

    /// Runs the placement validator for an arbitrary candidate.
    pub fn validate_placement(
        world: &World,
        kind: BuildingKind,
        origin: CellCoord,
    ) -> Result<(), PlacementError> {
        let region = CellRect::from_origin_and_size(origin, kind.footprint());
        placement::validate(region, world.buildings.regions(), world.bounds)
    }
}
