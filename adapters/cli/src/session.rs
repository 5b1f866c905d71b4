//! Frame-by-frame orchestration of the world and its systems.

use std::time::Duration;

use ascii_city_core::{Command, Event};
use ascii_city_rendering::{FrameControl, FrameInput, MapPresentation, RenderingError, Scene};
use ascii_city_system_builder::{Builder, PlayerAction};
use ascii_city_system_scheduler::{Config as SchedulerConfig, Scheduler};
use ascii_city_world::{self as world, query, World, WorldConfig};

/// Owns the world together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    scheduler: Scheduler,
    builder: Builder,
    map: MapPresentation,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(config: &WorldConfig, tick_interval: Duration) -> Result<Self, RenderingError> {
        let world = World::new(config);
        let bounds = query::bounds(&world);
        let map = MapPresentation::new(bounds.width(), bounds.height())?;

        Ok(Self {
            world,
            scheduler: Scheduler::new(SchedulerConfig::new(tick_interval)),
            builder: Builder::new(),
            map,
            events: Vec::new(),
        })
    }

    /// Runs one frame: quit check, player commands, then the clock.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) -> FrameControl {
        let action = input.key.and_then(PlayerAction::from_char);
        if action == Some(PlayerAction::Quit) {
            tracing::info!(step = query::step_index(&self.world), "player quit");
            return FrameControl::Quit;
        }

        let mut commands = Vec::new();
        self.builder.handle(
            &self.events,
            action,
            query::pending(&self.world),
            &mut commands,
        );

        self.events.clear();
        self.dispatch(commands);
        self.dispatch(vec![Command::Tick { dt }]);
        FrameControl::Continue
    }

    /// Applies commands and keeps feeding the scheduler until it goes quiet.
    fn dispatch(&mut self, mut queue: Vec<Command>) {
        while !queue.is_empty() {
            let start = self.events.len();
            for command in queue.drain(..) {
                world::apply(&mut self.world, command, &mut self.events);
            }
            self.scheduler.handle(&self.events[start..], &mut queue);
        }
    }

    pub(crate) fn scene(&self) -> Scene {
        Scene::new(
            self.map,
            query::building_view(&self.world),
            query::economy(&self.world),
            query::pending(&self.world),
            query::status(&self.world),
        )
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascii_city_core::{BuildingKind, GameStatus};

    const FRAME: Duration = Duration::from_millis(30);

    fn empty_city() -> WorldConfig {
        WorldConfig {
            seeded_houses: 0,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn quit_wins_over_everything_else() {
        let mut session = Session::new(&WorldConfig::default(), Duration::from_secs(1))
            .expect("valid map");

        assert_eq!(
            session.advance(FRAME, FrameInput::key('q')),
            FrameControl::Quit
        );
        assert_eq!(
            query::step_index(&session.world),
            0,
            "quitting frame must not tick"
        );
    }

    #[test]
    fn first_frame_runs_one_step() {
        let mut session = Session::new(&WorldConfig::default(), Duration::from_secs(1))
            .expect("valid map");

        for _ in 0..10 {
            assert_eq!(
                session.advance(FRAME, FrameInput::default()),
                FrameControl::Continue
            );
        }

        assert_eq!(query::step_index(&session.world), 1);
    }

    #[test]
    fn selecting_and_committing_places_a_factory() {
        let config = WorldConfig {
            seeded_houses: 1,
            ..WorldConfig::default()
        };
        let mut session = Session::new(&config, Duration::from_secs(3_600)).expect("valid map");
        let houses = session.scene().buildings.len();

        let _ = session.advance(FRAME, FrameInput::key('2'));
        let pending = session.scene().pending.expect("factory selected");
        assert_eq!(pending.kind, BuildingKind::Factory);

        if !pending.is_legal() {
            // The seeded house sits on the default spot; walk away from it.
            for _ in 0..40 {
                let _ = session.advance(FRAME, FrameInput::key('d'));
            }
        }
        let pending = session.scene().pending.expect("factory still pending");
        assert!(pending.is_legal(), "{pending:?}");

        let _ = session.advance(FRAME, FrameInput::key('p'));
        let scene = session.scene();

        assert_eq!(scene.buildings.len(), houses + 1);
        assert!(scene.pending.is_none());
        assert!(scene.economy.cash < 1_000.0);
    }

    #[test]
    fn empty_city_is_won_and_ignores_input() {
        let mut session = Session::new(&empty_city(), Duration::from_millis(100))
            .expect("valid map");

        let _ = session.advance(FRAME, FrameInput::default());
        assert!(session.scene().is_won());
        assert!(session.scheduler.is_halted());

        let _ = session.advance(FRAME, FrameInput::key('1'));
        let _ = session.advance(Duration::from_secs(5), FrameInput::key('p'));

        let scene = session.scene();
        assert_eq!(scene.status, GameStatus::Won);
        assert!(scene.pending.is_none());
        assert_eq!(query::step_index(&session.world), 1);
    }
}
