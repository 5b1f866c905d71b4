//! Building registry and the per-kind effect rules applied on every step.

use ascii_city_core::{BuildingId, BuildingKind, CellCoord, CellRect, VisualState};
use rand::Rng;

use crate::economy::Economy;

const OFFICE_BOOST: f64 = 0.2;

const SMALL_HOUSE_DECAY: DecayRule = DecayRule {
    base_threshold: 300,
    pressure_step: 20,
    draw_range: 6_000,
};

const HOUSE_DECAY: DecayRule = DecayRule {
    base_threshold: 1_000,
    pressure_step: 50,
    draw_range: 12_000,
};

/// Economic behaviour of a kind, applied once per simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
enum EffectRule {
    /// Earns boosted cash and emits pollution.
    Produce { cash: f64, pollution: u32 },
    /// Grants a production boost exactly once per building.
    BoostProduction { amount: f64 },
    /// Residents may leave once pollution passes a pressure-scaled threshold.
    Decay(DecayRule),
}

/// Parameters of the abandonment trial run by inhabited houses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DecayRule {
    base_threshold: u32,
    pressure_step: u32,
    draw_range: u32,
}

impl DecayRule {
    fn threshold(self, pressure: u32) -> u64 {
        u64::from(self.base_threshold) + u64::from(self.pressure_step) * u64::from(pressure)
    }
}

const fn effect_rule(kind: BuildingKind) -> EffectRule {
    match kind {
        BuildingKind::Shop => EffectRule::Produce {
            cash: 2.0,
            pollution: 0,
        },
        BuildingKind::Factory => EffectRule::Produce {
            cash: 5.0,
            pollution: 1,
        },
        BuildingKind::BigFactory => EffectRule::Produce {
            cash: 10.0,
            pollution: 3,
        },
        BuildingKind::Office => EffectRule::BoostProduction {
            amount: OFFICE_BOOST,
        },
        BuildingKind::SmallHouse => EffectRule::Decay(SMALL_HOUSE_DECAY),
        BuildingKind::House => EffectRule::Decay(HOUSE_DECAY),
    }
}

/// Variant-specific state carried by each building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VariantState {
    Residence { abandoned: bool },
    Office { boost_applied: bool },
    Plain,
}

impl VariantState {
    const fn initial(kind: BuildingKind) -> Self {
        match kind {
            BuildingKind::SmallHouse | BuildingKind::House => Self::Residence { abandoned: false },
            BuildingKind::Office => Self::Office {
                boost_applied: false,
            },
            BuildingKind::Shop | BuildingKind::Factory | BuildingKind::BigFactory => Self::Plain,
        }
    }
}

/// Noteworthy result of applying a building's effect rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum EffectOutcome {
    /// The office granted its boost; carries the new aggregate boost.
    Boosted(f64),
    /// The house was abandoned; carries the residents removed.
    Abandoned(u32),
}

/// Authoritative state of a building placed on the map.
#[derive(Clone, Debug)]
pub(crate) struct Building {
    id: BuildingId,
    kind: BuildingKind,
    origin: CellCoord,
    frame: u8,
    variant: VariantState,
}

impl Building {
    fn new(id: BuildingId, kind: BuildingKind, origin: CellCoord) -> Self {
        Self {
            id,
            kind,
            origin,
            frame: 0,
            variant: VariantState::initial(kind),
        }
    }

    pub(crate) fn id(&self) -> BuildingId {
        self.id
    }

    pub(crate) fn kind(&self) -> BuildingKind {
        self.kind
    }

    pub(crate) fn region(&self) -> CellRect {
        CellRect::from_origin_and_size(self.origin, self.kind.footprint())
    }

    pub(crate) fn visual(&self) -> VisualState {
        match self.variant {
            VariantState::Residence { abandoned: true } => VisualState::Abandoned,
            _ => VisualState::Frame(self.frame),
        }
    }

    /// Applies the kind's effect rule against the shared economy.
    pub(crate) fn apply_effect<R: Rng>(
        &mut self,
        economy: &mut Economy,
        rng: &mut R,
    ) -> Option<EffectOutcome> {
        match (effect_rule(self.kind), &mut self.variant) {
            (EffectRule::Produce { cash, pollution }, _) => {
                economy.earn(cash);
                if pollution > 0 {
                    economy.pollute(pollution);
                }
                None
            }
            (EffectRule::BoostProduction { amount }, VariantState::Office { boost_applied }) => {
                if *boost_applied {
                    return None;
                }
                *boost_applied = true;
                Some(EffectOutcome::Boosted(economy.boost(amount)))
            }
            (EffectRule::Decay(rule), VariantState::Residence { abandoned }) => {
                if *abandoned {
                    return None;
                }

                let pollution = economy.pollution();
                if u64::from(pollution) <= rule.threshold(economy.abandonment_pressure()) {
                    return None;
                }

                let draw = rng.gen_range(0..rule.draw_range);
                if draw > pollution {
                    return None;
                }

                *abandoned = true;
                Some(EffectOutcome::Abandoned(
                    economy.abandon(self.kind.residents()),
                ))
            }
            _ => None,
        }
    }

    /// Re-rolls the animation frame; abandoned houses stay pinned.
    pub(crate) fn refresh_animation<R: Rng>(&mut self, rng: &mut R) {
        if self.visual() == VisualState::Abandoned {
            return;
        }
        self.frame = rng.gen_range(0..self.kind.frame_count());
    }
}

/// Registry that stores buildings in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct BuildingRegistry {
    entries: Vec<Building>,
    next_building_id: BuildingId,
}

impl BuildingRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_building_id: BuildingId::new(0),
        }
    }

    /// Appends a building and returns the identifier allocated to it.
    pub(crate) fn insert(&mut self, kind: BuildingKind, origin: CellCoord) -> BuildingId {
        let id = self.next_building_id;
        self.next_building_id = BuildingId::new(id.get().saturating_add(1));
        self.entries.push(Building::new(id, kind, origin));
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Building> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.entries.iter_mut()
    }

    pub(crate) fn regions(&self) -> impl Iterator<Item = CellRect> + '_ {
        self.entries.iter().map(Building::region)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn building(kind: BuildingKind) -> Building {
        Building::new(BuildingId::new(0), kind, CellCoord::new(0, 0))
    }

    #[test]
    fn factories_earn_and_pollute() {
        let mut economy = Economy::new(0.0, 0);
        let mut rng = rng();
        economy.begin_step();

        let _ = building(BuildingKind::Factory).apply_effect(&mut economy, &mut rng);
        let _ = building(BuildingKind::BigFactory).apply_effect(&mut economy, &mut rng);
        let _ = building(BuildingKind::Shop).apply_effect(&mut economy, &mut rng);

        let snapshot = economy.snapshot();
        assert!((snapshot.cash - 17.0).abs() < 1e-9);
        assert_eq!(snapshot.pollution, 4);
        assert_eq!(snapshot.pollution_delta, 4);
    }

    #[test]
    fn office_boosts_exactly_once() {
        let mut economy = Economy::new(0.0, 0);
        let mut rng = rng();
        let mut office = building(BuildingKind::Office);

        let first = office.apply_effect(&mut economy, &mut rng);
        assert_eq!(first, Some(EffectOutcome::Boosted(OFFICE_BOOST)));

        for _ in 0..25 {
            assert_eq!(office.apply_effect(&mut economy, &mut rng), None);
        }
        assert!((economy.snapshot().production_boost - OFFICE_BOOST).abs() < 1e-9);
    }

    #[test]
    fn houses_ignore_pollution_at_threshold() {
        let mut economy = Economy::new(0.0, 10);
        economy.pollute(300);
        let mut rng = rng();
        let mut house = building(BuildingKind::SmallHouse);

        for _ in 0..100 {
            assert_eq!(house.apply_effect(&mut economy, &mut rng), None);
        }
        assert_eq!(economy.population(), 10);
    }

    #[test]
    fn saturated_pollution_abandons_house_once() {
        let mut economy = Economy::new(0.0, 50);
        economy.pollute(12_000);
        let mut rng = rng();
        let mut house = building(BuildingKind::House);

        assert_eq!(
            house.apply_effect(&mut economy, &mut rng),
            Some(EffectOutcome::Abandoned(40))
        );
        assert_eq!(house.visual(), VisualState::Abandoned);
        assert_eq!(house.apply_effect(&mut economy, &mut rng), None);
        assert_eq!(economy.population(), 10);
        assert_eq!(economy.abandonment_pressure(), 1);
    }

    #[test]
    fn abandoned_visual_survives_animation_refresh() {
        let mut economy = Economy::new(0.0, 10);
        economy.pollute(6_000);
        let mut rng = rng();
        let mut house = building(BuildingKind::SmallHouse);
        let _ = house.apply_effect(&mut economy, &mut rng);

        for _ in 0..10 {
            house.refresh_animation(&mut rng);
            assert_eq!(house.visual(), VisualState::Abandoned);
        }
    }

    #[test]
    fn animation_frames_stay_within_frame_count() {
        let mut rng = rng();
        for kind in BuildingKind::ALL {
            let mut subject = building(kind);
            for _ in 0..50 {
                subject.refresh_animation(&mut rng);
                match subject.visual() {
                    VisualState::Frame(frame) => assert!(frame < kind.frame_count()),
                    VisualState::Abandoned => panic!("{kind:?} must not be abandoned"),
                }
            }
        }
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = BuildingRegistry::new();
        let first = registry.insert(BuildingKind::Shop, CellCoord::new(0, 0));
        let second = registry.insert(BuildingKind::Factory, CellCoord::new(10, 0));

        assert_eq!(first, BuildingId::new(0));
        assert_eq!(second, BuildingId::new(1));
        assert_eq!(registry.len(), 2);
        let kinds: Vec<_> = registry.iter().map(Building::kind).collect();
        assert_eq!(kinds, vec![BuildingKind::Shop, BuildingKind::Factory]);
    }
}
