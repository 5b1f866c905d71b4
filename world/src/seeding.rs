//! Random placement of the houses a new city starts with.

use ascii_city_core::{BuildingKind, CellCoord, CellRect, Footprint};
use rand::Rng;

use crate::{buildings::BuildingRegistry, placement};

/// Places up to `count` houses at random legal positions.
///
/// Each house retries at most `max_attempts` times; a house that finds no
/// room is skipped. Returns the residents of every placed house.
pub(crate) fn seed_houses<R: Rng>(
    registry: &mut BuildingRegistry,
    bounds: Footprint,
    count: usize,
    max_attempts: u32,
    rng: &mut R,
) -> u32 {
    let mut population: u32 = 0;

    for index in 0..count {
        let placed = (0..max_attempts).find_map(|_| {
            let kind = if rng.gen_bool(0.5) {
                BuildingKind::SmallHouse
            } else {
                BuildingKind::House
            };
            let origin = sample_origin(kind.footprint(), bounds, rng)?;
            let region = CellRect::from_origin_and_size(origin, kind.footprint());
            placement::validate(region, registry.regions(), bounds)
                .ok()
                .map(|()| (kind, origin))
        });

        match placed {
            Some((kind, origin)) => {
                let _ = registry.insert(kind, origin);
                population = population.saturating_add(kind.residents());
            }
            None => {
                tracing::warn!(
                    house = index,
                    max_attempts,
                    columns = bounds.width(),
                    rows = bounds.height(),
                    "no room left for seeded house, skipping"
                );
            }
        }
    }

    population
}

/// Draws an origin whose footprint ends strictly inside `bounds`.
fn sample_origin<R: Rng>(footprint: Footprint, bounds: Footprint, rng: &mut R) -> Option<CellCoord> {
    if bounds.width() <= footprint.width() || bounds.height() <= footprint.height() {
        return None;
    }

    let column = rng.gen_range(0..bounds.width() - footprint.width());
    let row = rng.gen_range(0..bounds.height() - footprint.height());
    Some(CellCoord::new(column, row))
}
