//! Legality checks for candidate building positions.

use ascii_city_core::{CellRect, Footprint, PlacementError};

/// Validates a candidate region against the map bounds and existing buildings.
///
/// Bounds are checked first: the candidate's bottom-right corner must stay
/// strictly below `bounds`. Every occupied region is then tested with the
/// one-cell margin overlap rule.
pub fn validate<I>(candidate: CellRect, occupied: I, bounds: Footprint) -> Result<(), PlacementError>
where
    I: IntoIterator<Item = CellRect>,
{
    if !candidate.lies_within(bounds) {
        return Err(PlacementError::OutOfBounds);
    }

    if occupied
        .into_iter()
        .any(|region| candidate.overlaps_with_margin(&region))
    {
        return Err(PlacementError::Overlapping);
    }

    Ok(())
}
