//! Least-occupied-track selection.
//!
//! Given candidate tracks and an optional car type, pick the track with the
//! fewest cars among those that accept the type. Ties go to the earliest
//! track in input order.

use crate::error::PlacementError;
use crate::model::Track;

/// Select the least occupied track that accepts `car_type`.
///
/// Returns `Ok(None)` when no track survives the type filter, and
/// [`PlacementError::EmptyTrackSet`] when `tracks` itself is empty.
pub fn select_least_occupied_track<'a>(
    tracks: &'a [Track],
    car_type: Option<&str>,
) -> Result<Option<&'a Track>, PlacementError> {
    select_least_occupied_by(tracks, car_type, Track::car_count)
}

/// Same selection rule as [`select_least_occupied_track`], with occupancy
/// taken from `occupancy` instead of each track's `placed_cars`.
///
/// The bulk reset tracks counts locally while it writes to the store, so it
/// supplies its own counter here.
pub fn select_least_occupied_by<'a, F>(
    tracks: &'a [Track],
    car_type: Option<&str>,
    mut occupancy: F,
) -> Result<Option<&'a Track>, PlacementError>
where
    F: FnMut(&Track) -> usize,
{
    if tracks.is_empty() {
        return Err(PlacementError::EmptyTrackSet);
    }

    let mut best: Option<(&Track, usize)> = None;
    for track in tracks {
        if car_type.is_some_and(|ty| !track.accepts(ty)) {
            continue;
        }
        let count = occupancy(track);
        // Strict less-than keeps the earliest track on ties.
        match best {
            Some((_, best_count)) if count >= best_count => {}
            _ => best = Some((track, count)),
        }
    }

    Ok(best.map(|(track, _)| track))
}
