//! Send all rolling stock back to its home yards.
//!
//! The reset empties tracks, clears every affected car's location and
//! destination, then spreads the cars over their home yards' tracks using
//! the least-occupied rule with locally tracked counts. Results are
//! written to the store one call at a time. A store failure aborts the
//! remaining work without undoing what was already written.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::{ResetConfig, ResetScope};
use crate::error::{PlacementError, ResetError};
use crate::id::{CarId, IndustryId, TrackId};
use crate::initializer::{SkipReason, SkippedCar};
use crate::model::{CarLocation, Industry, RollingStock, Track};
use crate::selector::select_least_occupied_by;
use crate::store::{LayoutStore, StoreConnection};
use crate::sync::placed_car_index;

/// Summary of a completed reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Cars assigned a home-yard track, in processing order.
    pub placed: Vec<(CarId, CarLocation)>,
    /// Cars that could not be assigned and were left without a location.
    pub skipped: Vec<SkippedCar>,
    /// Cars left in place because their industry was outside the reset scope.
    pub kept: Vec<CarId>,
    /// Number of industries whose tracks were emptied.
    pub cleared_industries: usize,
}

/// Running assignment counts for one home yard.
struct YardTracks<'a> {
    tracks: &'a [Track],
    counts: HashMap<&'a TrackId, usize>,
}

impl<'a> YardTracks<'a> {
    fn new(yard: &'a Industry) -> Self {
        Self {
            tracks: &yard.tracks,
            counts: yard.tracks.iter().map(|t| (&t.id, 0)).collect(),
        }
    }

    fn count(&self, track: &Track) -> usize {
        self.counts.get(&track.id).copied().unwrap_or(0)
    }

    /// Choose a track for `car` and bump its count.
    fn assign(
        &mut self,
        car: &RollingStock,
        respect_capacity: bool,
    ) -> Result<TrackId, SkipReason> {
        let track = select_least_occupied_by(self.tracks, Some(car.aar_type.as_str()), |t| {
            let count = self.count(t);
            if respect_capacity && count >= t.max_cars as usize {
                usize::MAX
            } else {
                count
            }
        })
        .map_err(SkipReason::Rejected)?
        .ok_or(SkipReason::NoEligibleTrack)?;

        if respect_capacity && self.count(track) >= track.max_cars as usize {
            return Err(SkipReason::Rejected(PlacementError::TrackAtCapacity {
                track_name: track.name.clone(),
                max_cars: track.max_cars,
            }));
        }

        *self.counts.entry(&track.id).or_insert(0) += 1;
        Ok(track.id.clone())
    }
}

/// Reset every car in `store` to a track in its home yard.
///
/// The store connection is released before returning, whether or not the
/// reset succeeded.
pub fn reset_to_home_yards<S: LayoutStore + ?Sized>(
    store: &mut S,
    config: &ResetConfig,
) -> Result<ResetReport, ResetError> {
    let mut conn = StoreConnection::open(store)?;

    let industries = conn.find_all_industries()?;
    let cars = conn.find_all_rolling_stock()?;
    info!(
        industries = industries.len(),
        cars = cars.len(),
        scope = ?config.scope,
        "resetting rolling stock to home yards"
    );

    let mut report = ResetReport::default();

    let cleared: HashSet<&IndustryId> = match config.scope {
        ResetScope::AllIndustries => {
            conn.clear_all_placed_cars()?;
            industries.iter().map(|i| &i.id).collect()
        }
        ResetScope::YardsOnly => {
            let yards: HashSet<&IndustryId> =
                industries.iter().filter(|i| i.is_yard()).map(|i| &i.id).collect();
            for id in &yards {
                conn.clear_placed_cars(id)?;
            }
            yards
        }
    };
    report.cleared_industries = cleared.len();

    // Cars listed on a track the reset did not empty stay put. The track
    // list wins over the car record, which is rewritten if it disagrees.
    let untouched: Vec<Industry> = industries
        .iter()
        .filter(|i| !cleared.contains(&i.id))
        .cloned()
        .collect();
    let listed = placed_car_index(&untouched);
    let mut to_reset: Vec<&RollingStock> = Vec::new();
    for car in &cars {
        let Some(location) = listed.get(&car.id) else {
            to_reset.push(car);
            continue;
        };
        if car.current_location.as_ref() != Some(location) {
            debug!(car = %car.id, at = %location, "kept car's location rewritten from its track");
            conn.update_car_location(&car.id, Some(location))?;
        }
        report.kept.push(car.id.clone());
    }

    for car in &to_reset {
        conn.clear_car_destination_and_location(&car.id)?;
    }

    let mut yards: HashMap<&IndustryId, YardTracks<'_>> = industries
        .iter()
        .filter(|i| i.is_yard())
        .map(|i| (&i.id, YardTracks::new(i)))
        .collect();

    for car in to_reset {
        let Some(yard) = yards.get_mut(&car.home_yard) else {
            warn!(
                car = %car.id,
                home_yard = %car.home_yard,
                "home yard not found; car left unplaced"
            );
            report.skipped.push(SkippedCar {
                car_id: car.id.clone(),
                reason: SkipReason::UnknownHomeYard(car.home_yard.clone()),
            });
            continue;
        };

        let track_id = match yard.assign(car, config.respect_capacity) {
            Ok(track_id) => track_id,
            Err(reason) => {
                warn!(
                    car = %car.id,
                    home_yard = %car.home_yard,
                    ?reason,
                    "no track for car; left unplaced"
                );
                report.skipped.push(SkippedCar {
                    car_id: car.id.clone(),
                    reason,
                });
                continue;
            }
        };

        let location = CarLocation {
            industry_id: car.home_yard.clone(),
            track_id,
        };
        conn.update_car_location(&car.id, Some(&location))?;
        conn.update_industry_placed_cars(&location.industry_id, &location.track_id, &car.id)?;
        debug!(
            car = %car.id,
            yard = %location.industry_id,
            track = %location.track_id,
            "car reset to home yard"
        );
        report.placed.push((car.id.clone(), location));
    }

    info!(
        placed = report.placed.len(),
        skipped = report.skipped.len(),
        kept = report.kept.len(),
        "reset finished"
    );
    Ok(report)
}
