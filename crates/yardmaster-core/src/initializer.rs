//! Initial placement of unplaced cars in their home yards.
//!
//! Every car without a current location is spotted on the least occupied
//! track of its home yard that accepts its type. Placements accumulate over
//! the pass, so later cars see the cars placed before them. Per-car
//! failures are logged and skipped; the pass as a whole never fails.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::PlacementError;
use crate::id::{CarId, IndustryId};
use crate::model::{CarLocation, Industry, RollingStock};
use crate::placement::place_car;
use crate::selector::select_least_occupied_track;

/// Why a car was left unplaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No yard industry has the car's `home_yard` id.
    UnknownHomeYard(IndustryId),
    /// The home yard has no track accepting the car's type.
    NoEligibleTrack,
    /// Selection or placement rejected the car.
    Rejected(PlacementError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownHomeYard(id) => write!(f, "home yard {id} not found"),
            SkipReason::NoEligibleTrack => f.write_str("no track accepts its type"),
            SkipReason::Rejected(err) => write!(f, "{err}"),
        }
    }
}

/// A car the initializer could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCar {
    pub car_id: CarId,
    pub reason: SkipReason,
}

/// Output of [`initialize_layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeOutcome {
    /// Every input industry, in input order, with new placements applied.
    pub industries: Vec<Industry>,
    /// Cars placed during this pass, in placement order.
    pub placements: Vec<(CarId, CarLocation)>,
    pub skipped: Vec<SkippedCar>,
}

impl InitializeOutcome {
    /// Copy `cars`, giving each car placed in this pass its new location.
    /// Cars not placed here are returned unchanged.
    pub fn apply_to_cars(&self, cars: &[RollingStock]) -> Vec<RollingStock> {
        let placed: HashMap<&CarId, &CarLocation> =
            self.placements.iter().map(|(id, loc)| (id, loc)).collect();
        cars.iter()
            .map(|car| match placed.get(&car.id) {
                Some(loc) => {
                    let mut car = car.clone();
                    car.current_location = Some((*loc).clone());
                    car
                }
                None => car.clone(),
            })
            .collect()
    }
}

/// Place every car lacking a current location in its home yard.
///
/// Cars that already have a location are never moved.
pub fn initialize_layout(industries: &[Industry], cars: &[RollingStock]) -> InitializeOutcome {
    let mut working: Vec<Industry> = industries.to_vec();
    let yard_index: HashMap<IndustryId, usize> = working
        .iter()
        .enumerate()
        .filter(|(_, industry)| industry.is_yard())
        .map(|(idx, industry)| (industry.id.clone(), idx))
        .collect();

    let mut placements = Vec::new();
    let mut skipped = Vec::new();

    for car in cars.iter().filter(|c| c.current_location.is_none()) {
        match place_in_home_yard(&mut working, &yard_index, car) {
            Ok(location) => placements.push((car.id.clone(), location)),
            Err(reason) => {
                warn!(car = %car.id, home_yard = %car.home_yard, ?reason, "car left unplaced");
                skipped.push(SkippedCar {
                    car_id: car.id.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        placed = placements.len(),
        skipped = skipped.len(),
        "layout initialization finished"
    );

    InitializeOutcome {
        industries: working,
        placements,
        skipped,
    }
}

fn place_in_home_yard(
    working: &mut [Industry],
    yard_index: &HashMap<IndustryId, usize>,
    car: &RollingStock,
) -> Result<CarLocation, SkipReason> {
    let &idx = yard_index
        .get(&car.home_yard)
        .ok_or_else(|| SkipReason::UnknownHomeYard(car.home_yard.clone()))?;
    let yard = &working[idx];

    let track_id = select_least_occupied_track(&yard.tracks, Some(car.aar_type.as_str()))
        .map_err(SkipReason::Rejected)?
        .ok_or(SkipReason::NoEligibleTrack)?
        .id
        .clone();

    let updated = place_car(yard, &track_id, car).map_err(SkipReason::Rejected)?;
    debug!(car = %car.id, yard = %updated.id, track = %track_id, "placed car in home yard");
    let location = CarLocation {
        industry_id: updated.id.clone(),
        track_id,
    };
    working[idx] = updated;
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn places_unplaced_cars_on_least_occupied_tracks() {
        let industries = vec![yard(
            "yard",
            "loc",
            vec![track("a", 4), track_with_cars("b", 5, &["c0"])],
        )];
        let cars = vec![
            car("c1", "XM", "yard"),
            car("c2", "XM", "yard"),
            car("c3", "XM", "yard"),
        ];

        let outcome = initialize_layout(&industries, &cars);
        let y = find_industry(&outcome.industries, "yard");
        // c1 -> a (0 vs 1), c2 -> a (tie, earliest wins), c3 -> b (2 vs 1).
        assert_eq!(placed_ids(y, "a"), vec!["c1", "c2"]);
        assert_eq!(placed_ids(y, "b"), vec!["c0", "c3"]);
        assert_eq!(outcome.placements.len(), 3);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn placed_cars_are_left_alone() {
        let industries = vec![yard("yard", "loc", vec![track_with_cars("a", 4, &["c1"])])];
        let cars = vec![placed_car("c1", "XM", "yard", "yard", "a")];

        let outcome = initialize_layout(&industries, &cars);
        assert_eq!(outcome.industries, industries);
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.apply_to_cars(&cars), cars);
    }

    #[test]
    fn unknown_home_yard_is_skipped() {
        let industries = vec![yard("yard", "loc", vec![track("a", 4)])];
        let cars = vec![car("c1", "XM", "nowhere"), car("c2", "XM", "yard")];

        let outcome = initialize_layout(&industries, &cars);
        assert_eq!(
            outcome.skipped,
            vec![SkippedCar {
                car_id: CarId::new("c1"),
                reason: SkipReason::UnknownHomeYard(IndustryId::new("nowhere")),
            }]
        );
        assert_eq!(placed_ids(&outcome.industries[0], "a"), vec!["c2"]);
    }

    #[test]
    fn non_yard_industries_are_not_home_yards() {
        let industries = vec![freight("mill", "loc", vec![track("a", 4)])];
        let cars = vec![car("c1", "XM", "mill")];

        let outcome = initialize_layout(&industries, &cars);
        assert_eq!(outcome.industries, industries);
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::UnknownHomeYard(_)
        ));
    }

    #[test]
    fn no_accepting_track_is_skipped() {
        let industries = vec![yard(
            "yard",
            "loc",
            vec![track("a", 4).with_accepted_types(["TANK"])],
        )];
        let outcome = initialize_layout(&industries, &[car("c1", "XM", "yard")]);
        assert_eq!(outcome.skipped[0].reason, SkipReason::NoEligibleTrack);
        assert_eq!(outcome.industries, industries);
    }

    #[test]
    fn full_yard_skips_remaining_cars() {
        let industries = vec![yard("yard", "loc", vec![track("a", 1)])];
        let cars = vec![car("c1", "XM", "yard"), car("c2", "XM", "yard")];

        let outcome = initialize_layout(&industries, &cars);
        assert_eq!(placed_ids(&outcome.industries[0], "a"), vec!["c1"]);
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::Rejected(PlacementError::TrackAtCapacity { .. })
        ));
    }

    #[test]
    fn yard_without_tracks_is_skipped() {
        let industries = vec![yard("yard", "loc", vec![])];
        let outcome = initialize_layout(&industries, &[car("c1", "XM", "yard")]);
        assert_eq!(
            outcome.skipped[0].reason,
            SkipReason::Rejected(PlacementError::EmptyTrackSet)
        );
    }

    #[test]
    fn apply_to_cars_records_new_locations() {
        let industries = vec![yard("yard", "loc", vec![track("a", 4)])];
        let cars = vec![car("c1", "XM", "yard"), car("c2", "XM", "elsewhere")];

        let outcome = initialize_layout(&industries, &cars);
        let updated = outcome.apply_to_cars(&cars);
        assert_eq!(
            updated[0].current_location,
            Some(CarLocation::new("yard", "a"))
        );
        assert!(updated[1].current_location.is_none());
    }
}
