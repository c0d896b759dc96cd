//! Placing cars on, and removing cars from, industry tracks.
//!
//! Both operations are pure: they return a new [`Industry`] and leave the
//! input untouched. Placement only updates the track side of the
//! car-location pair; use [`place_car_with_location`] to get the matching
//! [`CarLocation`] alongside it.

use crate::error::PlacementError;
use crate::id::{CarId, TrackId};
use crate::model::{CarLocation, Industry, RollingStock, Track};

/// Result of a placement: the updated industry plus the location the car
/// record must be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub industry: Industry,
    pub location: CarLocation,
}

impl Placement {
    /// Copy of `car` with its current location set to this placement.
    pub fn apply_to(&self, car: &RollingStock) -> RollingStock {
        let mut placed = car.clone();
        placed.current_location = Some(self.location.clone());
        placed
    }
}

pub(crate) fn find_track<'a>(
    industry: &'a Industry,
    track_id: &TrackId,
) -> Result<&'a Track, PlacementError> {
    industry
        .track(track_id)
        .ok_or_else(|| PlacementError::TrackNotFound {
            industry_id: industry.id.clone(),
            track_id: track_id.clone(),
        })
}

pub(crate) fn check_capacity(track: &Track) -> Result<(), PlacementError> {
    if track.is_full() {
        return Err(PlacementError::TrackAtCapacity {
            track_name: track.name.clone(),
            max_cars: track.max_cars,
        });
    }
    Ok(())
}

pub(crate) fn check_accepts(track: &Track, car: &RollingStock) -> Result<(), PlacementError> {
    if !track.accepts(&car.aar_type) {
        return Err(PlacementError::CarTypeNotAccepted {
            track_name: track.name.clone(),
            car_type: car.aar_type.clone(),
        });
    }
    Ok(())
}

/// Append `car` to the end of track `track_id` in `industry`.
///
/// Checks, in order: the track exists, it has room, the car is not already
/// on it, and it accepts the car's type.
pub fn place_car(
    industry: &Industry,
    track_id: &TrackId,
    car: &RollingStock,
) -> Result<Industry, PlacementError> {
    let track = find_track(industry, track_id)?;
    check_capacity(track)?;
    if track.contains_car(&car.id) {
        return Err(PlacementError::CarAlreadyPlaced {
            car_id: car.id.clone(),
            industry_id: industry.id.clone(),
            track_id: track_id.clone(),
        });
    }
    check_accepts(track, car)?;

    let mut updated = industry.clone();
    if let Some(track) = updated.track_mut(track_id) {
        track.placed_cars.push(car.id.clone());
    }
    Ok(updated)
}

/// [`place_car`], also returning the location to record on the car.
pub fn place_car_with_location(
    industry: &Industry,
    track_id: &TrackId,
    car: &RollingStock,
) -> Result<Placement, PlacementError> {
    let industry = place_car(industry, track_id, car)?;
    Ok(Placement {
        location: CarLocation {
            industry_id: industry.id.clone(),
            track_id: track_id.clone(),
        },
        industry,
    })
}

/// Remove `car_id` from track `track_id`, keeping the order of the rest.
pub fn remove_car(
    industry: &Industry,
    track_id: &TrackId,
    car_id: &CarId,
) -> Result<Industry, PlacementError> {
    let track = find_track(industry, track_id)?;
    if !track.contains_car(car_id) {
        return Err(PlacementError::CarNotFoundOnTrack {
            car_id: car_id.clone(),
            track_id: track_id.clone(),
        });
    }

    let mut updated = industry.clone();
    if let Some(track) = updated.track_mut(track_id) {
        track.placed_cars.retain(|c| c != car_id);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::select_least_occupied_track;
    use crate::test_utils::*;

    fn two_track_yard() -> Industry {
        yard(
            "yard",
            "loc",
            vec![track_with_cars("a", 4, &[]), track_with_cars("b", 5, &["c0"])],
        )
    }

    #[test]
    fn selector_then_place_on_least_occupied() {
        let y = two_track_yard();
        let picked = select_least_occupied_track(&y.tracks, Some("XM"))
            .unwrap()
            .unwrap();
        assert_eq!(picked.id.as_str(), "a");

        let updated = place_car(&y, &picked.id, &car("c1", "XM", "yard")).unwrap();
        assert_eq!(placed_ids(&updated, "a"), vec!["c1"]);
        assert_eq!(placed_ids(&updated, "b"), vec!["c0"]);
    }

    #[test]
    fn place_appends_in_arrival_order() {
        let y = yard("yard", "loc", vec![track_with_cars("a", 4, &["c0"])]);
        let y = place_car(&y, &TrackId::new("a"), &car("c1", "XM", "yard")).unwrap();
        let y = place_car(&y, &TrackId::new("a"), &car("c2", "XM", "yard")).unwrap();
        assert_eq!(placed_ids(&y, "a"), vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn place_on_missing_track() {
        let y = two_track_yard();
        let err = place_car(&y, &TrackId::new("zz"), &car("c1", "XM", "yard")).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::TrackNotFound { ref track_id, .. } if track_id.as_str() == "zz"
        ));
    }

    #[test]
    fn place_on_full_track_fails_without_mutation() {
        let y = yard("yard", "loc", vec![track_with_cars("a", 2, &["c0", "c1"])]);
        let before = y.clone();
        let err = place_car(&y, &TrackId::new("a"), &car("c2", "XM", "yard")).unwrap_err();
        assert!(matches!(err, PlacementError::TrackAtCapacity { max_cars: 2, .. }));
        assert_eq!(y, before);
    }

    #[test]
    fn capacity_is_checked_before_type() {
        let y = yard(
            "yard",
            "loc",
            vec![track_with_cars("a", 1, &["c0"]).with_accepted_types(["TANK"])],
        );
        let err = place_car(&y, &TrackId::new("a"), &car("c1", "XM", "yard")).unwrap_err();
        assert!(matches!(err, PlacementError::TrackAtCapacity { .. }));
    }

    #[test]
    fn rejected_type_names_track_and_type() {
        let mut t = track("a", 4).with_accepted_types(["TANK", "HOPPER"]);
        t.name = "Tank Spur".into();
        let y = freight("refinery", "loc", vec![t]);
        let err = place_car(&y, &TrackId::new("a"), &car("c1", "XM", "yard")).unwrap_err();
        assert_eq!(
            err,
            PlacementError::CarTypeNotAccepted {
                track_name: "Tank Spur".into(),
                car_type: "XM".into(),
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("Tank Spur") && msg.contains("XM"));
    }

    #[test]
    fn same_car_twice_on_one_track_is_rejected() {
        let y = yard("yard", "loc", vec![track_with_cars("a", 4, &["c1"])]);
        let err = place_car(&y, &TrackId::new("a"), &car("c1", "XM", "yard")).unwrap_err();
        assert!(matches!(err, PlacementError::CarAlreadyPlaced { .. }));
    }

    #[test]
    fn place_with_location_returns_both_halves() {
        let y = two_track_yard();
        let c = car("c1", "XM", "yard");
        let placement = place_car_with_location(&y, &TrackId::new("b"), &c).unwrap();
        assert_eq!(placement.location, CarLocation::new("yard", "b"));
        assert_eq!(placed_ids(&placement.industry, "b"), vec!["c0", "c1"]);

        let placed = placement.apply_to(&c);
        assert_eq!(placed.current_location, Some(CarLocation::new("yard", "b")));
        assert!(c.current_location.is_none());
    }

    #[test]
    fn place_then_remove_restores_industry() {
        let y = two_track_yard();
        let c = car("c1", "XM", "yard");
        let placed = place_car(&y, &TrackId::new("b"), &c).unwrap();
        let removed = remove_car(&placed, &TrackId::new("b"), &c.id).unwrap();
        assert_eq!(removed, y);
    }

    #[test]
    fn remove_preserves_order_of_remaining_cars() {
        let y = yard("yard", "loc", vec![track_with_cars("a", 4, &["c0", "c1", "c2"])]);
        let y = remove_car(&y, &TrackId::new("a"), &CarId::new("c1")).unwrap();
        assert_eq!(placed_ids(&y, "a"), vec!["c0", "c2"]);
    }

    #[test]
    fn remove_missing_car_or_track() {
        let y = two_track_yard();
        let err = remove_car(&y, &TrackId::new("a"), &CarId::new("c0")).unwrap_err();
        assert!(matches!(err, PlacementError::CarNotFoundOnTrack { .. }));

        let err = remove_car(&y, &TrackId::new("nope"), &CarId::new("c0")).unwrap_err();
        assert!(matches!(err, PlacementError::TrackNotFound { .. }));
    }
}
