//! Derive each car's current location from the tracks' placed-car lists.
//!
//! The placed-car lists are authoritative here. A car found on a track gets
//! that track as its location; a car found nowhere comes back with no
//! location at all.

use std::collections::HashMap;

use crate::id::CarId;
use crate::model::{CarLocation, Industry, RollingStock};

/// Map every placed car id to the track holding it.
///
/// If a car id appears on more than one track, the last one scanned wins.
/// [`crate::consistency::audit_layout`] reports that case.
pub fn placed_car_index(industries: &[Industry]) -> HashMap<CarId, CarLocation> {
    let mut index = HashMap::new();
    for industry in industries {
        for track in &industry.tracks {
            for car_id in &track.placed_cars {
                index.insert(
                    car_id.clone(),
                    CarLocation {
                        industry_id: industry.id.clone(),
                        track_id: track.id.clone(),
                    },
                );
            }
        }
    }
    index
}

/// Return `cars` with `current_location` rewritten from `industries`.
pub fn sync_car_locations(industries: &[Industry], cars: &[RollingStock]) -> Vec<RollingStock> {
    let index = placed_car_index(industries);
    cars.iter()
        .map(|car| {
            let mut synced = car.clone();
            synced.current_location = index.get(&car.id).cloned();
            synced
        })
        .collect()
}
