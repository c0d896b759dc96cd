//! Consistency audit for placement state.
//!
//! Compares the two representations of where a car is (the car's own
//! `current_location` and the tracks' `placed_cars`) and the per-track
//! constraints, and reports every disagreement found.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::id::{CarId, IndustryId, TrackId};
use crate::model::{CarLocation, Industry, RollingStock};

// ---------------------------------------------------------------------------
// Discrepancy types
// ---------------------------------------------------------------------------

/// One violation of the placement invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// Two tracks in one industry share an id.
    DuplicateTrackId {
        industry_id: IndustryId,
        track_id: TrackId,
    },
    /// A track holds more cars than its capacity.
    OverCapacity {
        location: CarLocation,
        placed: usize,
        max_cars: u32,
    },
    /// A car id appears more than once on the same track.
    DuplicateOnTrack { car_id: CarId, location: CarLocation },
    /// A car id appears on more than one track.
    PlacedOnMultipleTracks {
        car_id: CarId,
        locations: Vec<CarLocation>,
    },
    /// A track lists a car id with no matching rolling stock record.
    UnknownCarOnTrack { car_id: CarId, location: CarLocation },
    /// A car records a location whose track does not list it.
    LocationWithoutPlacement { car_id: CarId, recorded: CarLocation },
    /// A track lists a car that records no location.
    PlacementWithoutLocation { car_id: CarId, actual: CarLocation },
    /// A car records a different track from the one listing it.
    LocationMismatch {
        car_id: CarId,
        recorded: CarLocation,
        actual: CarLocation,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::DuplicateTrackId {
                industry_id,
                track_id,
            } => write!(f, "industry {industry_id} has two tracks with id {track_id}"),
            Discrepancy::OverCapacity {
                location,
                placed,
                max_cars,
            } => write!(f, "{location} holds {placed} cars but takes {max_cars}"),
            Discrepancy::DuplicateOnTrack { car_id, location } => {
                write!(f, "car {car_id} is listed twice on {location}")
            }
            Discrepancy::PlacedOnMultipleTracks { car_id, locations } => {
                let list: Vec<String> = locations.iter().map(ToString::to_string).collect();
                write!(f, "car {car_id} is on several tracks: {}", list.join(", "))
            }
            Discrepancy::UnknownCarOnTrack { car_id, location } => {
                write!(f, "{location} lists unknown car {car_id}")
            }
            Discrepancy::LocationWithoutPlacement { car_id, recorded } => {
                write!(f, "car {car_id} records {recorded}, which does not list it")
            }
            Discrepancy::PlacementWithoutLocation { car_id, actual } => {
                write!(f, "car {car_id} sits on {actual} but records no location")
            }
            Discrepancy::LocationMismatch {
                car_id,
                recorded,
                actual,
            } => write!(f, "car {car_id} records {recorded} but sits on {actual}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Audit `industries` and `cars` together. An empty result means the layout
/// is consistent.
pub fn audit_layout(industries: &[Industry], cars: &[RollingStock]) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    let mut occurrences: BTreeMap<&CarId, Vec<CarLocation>> = BTreeMap::new();

    for industry in industries {
        let mut track_ids = HashSet::new();
        for track in &industry.tracks {
            let here = CarLocation {
                industry_id: industry.id.clone(),
                track_id: track.id.clone(),
            };
            if !track_ids.insert(&track.id) {
                found.push(Discrepancy::DuplicateTrackId {
                    industry_id: industry.id.clone(),
                    track_id: track.id.clone(),
                });
            }
            if track.placed_cars.len() > track.max_cars as usize {
                found.push(Discrepancy::OverCapacity {
                    location: here.clone(),
                    placed: track.placed_cars.len(),
                    max_cars: track.max_cars,
                });
            }

            let mut seen = HashSet::new();
            for car_id in &track.placed_cars {
                if seen.insert(car_id) {
                    occurrences.entry(car_id).or_default().push(here.clone());
                } else {
                    found.push(Discrepancy::DuplicateOnTrack {
                        car_id: car_id.clone(),
                        location: here.clone(),
                    });
                }
            }
        }
    }

    let by_id: HashMap<&CarId, &RollingStock> = cars.iter().map(|c| (&c.id, c)).collect();

    for (car_id, locations) in &occurrences {
        if locations.len() > 1 {
            found.push(Discrepancy::PlacedOnMultipleTracks {
                car_id: (*car_id).clone(),
                locations: locations.clone(),
            });
        }
        let actual = &locations[0];
        match by_id.get(car_id) {
            None => found.push(Discrepancy::UnknownCarOnTrack {
                car_id: (*car_id).clone(),
                location: actual.clone(),
            }),
            Some(car) => match &car.current_location {
                None => found.push(Discrepancy::PlacementWithoutLocation {
                    car_id: (*car_id).clone(),
                    actual: actual.clone(),
                }),
                Some(recorded) if !locations.contains(recorded) => {
                    found.push(Discrepancy::LocationMismatch {
                        car_id: (*car_id).clone(),
                        recorded: recorded.clone(),
                        actual: actual.clone(),
                    })
                }
                Some(_) => {}
            },
        }
    }

    for car in cars {
        let Some(recorded) = &car.current_location else {
            continue;
        };
        if !occurrences.contains_key(&car.id) {
            found.push(Discrepancy::LocationWithoutPlacement {
                car_id: car.id.clone(),
                recorded: recorded.clone(),
            });
        }
    }

    found
}
