//! Layout records: locations, industries with their tracks, and rolling stock.
//!
//! These are plain data records as they come out of the store. Field names
//! serialize in camelCase and absent optionals are omitted rather than
//! written as `null`, so "no location" and "no destination" share one
//! on-disk representation.
//!
//! Placement state lives in two places that must agree: a car's
//! [`RollingStock::current_location`] and the [`Track::placed_cars`] list of
//! the track it names. Only the operations in [`crate::placement`],
//! [`crate::initializer`], [`crate::reset`] and [`crate::layout_state`]
//! write either side.

use crate::id::{CarId, IndustryId, LocationId, TrackId};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Where a location sits relative to the physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// A station modeled on the layout.
    OnLayout,
    /// A destination that exists only on paper.
    OffLayout,
    /// Off-stage staging that stands in for traffic to and from
    /// off-layout locations.
    FiddleYard,
}

/// A station or staging area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub station_name: String,
    pub block: String,
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Location {
    pub fn is_fiddle_yard(&self) -> bool {
        self.location_type == LocationType::FiddleYard
    }
}

// ---------------------------------------------------------------------------
// Tracks and industries
// ---------------------------------------------------------------------------

/// A track inside an industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TrackRecord")]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Maximum number of cars. Older records call this `capacity`, and
    /// exported records may carry both keys.
    pub max_cars: u32,
    /// Cars on the track in arrival order.
    #[serde(default)]
    pub placed_cars: Vec<CarId>,
    /// AAR type codes this track accepts. Empty accepts everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_car_types: Vec<String>,
}

impl Track {
    pub fn new(id: impl Into<TrackId>, name: impl Into<String>, max_cars: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_cars,
            placed_cars: Vec::new(),
            accepted_car_types: Vec::new(),
        }
    }

    /// Restrict the track to the given car types.
    pub fn with_accepted_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_car_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn car_count(&self) -> usize {
        self.placed_cars.len()
    }

    pub fn is_full(&self) -> bool {
        self.placed_cars.len() >= self.max_cars as usize
    }

    pub fn remaining_capacity(&self) -> usize {
        (self.max_cars as usize).saturating_sub(self.placed_cars.len())
    }

    pub fn contains_car(&self, car_id: &CarId) -> bool {
        self.placed_cars.contains(car_id)
    }

    /// Whether a car of `car_type` may be spotted here. An empty allow-list
    /// accepts every type.
    pub fn accepts(&self, car_type: &str) -> bool {
        self.accepted_car_types.is_empty()
            || self.accepted_car_types.iter().any(|t| t == car_type)
    }
}

/// A track as stored, where the capacity may sit under `maxCars`,
/// `capacity`, or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRecord {
    id: TrackId,
    name: String,
    #[serde(default, deserialize_with = "some_u32")]
    max_cars: Option<u32>,
    #[serde(default, deserialize_with = "some_u32")]
    capacity: Option<u32>,
    #[serde(default)]
    placed_cars: Vec<CarId>,
    #[serde(default)]
    accepted_car_types: Vec<String>,
}

/// Reads a bare number into `Some`, so formats without implicit options
/// (RON) accept `maxCars: 6`.
fn some_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    u32::deserialize(deserializer).map(Some)
}

impl TryFrom<TrackRecord> for Track {
    type Error = String;

    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        let max_cars = match (record.max_cars, record.capacity) {
            (Some(max), Some(legacy)) if max != legacy => {
                return Err(format!(
                    "track {}: maxCars {max} disagrees with capacity {legacy}",
                    record.id
                ));
            }
            (Some(max), _) | (None, Some(max)) => max,
            (None, None) => {
                return Err(format!("track {}: missing maxCars", record.id));
            }
        };
        Ok(Track {
            id: record.id,
            name: record.name,
            max_cars,
            placed_cars: record.placed_cars,
            accepted_car_types: record.accepted_car_types,
        })
    }
}

/// Broad category of an industry. Only [`IndustryType::Yard`] industries
/// serve as home yards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndustryType {
    Freight,
    Yard,
    Passenger,
}

/// An industry and the tracks it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: IndustryId,
    pub name: String,
    pub industry_type: IndustryType,
    pub location_id: LocationId,
    pub block_name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Industry {
    pub fn track(&self, track_id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == track_id)
    }

    pub fn track_mut(&mut self, track_id: &TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| &t.id == track_id)
    }

    pub fn is_yard(&self) -> bool {
        self.industry_type == IndustryType::Yard
    }

    /// Total cars across every track of this industry.
    pub fn placed_car_count(&self) -> usize {
        self.tracks.iter().map(Track::car_count).sum()
    }

    /// Empty every track's placed-car list.
    pub fn clear_placed_cars(&mut self) {
        for track in &mut self.tracks {
            track.placed_cars.clear();
        }
    }

    /// Find the track currently holding `car_id`.
    pub fn track_holding(&self, car_id: &CarId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.contains_car(car_id))
    }
}

// ---------------------------------------------------------------------------
// Rolling stock
// ---------------------------------------------------------------------------

/// The track a car currently occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarLocation {
    pub industry_id: IndustryId,
    pub track_id: TrackId,
}

impl CarLocation {
    pub fn new(industry_id: impl Into<IndustryId>, track_id: impl Into<TrackId>) -> Self {
        Self {
            industry_id: industry_id.into(),
            track_id: track_id.into(),
        }
    }
}

impl std::fmt::Display for CarLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.industry_id, self.track_id)
    }
}

/// A fully specified stop: location, industry and track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPoint {
    pub location_id: LocationId,
    pub industry_id: IndustryId,
    pub track_id: TrackId,
}

/// The real end point of a staged move. The track may be left to the
/// crew working the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDestination {
    pub location_id: LocationId,
    pub industry_id: IndustryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,
}

/// A pending move. `final_destination` is only present when the move
/// stages through a fiddle yard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDestination {
    pub immediate_destination: DestinationPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_destination: Option<FinalDestination>,
}

/// A car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingStock {
    pub id: CarId,
    pub road_name: String,
    pub road_number: String,
    /// AAR type code, checked against [`Track::accepted_car_types`].
    pub aar_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub home_yard: IndustryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<CarLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<CarDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl RollingStock {
    /// Reporting marks, e.g. `ATSF 12345`.
    pub fn reporting_mark(&self) -> String {
        format!("{} {}", self.road_name, self.road_number)
    }

    pub fn is_placed(&self) -> bool {
        self.current_location.is_some()
    }
}
