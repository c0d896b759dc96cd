//! Shared builders for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::error::StoreError;
use crate::id::*;
use crate::model::*;
use crate::store::LayoutStore;

// ===========================================================================
// Tracks
// ===========================================================================

/// An empty, unrestricted track named after its id.
pub fn track(id: &str, max_cars: u32) -> Track {
    Track::new(id, format!("Track {id}"), max_cars)
}

/// A track already holding `cars` in order.
pub fn track_with_cars(id: &str, max_cars: u32, cars: &[&str]) -> Track {
    let mut t = track(id, max_cars);
    t.placed_cars = cars.iter().map(|c| CarId::new(*c)).collect();
    t
}

// ===========================================================================
// Industries
// ===========================================================================

pub fn industry(
    id: &str,
    industry_type: IndustryType,
    location: &str,
    tracks: Vec<Track>,
) -> Industry {
    Industry {
        id: IndustryId::new(id),
        name: format!("Industry {id}"),
        industry_type,
        location_id: LocationId::new(location),
        block_name: "main".to_string(),
        tracks,
        description: None,
        owner_id: None,
    }
}

pub fn yard(id: &str, location: &str, tracks: Vec<Track>) -> Industry {
    industry(id, IndustryType::Yard, location, tracks)
}

pub fn freight(id: &str, location: &str, tracks: Vec<Track>) -> Industry {
    industry(id, IndustryType::Freight, location, tracks)
}

// ===========================================================================
// Locations
// ===========================================================================

pub fn location(id: &str, block: &str, location_type: LocationType) -> Location {
    Location {
        id: LocationId::new(id),
        station_name: format!("Station {id}"),
        block: block.to_string(),
        location_type,
        description: None,
        owner_id: None,
    }
}

// ===========================================================================
// Rolling stock
// ===========================================================================

/// An unplaced car with no destination.
pub fn car(id: &str, aar_type: &str, home_yard: &str) -> RollingStock {
    RollingStock {
        id: CarId::new(id),
        road_name: "TEST".to_string(),
        road_number: id.to_string(),
        aar_type: aar_type.to_string(),
        description: None,
        color: None,
        note: None,
        home_yard: IndustryId::new(home_yard),
        current_location: None,
        destination: None,
        owner_id: None,
    }
}

/// A car recorded at `industry`/`track`.
pub fn placed_car(
    id: &str,
    aar_type: &str,
    home_yard: &str,
    industry: &str,
    track: &str,
) -> RollingStock {
    let mut c = car(id, aar_type, home_yard);
    c.current_location = Some(CarLocation::new(industry, track));
    c
}

// ===========================================================================
// Queries
// ===========================================================================

pub fn find_industry<'a>(industries: &'a [Industry], id: &str) -> &'a Industry {
    industries
        .iter()
        .find(|i| i.id.as_str() == id)
        .unwrap_or_else(|| panic!("industry {id} missing"))
}

pub fn placed_ids(industry: &Industry, track: &str) -> Vec<String> {
    industry
        .track(&TrackId::new(track))
        .unwrap_or_else(|| panic!("track {track} missing"))
        .placed_cars
        .iter()
        .map(|c| c.0.clone())
        .collect()
}

// ===========================================================================
// Failing store
// ===========================================================================

/// Wraps a store and fails the `fail_on`-th write call (1-based) with
/// [`StoreError::Backend`]. Reads and connection calls pass through.
pub struct FlakyStore<S> {
    inner: S,
    fail_on: usize,
    writes: usize,
}

impl<S: LayoutStore> FlakyStore<S> {
    pub fn new(inner: S, fail_on: usize) -> Self {
        Self {
            inner,
            fail_on,
            writes: 0,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn tick(&mut self) -> Result<(), StoreError> {
        self.writes += 1;
        if self.writes == self.fail_on {
            return Err(StoreError::Backend(format!(
                "injected failure on write {}",
                self.writes
            )));
        }
        Ok(())
    }
}

impl<S: LayoutStore> LayoutStore for FlakyStore<S> {
    fn connect(&mut self) -> Result<(), StoreError> {
        self.inner.connect()
    }

    fn close(&mut self) {
        self.inner.close();
    }

    fn find_all_industries(&self) -> Result<Vec<Industry>, StoreError> {
        self.inner.find_all_industries()
    }

    fn find_all_rolling_stock(&self) -> Result<Vec<RollingStock>, StoreError> {
        self.inner.find_all_rolling_stock()
    }

    fn update_industry_placed_cars(
        &mut self,
        industry_id: &IndustryId,
        track_id: &TrackId,
        car_id: &CarId,
    ) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.update_industry_placed_cars(industry_id, track_id, car_id)
    }

    fn clear_all_placed_cars(&mut self) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.clear_all_placed_cars()
    }

    fn clear_placed_cars(&mut self, industry_id: &IndustryId) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.clear_placed_cars(industry_id)
    }

    fn update_car_location(
        &mut self,
        car_id: &CarId,
        location: Option<&CarLocation>,
    ) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.update_car_location(car_id, location)
    }

    fn clear_car_destination_and_location(&mut self, car_id: &CarId) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.clear_car_destination_and_location(car_id)
    }
}
