//! Storage capability consumed by store-backed operations.
//!
//! [`LayoutStore`] is the narrow surface bulk operations need from the
//! document store: fetch everything, push a car onto a track, and write
//! or clear a car's location. Each call is atomic on its own; nothing
//! spans calls. [`InMemoryStore`] implements it over plain vectors.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::error::StoreError;
use crate::id::{CarId, IndustryId, TrackId};
use crate::model::{CarLocation, Industry, RollingStock};

/// Store operations over industries and rolling stock.
pub trait LayoutStore {
    /// Acquire a connection. Paired with [`LayoutStore::close`].
    fn connect(&mut self) -> Result<(), StoreError>;

    /// Release the connection acquired by [`LayoutStore::connect`].
    fn close(&mut self);

    fn find_all_industries(&self) -> Result<Vec<Industry>, StoreError>;

    fn find_all_rolling_stock(&self) -> Result<Vec<RollingStock>, StoreError>;

    /// Push `car_id` onto the end of a track's placed cars.
    fn update_industry_placed_cars(
        &mut self,
        industry_id: &IndustryId,
        track_id: &TrackId,
        car_id: &CarId,
    ) -> Result<(), StoreError>;

    /// Empty the placed cars of every track of every industry.
    fn clear_all_placed_cars(&mut self) -> Result<(), StoreError>;

    /// Empty the placed cars of every track of one industry.
    fn clear_placed_cars(&mut self, industry_id: &IndustryId) -> Result<(), StoreError>;

    /// Set a car's location, or remove the field when `location` is `None`.
    fn update_car_location(
        &mut self,
        car_id: &CarId,
        location: Option<&CarLocation>,
    ) -> Result<(), StoreError>;

    /// Remove both the location and the destination of a car.
    fn clear_car_destination_and_location(&mut self, car_id: &CarId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Connection guard
// ---------------------------------------------------------------------------

/// An open connection that is closed when dropped, on success and error
/// paths alike.
pub struct StoreConnection<'a, S: LayoutStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: LayoutStore + ?Sized> StoreConnection<'a, S> {
    pub fn open(store: &'a mut S) -> Result<Self, StoreError> {
        store.connect()?;
        Ok(Self { store })
    }
}

impl<S: LayoutStore + ?Sized> Deref for StoreConnection<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: LayoutStore + ?Sized> DerefMut for StoreConnection<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.store
    }
}

impl<S: LayoutStore + ?Sized> Drop for StoreConnection<'_, S> {
    fn drop(&mut self) {
        self.store.close();
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A [`LayoutStore`] holding records in memory. Keeps records in insertion
/// order and counts connections and writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    industries: Vec<Industry>,
    rolling_stock: Vec<RollingStock>,
    open_connections: usize,
    writes: usize,
}

impl InMemoryStore {
    pub fn new(industries: Vec<Industry>, rolling_stock: Vec<RollingStock>) -> Self {
        Self {
            industries,
            rolling_stock,
            open_connections: 0,
            writes: 0,
        }
    }

    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    pub fn rolling_stock(&self) -> &[RollingStock] {
        &self.rolling_stock
    }

    pub fn into_parts(self) -> (Vec<Industry>, Vec<RollingStock>) {
        (self.industries, self.rolling_stock)
    }

    /// Connections opened and not yet closed.
    pub fn open_connections(&self) -> usize {
        self.open_connections
    }

    /// Number of successful write calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn car_mut(&mut self, car_id: &CarId) -> Result<&mut RollingStock, StoreError> {
        self.rolling_stock
            .iter_mut()
            .find(|c| &c.id == car_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "rolling stock",
                id: car_id.to_string(),
            })
    }

    fn industry_mut(&mut self, industry_id: &IndustryId) -> Result<&mut Industry, StoreError> {
        self.industries
            .iter_mut()
            .find(|i| &i.id == industry_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "industry",
                id: industry_id.to_string(),
            })
    }
}

impl LayoutStore for InMemoryStore {
    fn connect(&mut self) -> Result<(), StoreError> {
        self.open_connections += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.open_connections = self.open_connections.saturating_sub(1);
    }

    fn find_all_industries(&self) -> Result<Vec<Industry>, StoreError> {
        Ok(self.industries.clone())
    }

    fn find_all_rolling_stock(&self) -> Result<Vec<RollingStock>, StoreError> {
        Ok(self.rolling_stock.clone())
    }

    fn update_industry_placed_cars(
        &mut self,
        industry_id: &IndustryId,
        track_id: &TrackId,
        car_id: &CarId,
    ) -> Result<(), StoreError> {
        let industry = self.industry_mut(industry_id)?;
        let track = industry
            .track_mut(track_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "track",
                id: track_id.to_string(),
            })?;
        track.placed_cars.push(car_id.clone());
        self.writes += 1;
        debug!(industry = %industry_id, track = %track_id, car = %car_id, "pushed placed car");
        Ok(())
    }

    fn clear_all_placed_cars(&mut self) -> Result<(), StoreError> {
        for industry in &mut self.industries {
            industry.clear_placed_cars();
        }
        self.writes += 1;
        Ok(())
    }

    fn clear_placed_cars(&mut self, industry_id: &IndustryId) -> Result<(), StoreError> {
        self.industry_mut(industry_id)?.clear_placed_cars();
        self.writes += 1;
        Ok(())
    }

    fn update_car_location(
        &mut self,
        car_id: &CarId,
        location: Option<&CarLocation>,
    ) -> Result<(), StoreError> {
        self.car_mut(car_id)?.current_location = location.cloned();
        self.writes += 1;
        Ok(())
    }

    fn clear_car_destination_and_location(&mut self, car_id: &CarId) -> Result<(), StoreError> {
        let car = self.car_mut(car_id)?;
        car.current_location = None;
        car.destination = None;
        self.writes += 1;
        Ok(())
    }
}
