//! In-memory layout aggregate that owns both halves of car placement.
//!
//! [`LayoutState`] keeps industries and cars keyed by id and is the single
//! writer of a car's `current_location` and the tracks' `placed_cars`:
//! every placement, removal, and move updates both together or neither.

use std::collections::BTreeMap;

use tracing::debug;

use crate::consistency::{Discrepancy, audit_layout};
use crate::error::PlacementError;
use crate::id::{CarId, IndustryId, TrackId};
use crate::model::{CarLocation, Industry, RollingStock};
use crate::placement::{check_capacity, find_track, place_car, remove_car};

/// Industries and cars keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutState {
    industries: BTreeMap<IndustryId, Industry>,
    cars: BTreeMap<CarId, RollingStock>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing records. Records are taken as-is; run
    /// [`LayoutState::audit`] to check them.
    pub fn from_parts(industries: Vec<Industry>, cars: Vec<RollingStock>) -> Self {
        Self {
            industries: industries.into_iter().map(|i| (i.id.clone(), i)).collect(),
            cars: cars.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn into_parts(self) -> (Vec<Industry>, Vec<RollingStock>) {
        (
            self.industries.into_values().collect(),
            self.cars.into_values().collect(),
        )
    }

    // -- Registration --

    /// Add or replace an industry. Returns the replaced record.
    pub fn add_industry(&mut self, industry: Industry) -> Option<Industry> {
        self.industries.insert(industry.id.clone(), industry)
    }

    /// Add or replace a car. Returns the replaced record.
    pub fn add_car(&mut self, car: RollingStock) -> Option<RollingStock> {
        self.cars.insert(car.id.clone(), car)
    }

    // -- Queries --

    pub fn industry(&self, id: &IndustryId) -> Option<&Industry> {
        self.industries.get(id)
    }

    pub fn car(&self, id: &CarId) -> Option<&RollingStock> {
        self.cars.get(id)
    }

    pub fn industries(&self) -> impl Iterator<Item = &Industry> {
        self.industries.values()
    }

    pub fn cars(&self) -> impl Iterator<Item = &RollingStock> {
        self.cars.values()
    }

    /// Cars on any track of `industry_id`, in track then arrival order.
    /// Ids without a car record are dropped.
    pub fn cars_at_industry(&self, industry_id: &IndustryId) -> Vec<&RollingStock> {
        let Some(industry) = self.industries.get(industry_id) else {
            return Vec::new();
        };
        industry
            .tracks
            .iter()
            .flat_map(|t| t.placed_cars.iter())
            .filter_map(|id| self.cars.get(id))
            .collect()
    }

    /// The track currently listing `car_id`, if any.
    pub fn locate(&self, car_id: &CarId) -> Option<CarLocation> {
        self.industries.values().find_map(|industry| {
            industry.track_holding(car_id).map(|track| CarLocation {
                industry_id: industry.id.clone(),
                track_id: track.id.clone(),
            })
        })
    }

    // -- Placement --

    /// Place `car` on a track and record the location on the car.
    ///
    /// Unless `skip_duplicate_check` is set, a car already listed on any
    /// track is rejected with [`PlacementError::CarAlreadyPlaced`]. Track
    /// existence, capacity, and type acceptance are always enforced.
    pub fn place_car_at_industry(
        &mut self,
        industry_id: &IndustryId,
        track_id: &TrackId,
        mut car: RollingStock,
        skip_duplicate_check: bool,
    ) -> Result<CarLocation, PlacementError> {
        let industry = self
            .industries
            .get(industry_id)
            .ok_or_else(|| PlacementError::IndustryNotFound(industry_id.clone()))?;
        check_capacity(find_track(industry, track_id)?)?;

        if !skip_duplicate_check {
            if let Some(existing) = self.locate(&car.id) {
                return Err(PlacementError::CarAlreadyPlaced {
                    car_id: car.id.clone(),
                    industry_id: existing.industry_id,
                    track_id: existing.track_id,
                });
            }
        }

        let updated = place_car(industry, track_id, &car)?;
        let location = CarLocation {
            industry_id: industry_id.clone(),
            track_id: track_id.clone(),
        };
        debug!(car = %car.id, industry = %industry_id, track = %track_id, "placed car");

        self.industries.insert(industry_id.clone(), updated);
        car.current_location = Some(location.clone());
        self.cars.insert(car.id.clone(), car);
        Ok(location)
    }

    /// Remove `car_id` from a track and clear the car's location.
    pub fn remove_car_from_industry(
        &mut self,
        industry_id: &IndustryId,
        track_id: &TrackId,
        car_id: &CarId,
    ) -> Result<(), PlacementError> {
        let industry = self
            .industries
            .get(industry_id)
            .ok_or_else(|| PlacementError::IndustryNotFound(industry_id.clone()))?;
        let updated = remove_car(industry, track_id, car_id)?;
        self.industries.insert(industry_id.clone(), updated);

        if let Some(car) = self.cars.get_mut(car_id) {
            car.current_location = None;
        }
        debug!(car = %car_id, industry = %industry_id, track = %track_id, "removed car");
        Ok(())
    }

    /// Move a known car to another track, possibly in another industry.
    /// Nothing changes unless both the removal and the placement succeed.
    pub fn move_car(
        &mut self,
        car_id: &CarId,
        to_industry: &IndustryId,
        to_track: &TrackId,
    ) -> Result<CarLocation, PlacementError> {
        let car = self
            .cars
            .get(car_id)
            .ok_or_else(|| PlacementError::CarNotFound(car_id.clone()))?;

        let mut staged: BTreeMap<IndustryId, Industry> = BTreeMap::new();
        if let Some(from) = self.locate(car_id) {
            let source = self
                .industries
                .get(&from.industry_id)
                .ok_or_else(|| PlacementError::IndustryNotFound(from.industry_id.clone()))?;
            staged.insert(
                from.industry_id.clone(),
                remove_car(source, &from.track_id, car_id)?,
            );
        }

        let target = staged
            .get(to_industry)
            .or_else(|| self.industries.get(to_industry))
            .ok_or_else(|| PlacementError::IndustryNotFound(to_industry.clone()))?;
        let placed = place_car(target, to_track, car)?;
        staged.insert(to_industry.clone(), placed);

        let location = CarLocation {
            industry_id: to_industry.clone(),
            track_id: to_track.clone(),
        };
        self.industries.extend(staged);
        if let Some(car) = self.cars.get_mut(car_id) {
            car.current_location = Some(location.clone());
        }
        debug!(car = %car_id, industry = %to_industry, track = %to_track, "moved car");
        Ok(location)
    }

    // -- Bulk --

    /// Replace the industries with `industries`, emptied of cars, and drop
    /// every car record.
    pub fn reset(&mut self, industries: Vec<Industry>) {
        self.cars.clear();
        self.industries = industries
            .into_iter()
            .map(|mut i| {
                i.clear_placed_cars();
                (i.id.clone(), i)
            })
            .collect();
    }

    /// Check the aggregate's placement invariants.
    pub fn audit(&self) -> Vec<Discrepancy> {
        let industries: Vec<Industry> = self.industries.values().cloned().collect();
        let cars: Vec<RollingStock> = self.cars.values().cloned().collect();
        audit_layout(&industries, &cars)
    }
}
