//! Routing cars to destinations that are not on the layout.
//!
//! An off-layout destination cannot be reached directly. Cars bound for one
//! are sent to the nearest fiddle yard first, and the real destination is
//! carried along as the final leg. Nothing here fails loudly: when no route
//! exists the result is `None` and the caller must leave the car's
//! destination unset.

use tracing::debug;

use crate::id::{IndustryId, LocationId, TrackId};
use crate::model::{
    CarDestination, DestinationPoint, FinalDestination, Industry, Location, LocationType,
};

/// Read-only view over locations and industries for destination planning.
#[derive(Debug, Clone, Copy)]
pub struct OffLayoutRoutingService<'a> {
    locations: &'a [Location],
    industries: &'a [Industry],
}

impl<'a> OffLayoutRoutingService<'a> {
    pub fn new(locations: &'a [Location], industries: &'a [Industry]) -> Self {
        Self {
            locations,
            industries,
        }
    }

    pub fn location(&self, id: &LocationId) -> Option<&'a Location> {
        self.locations.iter().find(|l| &l.id == id)
    }

    /// True only for locations explicitly typed [`LocationType::OffLayout`].
    /// Unknown ids are not off-layout.
    pub fn is_off_layout_location(&self, id: &LocationId) -> bool {
        self.location(id)
            .is_some_and(|l| l.location_type == LocationType::OffLayout)
    }

    /// The fiddle yard sharing the origin's block, else the first fiddle
    /// yard on the layout.
    pub fn find_nearest_fiddle_yard(&self, origin: &LocationId) -> Option<&'a Location> {
        let origin = self.location(origin)?;
        let same_block = self
            .locations
            .iter()
            .find(|l| l.is_fiddle_yard() && l.block == origin.block);
        same_block.or_else(|| self.locations.iter().find(|l| l.is_fiddle_yard()))
    }

    /// The yard industry at `location` that can receive cars, if any.
    fn staging_yard(&self, location: &LocationId) -> Option<&'a Industry> {
        self.industries
            .iter()
            .find(|i| &i.location_id == location && i.is_yard())
    }

    /// Build a two-leg destination: first to the nearest fiddle yard's yard
    /// track, then on to the off-layout target.
    ///
    /// The staging track is always the yard's first track.
    pub fn create_off_layout_destination(
        &self,
        origin: &LocationId,
        final_location: &LocationId,
        final_industry: &IndustryId,
        final_track: Option<&TrackId>,
    ) -> Option<CarDestination> {
        let fiddle_yard = self.find_nearest_fiddle_yard(origin)?;
        let yard = self.staging_yard(&fiddle_yard.id)?;
        let staging_track = yard.tracks.first()?;

        debug!(
            origin = %origin,
            fiddle_yard = %fiddle_yard.id,
            destination = %final_location,
            "staging off-layout move through fiddle yard"
        );

        Some(CarDestination {
            immediate_destination: DestinationPoint {
                location_id: fiddle_yard.id.clone(),
                industry_id: yard.id.clone(),
                track_id: staging_track.id.clone(),
            },
            final_destination: Some(FinalDestination {
                location_id: final_location.clone(),
                industry_id: final_industry.clone(),
                track_id: final_track.cloned(),
            }),
        })
    }

    /// Destination for a car at `origin` headed to the given target.
    ///
    /// On-layout targets with a track get a direct single-leg destination.
    /// Off-layout targets are staged through a fiddle yard. Returns `None`
    /// when neither applies.
    pub fn plan_destination(
        &self,
        origin: &LocationId,
        final_location: &LocationId,
        final_industry: &IndustryId,
        final_track: Option<&TrackId>,
    ) -> Option<CarDestination> {
        if self.is_off_layout_location(final_location) {
            return self.create_off_layout_destination(
                origin,
                final_location,
                final_industry,
                final_track,
            );
        }
        Some(CarDestination {
            immediate_destination: DestinationPoint {
                location_id: final_location.clone(),
                industry_id: final_industry.clone(),
                track_id: final_track?.clone(),
            },
            final_destination: None,
        })
    }
}
