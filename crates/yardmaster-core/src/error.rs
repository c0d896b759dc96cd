//! Error types for placement operations and store-backed bulk operations.

use crate::id::{CarId, IndustryId, TrackId};

// ---------------------------------------------------------------------------
// Placement errors
// ---------------------------------------------------------------------------

/// Failures of a single placement-related operation. These are local to
/// the call that produced them and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no tracks to choose from")]
    EmptyTrackSet,

    #[error("track {track_id} not found in industry {industry_id}")]
    TrackNotFound {
        industry_id: IndustryId,
        track_id: TrackId,
    },

    #[error("track '{track_name}' is at capacity ({max_cars} cars)")]
    TrackAtCapacity { track_name: String, max_cars: u32 },

    #[error("track '{track_name}' does not accept car type '{car_type}'")]
    CarTypeNotAccepted { track_name: String, car_type: String },

    #[error("car {car_id} is already placed on track {track_id} of industry {industry_id}")]
    CarAlreadyPlaced {
        car_id: CarId,
        industry_id: IndustryId,
        track_id: TrackId,
    },

    #[error("car {car_id} is not on track {track_id}")]
    CarNotFoundOnTrack { car_id: CarId, track_id: TrackId },

    #[error("industry {0} not found")]
    IndustryNotFound(IndustryId),

    #[error("car {0} not found")]
    CarNotFound(CarId),
}

/// Response class an API layer should map a [`PlacementError`] onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request conflicts with layout constraints (HTTP 400/409).
    Rejected,
    /// A referenced record does not exist (HTTP 404).
    NotFound,
    /// The request itself was malformed (HTTP 400).
    BadRequest,
}

impl PlacementError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PlacementError::EmptyTrackSet => ErrorClass::BadRequest,
            PlacementError::TrackAtCapacity { .. }
            | PlacementError::CarTypeNotAccepted { .. }
            | PlacementError::CarAlreadyPlaced { .. } => ErrorClass::Rejected,
            PlacementError::TrackNotFound { .. }
            | PlacementError::CarNotFoundOnTrack { .. }
            | PlacementError::IndustryNotFound(_)
            | PlacementError::CarNotFound(_) => ErrorClass::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`crate::store::LayoutStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} {id} not found in store")]
    NotFound { kind: &'static str, id: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Operation-fatal failure of the reset-to-home-yard bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    #[error("failed to reset rolling stock: {0}")]
    Store(#[from] StoreError),
}
