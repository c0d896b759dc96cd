//! Yardmaster Core -- car placement and yard assignment for model railroad
//! operations.
//!
//! This crate decides which track a car occupies, enforces per-track
//! capacity and car-type acceptance, and keeps the two records of where a
//! car is (the car's `current_location` and the track's `placed_cars`) in
//! agreement.
//!
//! # Key Types
//!
//! - [`model`] -- Locations, industries, tracks, and rolling stock records.
//! - [`selector::select_least_occupied_track`] -- Least-occupied-track rule
//!   with car-type filtering.
//! - [`placement`] -- Pure placement and removal on a single industry.
//! - [`initializer::initialize_layout`] -- Places every unplaced car in its
//!   home yard, accumulating occupancy across the pass.
//! - [`reset::reset_to_home_yards`] -- Store-backed bulk reset of all rolling
//!   stock.
//! - [`routing::OffLayoutRoutingService`] -- Stages moves to off-layout
//!   destinations through fiddle yards.
//! - [`sync::sync_car_locations`] -- Rebuilds car locations from the tracks.
//! - [`layout_state::LayoutState`] -- In-memory aggregate that writes both
//!   sides of a placement together.
//! - [`consistency::audit_layout`] -- Reports every invariant violation.
//! - [`store::LayoutStore`] -- Storage capability the bulk reset runs
//!   against.

pub mod config;
pub mod consistency;
pub mod error;
pub mod id;
pub mod initializer;
pub mod layout_state;
pub mod model;
pub mod placement;
pub mod reset;
pub mod routing;
pub mod selector;
pub mod store;
pub mod sync;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
