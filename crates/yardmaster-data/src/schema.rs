//! On-disk layout of a layout directory.
//!
//! Record types are the core model types themselves; this module only names
//! the files and provides the TOML wrappers.

use serde::{Deserialize, Serialize};
use yardmaster_core::model::{Industry, Location, RollingStock};

/// Base name of the locations file (`locations.{ron,toml,json}`).
pub const LOCATIONS_FILE: &str = "locations";
/// Base name of the industries file.
pub const INDUSTRIES_FILE: &str = "industries";
/// Base name of the rolling stock file.
pub const ROLLING_STOCK_FILE: &str = "rolling_stock";
/// Base name of the optional operations config file.
pub const OPERATIONS_FILE: &str = "operations";

// ===========================================================================
// TOML wrappers (TOML does not support top-level arrays)
// ===========================================================================

/// Wrapper for a list of locations in TOML format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlLocations {
    pub locations: Vec<Location>,
}

/// Wrapper for a list of industries in TOML format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlIndustries {
    pub industries: Vec<Industry>,
}

/// Wrapper for a list of cars in TOML format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlRollingStock {
    pub rolling_stock: Vec<RollingStock>,
}
