//! Layout directory loading: reads data files, checks cross-references, and
//! writes layouts back.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! (de)serialization helpers used by [`load_layout`] and [`write_layout`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use yardmaster_core::config::OperationsConfig;
use yardmaster_core::model::{Industry, Location, RollingStock};

use crate::schema::{
    INDUSTRIES_FILE, LOCATIONS_FILE, OPERATIONS_FILE, ROLLING_STOCK_FILE, TomlIndustries,
    TomlLocations, TomlRollingStock,
};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading or writing a layout directory.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A serialization error occurred while writing.
    #[error("cannot serialize {file}: {detail}")]
    Serialize { file: PathBuf, detail: String },

    /// An id reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate id was found.
    #[error("duplicate id '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A track that can never hold a car.
    #[error("track '{track}' of industry '{industry}' in {file} has maxCars 0")]
    ZeroCapacity {
        file: PathBuf,
        industry: String,
        track: String,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for format in Format::ALL {
        let candidate = dir.join(format!("{base_name}.{}", format.extension()));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table.remove(toml_key).ok_or_else(|| {
                parse_error(path, format!("missing key '{toml_key}' in TOML file"))
            })?;
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Serialization
// ===========================================================================

/// Serialize `value` in `format`.
pub fn serialize_value<T: Serialize>(
    value: &T,
    format: Format,
    path: &Path,
) -> Result<String, DataLoadError> {
    let to_err = |detail: String| DataLoadError::Serialize {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| to_err(e.to_string())),
        Format::Json => serde_json::to_string_pretty(value).map_err(|e| to_err(e.to_string())),
        Format::Toml => toml::to_string_pretty(value).map_err(|e| to_err(e.to_string())),
    }
}

/// Write a list to `{dir}/{base_name}.{ext}`. TOML gets the `wrap`ped table
/// since it has no top-level arrays.
fn write_list<T: Serialize, W: Serialize>(
    dir: &Path,
    base_name: &str,
    format: Format,
    items: &[T],
    wrap: impl FnOnce() -> W,
) -> Result<PathBuf, DataLoadError> {
    let path = dir.join(format!("{base_name}.{}", format.extension()));

    // Refuse to leave two formats side by side; the next load would fail.
    for other in Format::ALL.into_iter().filter(|f| *f != format) {
        let stale = dir.join(format!("{base_name}.{}", other.extension()));
        if stale.exists() {
            return Err(DataLoadError::ConflictingFormats { a: stale, b: path });
        }
    }

    let content = match format {
        Format::Toml => serialize_value(&wrap(), format, &path)?,
        _ => serialize_value(&items, format, &path)?,
    };
    std::fs::write(&path, content)?;
    debug!(file = %path.display(), records = items.len(), "wrote data file");
    Ok(path)
}

// ===========================================================================
// Id resolution helpers
// ===========================================================================

/// Look up an id in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether an id already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Layout loading
// ===========================================================================

/// Everything read from a layout directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutData {
    pub locations: Vec<Location>,
    pub industries: Vec<Industry>,
    pub rolling_stock: Vec<RollingStock>,
    /// From `operations.*`, or defaults when that file is absent.
    pub config: OperationsConfig,
}

/// Load and validate a layout directory.
///
/// Requires `locations`, `industries`, and `rolling_stock` files; the
/// `operations` file is optional. Ids must be unique per kind (track ids per
/// industry), tracks must hold at least one car, industries must reference
/// known locations, and placed cars must be known cars. A car whose home
/// yard is unknown loads fine and is only logged, since placement skips it.
pub fn load_layout(dir: &Path) -> Result<LayoutData, DataLoadError> {
    // Locations.
    let locations_path = require_data_file(dir, LOCATIONS_FILE)?;
    let locations: Vec<Location> = deserialize_list(&locations_path, "locations")?;
    let mut location_index: HashMap<String, usize> = HashMap::new();
    for (i, location) in locations.iter().enumerate() {
        check_duplicate(&location_index, location.id.as_str(), &locations_path)?;
        location_index.insert(location.id.as_str().to_string(), i);
    }

    // Industries and their tracks.
    let industries_path = require_data_file(dir, INDUSTRIES_FILE)?;
    let industries: Vec<Industry> = deserialize_list(&industries_path, "industries")?;
    let mut industry_index: HashMap<String, usize> = HashMap::new();
    for (i, industry) in industries.iter().enumerate() {
        check_duplicate(&industry_index, industry.id.as_str(), &industries_path)?;
        resolve_name(
            &location_index,
            industry.location_id.as_str(),
            &industries_path,
            "location",
        )?;
        let mut track_ids: HashSet<&str> = HashSet::new();
        for track in &industry.tracks {
            if !track_ids.insert(track.id.as_str()) {
                return Err(DataLoadError::DuplicateName {
                    file: industries_path.clone(),
                    name: track.id.to_string(),
                });
            }
            if track.max_cars == 0 {
                return Err(DataLoadError::ZeroCapacity {
                    file: industries_path.clone(),
                    industry: industry.id.to_string(),
                    track: track.id.to_string(),
                });
            }
        }
        industry_index.insert(industry.id.as_str().to_string(), i);
    }

    // Rolling stock.
    let cars_path = require_data_file(dir, ROLLING_STOCK_FILE)?;
    let rolling_stock: Vec<RollingStock> = deserialize_list(&cars_path, "rolling_stock")?;
    let mut car_index: HashMap<String, usize> = HashMap::new();
    for (i, car) in rolling_stock.iter().enumerate() {
        check_duplicate(&car_index, car.id.as_str(), &cars_path)?;
        car_index.insert(car.id.as_str().to_string(), i);
    }

    for industry in &industries {
        for track in &industry.tracks {
            for car_id in &track.placed_cars {
                resolve_name(&car_index, car_id.as_str(), &industries_path, "car")?;
            }
        }
    }

    let yard_ids: HashSet<&str> = industries
        .iter()
        .filter(|i| i.is_yard())
        .map(|i| i.id.as_str())
        .collect();
    for car in &rolling_stock {
        if !yard_ids.contains(car.home_yard.as_str()) {
            warn!(
                car = %car.id,
                home_yard = %car.home_yard,
                "home yard is not a known yard; the car will not be placed automatically"
            );
        }
    }

    // Operations config.
    let config = match find_data_file(dir, OPERATIONS_FILE)? {
        Some(path) => deserialize_file(&path)?,
        None => OperationsConfig::default(),
    };

    info!(
        dir = %dir.display(),
        locations = locations.len(),
        industries = industries.len(),
        cars = rolling_stock.len(),
        "loaded layout"
    );

    Ok(LayoutData {
        locations,
        industries,
        rolling_stock,
        config,
    })
}

/// Write the locations, industries and rolling stock of `data` into `dir`
/// in `format`, creating the directory if needed. The operations config is
/// left untouched.
///
/// Fails with [`DataLoadError::ConflictingFormats`] if `dir` already holds
/// one of those files in a different format.
pub fn write_layout(dir: &Path, data: &LayoutData, format: Format) -> Result<(), DataLoadError> {
    std::fs::create_dir_all(dir)?;

    write_list(dir, LOCATIONS_FILE, format, &data.locations, || TomlLocations {
        locations: data.locations.clone(),
    })?;
    write_list(dir, INDUSTRIES_FILE, format, &data.industries, || TomlIndustries {
        industries: data.industries.clone(),
    })?;
    write_list(dir, ROLLING_STOCK_FILE, format, &data.rolling_stock, || {
        TomlRollingStock {
            rolling_stock: data.rolling_stock.clone(),
        }
    })?;

    info!(dir = %dir.display(), ?format, "wrote layout");
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use yardmaster_core::config::ResetScope;
    use yardmaster_core::model::{CarLocation, LocationType};
    use yardmaster_core::test_utils::*;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "yardmaster_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const LOCATIONS_JSON: &str = r#"[
        {"id": "springfield", "stationName": "Springfield", "block": "east", "locationType": "ON_LAYOUT"},
        {"id": "staging", "stationName": "Staging", "block": "east", "locationType": "FIDDLE_YARD"}
    ]"#;

    const INDUSTRIES_JSON: &str = r#"[
        {"id": "east-yard", "name": "East Yard", "industryType": "YARD",
         "locationId": "springfield", "blockName": "east",
         "tracks": [
            {"id": "y1", "name": "Yard 1", "maxCars": 4, "placedCars": ["c1"]},
            {"id": "y2", "name": "Yard 2", "capacity": 4}
         ]},
        {"id": "mill", "name": "Mill", "industryType": "FREIGHT",
         "locationId": "springfield", "blockName": "east",
         "tracks": [{"id": "dock", "name": "Dock", "maxCars": 2, "acceptedCarTypes": ["XM"]}]}
    ]"#;

    const CARS_JSON: &str = r#"[
        {"id": "c1", "roadName": "ATSF", "roadNumber": "100", "aarType": "XM",
         "homeYard": "east-yard", "currentLocation": {"industryId": "east-yard", "trackId": "y1"}},
        {"id": "c2", "roadName": "UP", "roadNumber": "200", "aarType": "TANK", "homeYard": "east-yard"}
    ]"#;

    fn write_sample(dir: &Path) {
        fs::write(dir.join("locations.json"), LOCATIONS_JSON).unwrap();
        fs::write(dir.join("industries.json"), INDUSTRIES_JSON).unwrap();
        fs::write(dir.join("rolling_stock.json"), CARS_JSON).unwrap();
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("cars.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("cars.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("cars.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["cars.yaml", "cars"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        fs::write(dir.join("locations.toml"), "").unwrap();

        assert_eq!(
            find_data_file(&dir, "locations").unwrap(),
            Some(dir.join("locations.toml"))
        );
        assert_eq!(find_data_file(&dir, "industries").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("locations.ron"), "[]").unwrap();
        fs::write(dir.join("locations.json"), "[]").unwrap();

        let result = find_data_file(&dir, "locations");
        assert!(matches!(result, Err(DataLoadError::ConflictingFormats { .. })));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "rolling_stock");
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "rolling_stock"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file / deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_ron() {
        let dir = make_test_dir("list_ron");
        let path = dir.join("locations.ron");
        fs::write(
            &path,
            r#"[(id: "a", stationName: "A", block: "east", locationType: OFF_LAYOUT)]"#,
        )
        .unwrap();

        let locations: Vec<Location> = deserialize_list(&path, "locations").unwrap();
        assert_eq!(locations[0].location_type, LocationType::OffLayout);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("locations.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<Location>, _> = deserialize_list(&path, "locations");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("operations.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<OperationsConfig, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // resolve_name / check_duplicate
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_and_duplicate_helpers() {
        let mut map = HashMap::new();
        map.insert("c1".to_string(), 0usize);

        assert_eq!(*resolve_name(&map, "c1", Path::new("x.json"), "car").unwrap(), 0);
        assert!(matches!(
            resolve_name(&map, "c9", Path::new("x.json"), "car"),
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "car", .. }) if name == "c9"
        ));
        assert!(check_duplicate(&map, "c2", Path::new("x.json")).is_ok());
        assert!(matches!(
            check_duplicate(&map, "c1", Path::new("x.json")),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "c1"
        ));
    }

    // -----------------------------------------------------------------------
    // load_layout
    // -----------------------------------------------------------------------

    #[test]
    fn load_layout_json() {
        let dir = make_test_dir("load_json");
        write_sample(&dir);

        let data = load_layout(&dir).unwrap();
        assert_eq!(data.locations.len(), 2);
        assert_eq!(data.industries.len(), 2);
        assert_eq!(data.rolling_stock.len(), 2);
        assert_eq!(data.industries[0].tracks[1].max_cars, 4);
        assert_eq!(
            data.rolling_stock[0].current_location,
            Some(CarLocation::new("east-yard", "y1"))
        );
        assert_eq!(data.config, OperationsConfig::default());

        cleanup(&dir);
    }

    #[test]
    fn load_layout_reads_operations_toml() {
        let dir = make_test_dir("load_ops");
        write_sample(&dir);
        fs::write(
            dir.join("operations.toml"),
            "[reset]\nscope = \"yards_only\"\n\n[placement]\nstrict_duplicate_check = false\n",
        )
        .unwrap();

        let data = load_layout(&dir).unwrap();
        assert_eq!(data.config.reset.scope, ResetScope::YardsOnly);
        assert!(data.config.reset.respect_capacity);
        assert!(!data.config.placement.strict_duplicate_check);

        cleanup(&dir);
    }

    #[test]
    fn load_layout_missing_rolling_stock() {
        let dir = make_test_dir("load_missing");
        write_sample(&dir);
        fs::remove_file(dir.join("rolling_stock.json")).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_duplicate_car() {
        let dir = make_test_dir("load_dup_car");
        write_sample(&dir);
        let cars = CARS_JSON.replace(r#""id": "c2""#, r#""id": "c1""#);
        fs::write(dir.join("rolling_stock.json"), cars).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "c1"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_reads_exported_capacity_keys() {
        let dir = make_test_dir("load_exported");
        write_sample(&dir);
        // Store exports write the legacy key next to maxCars.
        let industries = INDUSTRIES_JSON
            .replace(r#""maxCars": 4"#, r#""maxCars": 4, "capacity": 4"#)
            .replace(r#""maxCars": 2"#, r#""capacity": 2, "maxCars": 2"#);
        fs::write(dir.join("industries.json"), industries).unwrap();

        let data = load_layout(&dir).unwrap();
        assert_eq!(data.industries[0].tracks[0].max_cars, 4);
        assert_eq!(data.industries[1].tracks[0].max_cars, 2);

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_disagreeing_capacity_keys() {
        let dir = make_test_dir("load_disagree");
        write_sample(&dir);
        let industries =
            INDUSTRIES_JSON.replace(r#""maxCars": 2"#, r#""maxCars": 2, "capacity": 3"#);
        fs::write(dir.join("industries.json"), industries).unwrap();

        assert!(matches!(load_layout(&dir), Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_duplicate_track() {
        let dir = make_test_dir("load_dup_track");
        write_sample(&dir);
        let industries = INDUSTRIES_JSON.replace(r#""id": "y2""#, r#""id": "y1""#);
        fs::write(dir.join("industries.json"), industries).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "y1"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_zero_capacity() {
        let dir = make_test_dir("load_zero");
        write_sample(&dir);
        let industries = INDUSTRIES_JSON.replace(r#""maxCars": 2"#, r#""maxCars": 0"#);
        fs::write(dir.join("industries.json"), industries).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::ZeroCapacity { ref track, .. }) if track == "dock"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_unknown_location() {
        let dir = make_test_dir("load_unknown_loc");
        write_sample(&dir);
        let industries = INDUSTRIES_JSON.replacen(
            r#""locationId": "springfield""#,
            r#""locationId": "shelbyville""#,
            1,
        );
        fs::write(dir.join("industries.json"), industries).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "location", .. })
                if name == "shelbyville"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_rejects_unknown_placed_car() {
        let dir = make_test_dir("load_unknown_car");
        write_sample(&dir);
        let industries = INDUSTRIES_JSON.replace(r#"["c1"]"#, r#"["c1", "ghost"]"#);
        fs::write(dir.join("industries.json"), industries).unwrap();

        assert!(matches!(
            load_layout(&dir),
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "car", .. })
                if name == "ghost"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_layout_accepts_unknown_home_yard() {
        let dir = make_test_dir("load_unknown_home");
        write_sample(&dir);
        let cars = CARS_JSON.replace(
            r#""aarType": "TANK", "homeYard": "east-yard""#,
            r#""aarType": "TANK", "homeYard": "atlantis""#,
        );
        fs::write(dir.join("rolling_stock.json"), cars).unwrap();

        let data = load_layout(&dir).unwrap();
        assert_eq!(data.rolling_stock[1].home_yard.as_str(), "atlantis");

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // write_layout
    // -----------------------------------------------------------------------

    fn sample_data() -> LayoutData {
        LayoutData {
            locations: vec![location("loc", "east", LocationType::OnLayout)],
            industries: vec![
                yard("yard", "loc", vec![track_with_cars("a", 3, &["c1"]), track("b", 3)]),
                freight(
                    "mill",
                    "loc",
                    vec![track("dock", 2).with_accepted_types(["XM", "GON"])],
                ),
            ],
            rolling_stock: vec![
                placed_car("c1", "XM", "yard", "yard", "a"),
                car("c2", "GON", "yard"),
            ],
            config: OperationsConfig::default(),
        }
    }

    #[test]
    fn write_then_load_in_every_format() {
        for format in Format::ALL {
            let dir = make_test_dir(&format!("write_{}", format.extension()));
            let data = sample_data();

            write_layout(&dir, &data, format).unwrap();
            assert!(dir.join(format!("industries.{}", format.extension())).exists());

            let loaded = load_layout(&dir).unwrap();
            assert_eq!(loaded, data, "format {format:?}");

            cleanup(&dir);
        }
    }

    #[test]
    fn write_layout_refuses_second_format() {
        let dir = make_test_dir("write_conflict");
        let data = sample_data();
        write_layout(&dir, &data, Format::Json).unwrap();

        let result = write_layout(&dir, &data, Format::Ron);
        assert!(matches!(result, Err(DataLoadError::ConflictingFormats { .. })));

        // Same format overwrites.
        write_layout(&dir, &data, Format::Json).unwrap();

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "industries".to_string(),
            dir: PathBuf::from("/layout"),
        };
        assert!(e.to_string().contains("industries"));
        assert!(e.to_string().contains("/layout"));

        let e = DataLoadError::ZeroCapacity {
            file: PathBuf::from("industries.json"),
            industry: "mill".to_string(),
            track: "dock".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("mill"));
        assert!(msg.contains("dock"));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(data_err.to_string().contains("file not found"));
    }
}
