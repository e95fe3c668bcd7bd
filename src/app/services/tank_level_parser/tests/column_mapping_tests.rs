//! Tests for header synonym resolution

use crate::Error;
use crate::app::services::tank_level_parser::column_mapping::{
    TankColumnMapping, normalize_header,
};
use crate::config::TankLevelConfig;
use csv::StringRecord;

#[test]
fn test_normalize_header() {
    assert_eq!(normalize_header("\u{feff} Data/Hora "), "data/hora");
    assert_eq!(normalize_header("NÍVEL"), "nível");
}

#[test]
fn test_resolve_synonyms_case_insensitive() {
    let headers = StringRecord::from(vec!["Sensor", "TIMESTAMP", "Fuel Level"]);
    let mapping = TankColumnMapping::resolve(&headers, &TankLevelConfig::default()).unwrap();

    assert_eq!(mapping.time_index, 1);
    assert_eq!(mapping.volume_index, 2);
}

#[test]
fn test_missing_volume_column() {
    let headers = StringRecord::from(vec!["Data", "Temperatura"]);
    let result = TankColumnMapping::resolve(&headers, &TankLevelConfig::default());

    assert!(matches!(result, Err(Error::TankLevelFormat { .. })));
}

#[test]
fn test_custom_synonyms() {
    let config = TankLevelConfig {
        time_columns: vec!["Quando".to_string()],
        volume_columns: vec!["Litros".to_string()],
        ..TankLevelConfig::default()
    };
    let headers = StringRecord::from(vec!["litros", "quando"]);
    let mapping = TankColumnMapping::resolve(&headers, &config).unwrap();

    assert_eq!(mapping.time_index, 1);
    assert_eq!(mapping.volume_index, 0);
}
