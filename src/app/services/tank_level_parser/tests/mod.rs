//! Test utilities for tank-level parser testing

use std::io::Write;
use tempfile::NamedTempFile;

mod column_mapping_tests;

/// A small export, out of order, with a zero reading and a garbage row
pub fn create_test_tank_csv() -> String {
    [
        "Data/Hora;Volume (L);Temperatura",
        "14.11.2023 22:20:00;1.480,0 L;24,1",
        "14.11.2023 22:10:00;1.500,5 L;24,0",
        "14.11.2023 22:15:00;0 L;24,0",
        "not a date;1.490,0 L;24,0",
        "14.11.2023 22:25:00;;24,2",
    ]
    .join("\n")
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
