//! Test utilities for WLN parser testing
//!
//! Shared fixtures used across the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;


/// A small export with a header, a foreign message type and three registers
pub fn create_test_wln() -> String {
    [
        "WLN export v2",
        "REG;1700000000;-23.5505;-46.6333;pwr_ext:12.6,pwr_int:4.1,i/o:13/e",
        "MSG;1700000030;driver message",
        "REG;1700000060;-23.5505;-46.6333;upar0:12,upar1:ABC1234,upar2:77,upar3:1699999940,upar4:1000,upar5:1700000050,upar6:1050",
        "",
        "REG;1700000120;-23.5506;-46.6334;upar0=13;upar4=\"1050\";upar6=\"1200\"",
    ]
    .join("\r\n")
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
