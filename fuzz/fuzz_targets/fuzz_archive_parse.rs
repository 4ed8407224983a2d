#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tempfile::NamedTempFile;
use wadutil_rs::{WadReader, WadSession};

fuzz_target!(|data: &[u8]| {
    // Write fuzz data to temporary file
    let mut temp_file = match NamedTempFile::new() {
        Ok(f) => f,
        Err(_) => return,
    };

    if temp_file.write_all(data).is_err() {
        return;
    }

    if temp_file.flush().is_err() {
        return;
    }

    let path = temp_file.path();

    // Try to open archive - should never panic
    let mut reader = match WadReader::open(path) {
        Ok(r) => r,
        Err(_) => return, // Expected for short input
    };

    // Try to read the directory - should never panic
    let directory = match reader.read_directory() {
        Ok(d) => d,
        Err(_) => return, // Expected for corrupted data
    };

    // Try to read each lump - should never panic
    for entry in &directory {
        let _ = reader.read_lump(entry);
    }
    drop(reader);

    // Load it as an editing session and rebuild - should never panic
    let mut session = WadSession::new();
    if session.open(path).is_err() {
        return;
    }
    let _ = session.listing_json();

    let out = match NamedTempFile::new() {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = session.save(out.path());
});
