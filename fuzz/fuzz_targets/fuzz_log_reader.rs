#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must load as rows or fail with an error, never panic
    let Ok(mut reader) = dhtstep::recorder::LogReader::new(Cursor::new(data)) else {
        return;
    };
    if let Ok(rows) = reader.read_rows() {
        let _ = dhtstep::analysis::analyze_stability(rows);
    }
});
