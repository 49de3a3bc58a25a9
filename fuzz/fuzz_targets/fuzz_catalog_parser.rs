//! Fuzz target: mapping and constellation parsers
//!
//! Splits the input at the first NUL into a mapping file and a
//! constellation file, then checks that parsing never panics and that
//! every accepted constellation is a full 0/1 frame.
//!
//! cargo fuzz run fuzz_catalog_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use starfield::catalog;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let (map_text, cons_text) = text.split_once('\0').unwrap_or((text, ""));

    let Ok(mapping) = catalog::parse_mapping(map_text, Some(1024)) else {
        return;
    };
    let Ok(channels) = mapping.channel_count() else {
        return;
    };
    assert!(channels <= 1024);

    if let Ok(cat) = catalog::parse_constellations(cons_text, &mapping, channels) {
        for c in cat.iter() {
            assert_eq!(c.levels.len(), channels);
            assert!(c.levels.iter().all(|&l| l == 0.0 || l == 1.0));
        }
    }
});
