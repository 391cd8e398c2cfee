//! Fuzz target: `BoundaryScanner::feed`
//!
//! Splits arbitrary bytes into two chunks at every position and asserts
//! that the streaming header/body boundary detection agrees with a plain
//! search over the whole buffer.
//!
//! cargo fuzz run fuzz_header_scanner

#![no_main]

use coexbench::probe::BoundaryScanner;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 512 {
        return;
    }

    let reference = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| i + 4);

    for cut in 0..=data.len() {
        let mut scanner = BoundaryScanner::new();
        let found = match scanner.feed(&data[..cut]) {
            Some(off) => Some(off),
            None => scanner.feed(&data[cut..]).map(|off| cut + off),
        };
        assert_eq!(found, reference, "split at {cut} disagrees");
    }
});
