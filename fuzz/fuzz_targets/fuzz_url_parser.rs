//! Fuzz target: `HttpRequest::parse`
//!
//! Drives arbitrary UTF-8 into the URL parser and asserts that it never
//! panics and that every accepted request respects the buffer bounds and
//! the truncation signal.
//!
//! cargo fuzz run fuzz_url_parser

#![no_main]

use coexbench::request::{HttpRequest, MAX_HOST_LEN, MAX_PATH_LEN, MAX_REQUEST_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(url) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(req) = HttpRequest::parse(url, "fuzz/0.1") {
        // Components never exceed capacity - 1.
        assert!(req.host().len() < MAX_HOST_LEN);
        assert!(req.path().len() < MAX_PATH_LEN);
        assert!(req.text().len() <= MAX_REQUEST_LEN);

        // Shape invariants of the prebuilt request.
        assert!(!req.host().is_empty());
        assert!(req.path().starts_with('/'));
        assert!(req.text().starts_with("GET "));
        assert!(req.text().ends_with("\r\n\r\n"));

        // Untruncated components must be verbatim substrings of the URL.
        if !req.truncated() {
            assert!(url.contains(req.host()));
        }
    }
});
