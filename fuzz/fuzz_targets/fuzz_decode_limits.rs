#![no_main]

use libfuzzer_sys::fuzz_target;
use photon::{DecodeRequest, Limits};

// Small limits keep the fuzzer from spending its time on huge allocations.
fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_width: Some(1024),
        max_height: Some(1024),
        max_pixels: Some(1 << 20),
    };
    if let Ok(output) = DecodeRequest::new(data).with_limits(&limits).decode() {
        assert!(output.width() <= 1024);
        assert!(output.height() <= 1024);
    }
});
