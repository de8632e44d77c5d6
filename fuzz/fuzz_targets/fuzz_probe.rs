#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let detected = photon::ImageFormat::detect(data);
    if let Ok(info) = photon::probe(data) {
        assert_eq!(Some(info.format), detected);
    }
});
