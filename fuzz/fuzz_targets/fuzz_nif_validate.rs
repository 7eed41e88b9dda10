#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — false/Invalid is fine, panics are bugs.
        let _ = verifactu::nif::validate(s);
        let _ = verifactu::nif::classify(s);
    }
});
