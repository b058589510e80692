#![no_main]

use bwpairs::catalog::{Anchor, PairCatalog};
use bwpairs::normalize;
use bwpairs::record::Record;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary direction labels must never panic the normalizer or matcher
    if let Ok(input) = std::str::from_utf8(data) {
        for anchor in Anchor::ALL {
            let _ = normalize::service_name(input, anchor);
        }

        let records = vec![Record::new(input, 1.0)];
        let catalog = PairCatalog::build(&records);
        for pair in catalog.pairs() {
            for pattern in &pair.patterns {
                let _ = pattern.matches(input);
            }
        }
    }
});
