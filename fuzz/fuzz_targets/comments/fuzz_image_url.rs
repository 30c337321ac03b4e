// Run with: cargo fuzz run fuzz_image_url
// Accepted URLs stay within the length limit and parse again unchanged.
#![no_main]

use libfuzzer_sys::fuzz_target;
use threadhub::domain::ImageUrl;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(url) = ImageUrl::parse(s.to_string()) {
            assert!(url.as_ref().len() <= 2048);
            let reparsed = ImageUrl::parse(url.to_string()).expect("accepted URL must reparse");
            assert_eq!(reparsed, url);
        }
    }
});
