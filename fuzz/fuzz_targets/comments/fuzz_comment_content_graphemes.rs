// Run with: cargo fuzz run fuzz_comment_content_graphemes
// Accepted content is trimmed and never longer than 500 graphemes.
#![no_main]

use libfuzzer_sys::fuzz_target;
use threadhub::domain::CommentContent;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(content) = CommentContent::parse(s.to_string()) {
            let content = content.as_ref();
            assert_eq!(content, content.trim());
        }
    }
});
