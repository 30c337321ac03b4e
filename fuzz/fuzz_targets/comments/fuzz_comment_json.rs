// Run with: cargo fuzz run fuzz_comment_json
// Feeds arbitrary JSON through the create and update payload parsers.
#![no_main]

use libfuzzer_sys::fuzz_target;
use threadhub::domain::{CommentBody, CommentEdit, CreateCommentPayload, UpdateCommentPayload};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<CreateCommentPayload>(data) {
        let _ = CommentBody::parse(payload.content, payload.image_url);
    }

    if let Ok(payload) = serde_json::from_slice::<UpdateCommentPayload>(data) {
        let _ = CommentEdit::parse(payload.content, payload.image_url);
    }
});
