use crate::helpers;
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Create Comment
// ============================================================================

#[tokio::test]
async fn create_comment_returns_201_for_valid_input() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let payload = serde_json::json!({ "content": "  This is a test comment  " });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Expected 201 Created for valid comment creation"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["post_id"], post_id.to_string());
    assert_eq!(body["content"], "This is a test comment");
    assert_eq!(body["author_id"], app.test_user.user_id.to_string());
    assert_eq!(body["author_username"], app.test_user.username.as_str());
    assert_eq!(body["author_display_name_color"], "#000000");
    assert_eq!(body["is_deleted"], false);
    assert!(body["parent_id"].is_null());
    assert!(body["updated_at"].is_null());
}

#[tokio::test]
async fn create_comment_accepts_an_image_without_content() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let payload = serde_json::json!({ "image_url": "https://example.com/cat.jpg" });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "");
    assert_eq!(body["image_url"], "https://example.com/cat.jpg");
}

#[tokio::test]
async fn create_comment_returns_400_for_empty_content() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let test_cases = vec![
        (serde_json::json!({ "content": "" }), "empty content"),
        (serde_json::json!({ "content": "   \n\t " }), "whitespace content"),
        (serde_json::json!({}), "missing content and image"),
    ];

    for (payload, description) in test_cases {
        let response = app.create_comment(&post_id, &payload).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Expected 400 for {description}"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "content or image is required");
    }
}

#[tokio::test]
async fn create_comment_returns_400_for_invalid_fields() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let test_cases = vec![
        (
            serde_json::json!({ "content": "a".repeat(501) }),
            "content over 500 characters",
        ),
        (
            serde_json::json!({ "content": "hi", "image_url": "ftp://example.com/a.png" }),
            "non-http image url",
        ),
        (
            serde_json::json!({ "content": "hi", "image_url": "not a url" }),
            "malformed image url",
        ),
        (
            serde_json::json!({ "content": "hi", "parent_id": "not-a-uuid" }),
            "malformed parent id",
        ),
    ];

    for (payload, description) in test_cases {
        let response = app.create_comment(&post_id, &payload).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Expected 400 for {description}"
        );
    }
}

#[tokio::test]
async fn create_comment_returns_400_for_malformed_json() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let response = app
        .send_post_raw(&format!("posts/{post_id}/comments"), "{\"content\": ")
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_comment_returns_404_for_unknown_post() {
    let app = helpers::spawn_app().await;
    app.login();

    let payload = serde_json::json!({ "content": "Hello?" });
    let response = app.create_comment(&Uuid::new_v4(), &payload).await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "post not found");
}

#[tokio::test]
async fn create_comment_returns_400_for_parent_from_another_post() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let other_post_id = app.create_sample_post();
    let foreign_parent = app
        .create_sample_comment(&other_post_id, "Elsewhere", None)
        .await;

    let payload = serde_json::json!({ "content": "Reply", "parent_id": foreign_parent });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "invalid parent comment");
}

#[tokio::test]
async fn create_reply_links_to_its_parent() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let parent_id = app.create_sample_comment(&post_id, "Parent", None).await;

    let payload = serde_json::json!({ "content": "Child", "parent_id": parent_id });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["parent_id"], parent_id.to_string());
}

#[tokio::test]
async fn create_comment_returns_401_if_unauthenticated() {
    let app = helpers::spawn_app().await;
    let post_id = app.create_sample_post();

    let payload = serde_json::json!({ "content": "Anonymous" });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn create_comment_returns_401_for_unknown_token() {
    let app = helpers::spawn_app().await;
    let post_id = app.create_sample_post();
    let stranger = helpers::TestUser::generate();
    app.login_as(&stranger);

    let payload = serde_json::json!({ "content": "Who am I?" });
    let response = app.create_comment(&post_id, &payload).await;

    assert_eq!(response.status().as_u16(), 401);
}

// ============================================================================
// Update Comment
// ============================================================================

#[tokio::test]
async fn update_comment_returns_200_and_the_edited_comment() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Before", None).await;

    let payload = serde_json::json!({ "content": "After" });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "After");
    assert!(!body["updated_at"].is_null());
}

#[tokio::test]
async fn update_comment_keeps_fields_left_out_of_the_payload() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let payload = serde_json::json!({
        "content": "Caption",
        "image_url": "https://example.com/pic.png"
    });
    let response = app.create_comment(&post_id, &payload).await;
    let body: Value = response.json().await.unwrap();
    let comment_id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

    let payload = serde_json::json!({ "content": "New caption" });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "New caption");
    assert_eq!(body["image_url"], "https://example.com/pic.png");

    let payload = serde_json::json!({ "image_url": "" });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "New caption");
    assert!(body["image_url"].is_null());
}

#[tokio::test]
async fn update_comment_returns_400_when_it_would_become_empty() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Text", None).await;

    let payload = serde_json::json!({ "content": "   " });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_comment_returns_403_for_non_author() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Mine", None).await;

    let intruder = app.create_user();
    app.login_as(&intruder);
    let payload = serde_json::json!({ "content": "Not yours" });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn update_comment_returns_404_for_unknown_comment() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();

    let payload = serde_json::json!({ "content": "Ghost" });
    let response = app
        .update_comment(&post_id, &Uuid::new_v4(), &payload)
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_comment_returns_401_if_unauthenticated() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Text", None).await;
    app.logout();

    let payload = serde_json::json!({ "content": "Edit" });
    let response = app.update_comment(&post_id, &comment_id, &payload).await;

    assert_eq!(response.status().as_u16(), 401);
}

// ============================================================================
// Delete Comment
// ============================================================================

#[tokio::test]
async fn delete_comment_returns_204_for_owner() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Bye", None).await;

    let response = app.delete_comment(&post_id, &comment_id).await;

    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn delete_comment_returns_403_for_non_author() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Mine", None).await;

    let intruder = app.create_user();
    app.login_as(&intruder);
    let response = app.delete_comment(&post_id, &comment_id).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(app.listed_comment_ids(&post_id).await, vec![comment_id]);
}

#[tokio::test]
async fn delete_comment_returns_404_when_addressed_through_another_post() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let other_post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Here", None).await;

    let response = app.delete_comment(&other_post_id, &comment_id).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_comment_returns_401_if_unauthenticated() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let comment_id = app.create_sample_comment(&post_id, "Text", None).await;
    app.logout();

    let response = app.delete_comment(&post_id, &comment_id).await;

    assert_eq!(response.status().as_u16(), 401);
}

// ============================================================================
// List Comments
// ============================================================================

#[tokio::test]
async fn get_comments_is_public_and_ordered_oldest_first() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let first = app.create_sample_comment(&post_id, "First", None).await;
    let second = app.create_sample_comment(&post_id, "Second", None).await;
    let reply = app
        .create_sample_comment(&post_id, "Reply", Some(first))
        .await;
    app.logout();

    let response = app.get_comments(&post_id).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let comments = body["comments"].as_array().unwrap();
    let ids: Vec<&str> = comments.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            first.to_string().as_str(),
            second.to_string().as_str(),
            reply.to_string().as_str()
        ]
    );
}

#[tokio::test]
async fn get_comments_returns_empty_list_for_post_without_comments() {
    let app = helpers::spawn_app().await;
    let post_id = app.create_sample_post();

    let response = app.get_comments(&post_id).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["comments"], serde_json::json!([]));
}

#[tokio::test]
async fn get_comments_returns_404_for_unknown_post() {
    let app = helpers::spawn_app().await;

    let response = app.get_comments(&Uuid::new_v4()).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn get_comments_shows_the_current_author_profile() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    app.create_sample_comment(&post_id, "Hello", None).await;

    app.store
        .insert_user(threadhub::domain::UserProfile {
            id: app.test_user.user_id,
            username: "renamed".into(),
            display_name: "Renamed User".into(),
            display_name_color: Some("#ff00aa".into()),
            profile_image: Some("https://example.com/avatar.png".into()),
        })
        .unwrap();

    let response = app.get_comments(&post_id).await;
    let body: Value = response.json().await.unwrap();
    let comment = &body["comments"][0];
    assert_eq!(comment["author_username"], "renamed");
    assert_eq!(comment["author_display_name"], "Renamed User");
    assert_eq!(comment["author_display_name_color"], "#ff00aa");
    assert_eq!(comment["author_profile_image"], "https://example.com/avatar.png");
}

#[tokio::test]
async fn get_comments_falls_back_to_stored_author_when_user_is_gone() {
    let app = helpers::spawn_app().await;
    let author = app.create_user();
    app.login_as(&author);
    let post_id = app.create_sample_post();
    app.create_sample_comment(&post_id, "Hello", None).await;

    app.store.remove_user(author.user_id).unwrap();

    let response = app.get_comments(&post_id).await;
    let body: Value = response.json().await.unwrap();
    let comment = &body["comments"][0];
    assert_eq!(comment["author_username"], author.username.as_str());
    assert_eq!(comment["author_display_name"], author.display_name.as_str());
    assert_eq!(comment["author_display_name_color"], "#000000");
}
