use crate::helpers;
use serde_json::Value;
use uuid::Uuid;

fn id_of(notification: &Value) -> Uuid {
    Uuid::parse_str(notification["id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn commenting_on_a_post_notifies_its_author() {
    let app = helpers::spawn_app().await;
    let commenter = app.create_user();
    let post_id = app.create_sample_post();

    app.login_as(&commenter);
    app.create_sample_comment(&post_id, "Nice post", None).await;

    app.login();
    let notifications = app.notification_list().await;
    assert_eq!(notifications.len(), 1);
    let notification = &notifications[0];
    assert_eq!(notification["type"], "comment");
    assert_eq!(notification["actor_id"], commenter.user_id.to_string());
    assert_eq!(notification["post_id"], post_id.to_string());
    assert_eq!(notification["is_read"], false);
    assert!(notification["comment_id"].is_null());
    assert_eq!(
        notification["message"],
        format!("{} commented on your post.", commenter.display_name)
    );
}

#[tokio::test]
async fn replying_notifies_the_parent_author() {
    let app = helpers::spawn_app().await;
    let parent_author = app.create_user();
    let replier = app.create_user();
    let post_id = app.create_sample_post();

    app.login_as(&parent_author);
    let parent = app.create_sample_comment(&post_id, "Parent", None).await;
    app.login_as(&replier);
    let reply = app
        .create_sample_comment(&post_id, "Reply", Some(parent))
        .await;

    app.login_as(&parent_author);
    let notifications = app.notification_list().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "reply");
    assert_eq!(notifications[0]["comment_id"], reply.to_string());
    assert_eq!(
        notifications[0]["message"],
        format!("{} replied to your comment.", replier.display_name)
    );
}

#[tokio::test]
async fn own_activity_does_not_notify() {
    let app = helpers::spawn_app().await;
    app.login();
    let post_id = app.create_sample_post();
    let own = app.create_sample_comment(&post_id, "Mine", None).await;
    app.create_sample_comment(&post_id, "Also mine", Some(own)).await;

    assert!(app.notification_list().await.is_empty());
}

#[tokio::test]
async fn unread_count_tracks_mark_as_read() {
    let app = helpers::spawn_app().await;
    let commenter = app.create_user();
    let post_id = app.create_sample_post();
    app.login_as(&commenter);
    app.create_sample_comment(&post_id, "One", None).await;
    app.create_sample_comment(&post_id, "Two", None).await;

    app.login();
    let response = app.get_unread_count().await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["unread_count"], 2);

    let notifications = app.notification_list().await;
    let payload = serde_json::json!({ "is_read": true });
    let response = app
        .update_notification(&id_of(&notifications[0]), &payload)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["is_read"], true);
    assert!(!body["updated_at"].is_null());

    let body: Value = app.get_unread_count().await.json().await.unwrap();
    assert_eq!(body["unread_count"], 1);
}

#[tokio::test]
async fn notifications_are_listed_newest_first_with_live_actor_names() {
    let app = helpers::spawn_app().await;
    let commenter = app.create_user();
    let post_id = app.create_sample_post();
    app.login_as(&commenter);
    app.create_sample_comment(&post_id, "First", None).await;
    app.create_sample_comment(&post_id, "Second", None).await;

    app.store
        .insert_user(threadhub::domain::UserProfile {
            id: commenter.user_id,
            username: "new_handle".into(),
            display_name: "New Name".into(),
            display_name_color: None,
            profile_image: None,
        })
        .unwrap();

    app.login();
    let notifications = app.notification_list().await;
    assert_eq!(notifications.len(), 2);
    let created_at = |n: &Value| {
        chrono::DateTime::parse_from_rfc3339(n["created_at"].as_str().unwrap()).unwrap()
    };
    assert!(created_at(&notifications[0]) >= created_at(&notifications[1]));
    for notification in &notifications {
        assert_eq!(notification["actor_username"], "new_handle");
        assert_eq!(notification["actor_display_name"], "New Name");
    }
}

#[tokio::test]
async fn notifications_of_other_users_are_forbidden() {
    let app = helpers::spawn_app().await;
    let commenter = app.create_user();
    let post_id = app.create_sample_post();
    app.login_as(&commenter);
    app.create_sample_comment(&post_id, "Hi", None).await;

    app.login();
    let notification_id = id_of(&app.notification_list().await[0]);

    app.login_as(&commenter);
    let payload = serde_json::json!({ "is_read": true });
    let response = app.update_notification(&notification_id, &payload).await;
    assert_eq!(response.status().as_u16(), 403);
    let response = app.delete_notification(&notification_id).await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn unknown_notification_is_not_found() {
    let app = helpers::spawn_app().await;
    app.login();

    let payload = serde_json::json!({ "is_read": true });
    let response = app.update_notification(&Uuid::new_v4(), &payload).await;
    assert_eq!(response.status().as_u16(), 404);
    let response = app.delete_notification(&Uuid::new_v4()).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn notifications_can_be_deleted_one_by_one_or_all_at_once() {
    let app = helpers::spawn_app().await;
    let commenter = app.create_user();
    let post_id = app.create_sample_post();
    app.login_as(&commenter);
    for content in ["One", "Two", "Three"] {
        app.create_sample_comment(&post_id, content, None).await;
    }

    app.login();
    let notifications = app.notification_list().await;
    let response = app.delete_notification(&id_of(&notifications[0])).await;
    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(app.notification_list().await.len(), 2);

    let response = app.delete_all_notifications().await;
    assert_eq!(response.status().as_u16(), 204);
    assert!(app.notification_list().await.is_empty());
}

#[tokio::test]
async fn inbox_requires_authentication() {
    let app = helpers::spawn_app().await;

    assert_eq!(app.get_notifications().await.status().as_u16(), 401);
    assert_eq!(app.get_unread_count().await.status().as_u16(), 401);
    assert_eq!(app.delete_all_notifications().await.status().as_u16(), 401);
}
