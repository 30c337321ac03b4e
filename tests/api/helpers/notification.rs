use crate::helpers::TestApp;
use reqwest::Response;
use serde_json::Value;
use uuid::Uuid;

impl TestApp {
    pub async fn get_notifications(&self) -> Response {
        self.send_get("notifications").await
    }

    pub async fn get_unread_count(&self) -> Response {
        self.send_get("notifications/unread/count").await
    }

    pub async fn update_notification(&self, id: &Uuid, payload: &Value) -> Response {
        self.send_put(&format!("notifications/{id}"), payload).await
    }

    pub async fn delete_notification(&self, id: &Uuid) -> Response {
        self.send_delete(&format!("notifications/{id}")).await
    }

    pub async fn delete_all_notifications(&self) -> Response {
        self.send_delete("notifications").await
    }

    /// The logged in user's inbox, newest first.
    pub async fn notification_list(&self) -> Vec<Value> {
        let response = self.get_notifications().await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["notifications"].as_array().unwrap().clone()
    }
}
