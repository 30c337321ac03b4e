use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    author_refresh::live_profiles,
    authentication::UserId,
    domain::{NotificationRecord, NotificationResponseBody, UpdateNotificationPayload},
    repository::{NotificationStore, UserDirectory},
    utils::{self, timestamp_now},
};

/// Page size of the inbox listing.
const INBOX_LIMIT: i64 = 100;

#[derive(thiserror::Error)]
pub enum NotificationError {
    #[error("notification not found")]
    NotFound,

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for NotificationError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Forbidden => StatusCode::FORBIDDEN,
            NotificationError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct NotificationPathParams {
    pub id: Uuid,
}

async fn find_owned(
    notification_id: Uuid,
    recipient_id: Uuid,
    store: &dyn NotificationStore,
) -> Result<NotificationRecord, NotificationError> {
    let notification = store
        .find_notification(notification_id)
        .await?
        .ok_or(NotificationError::NotFound)?;

    if notification.recipient_id != recipient_id {
        return Err(NotificationError::Forbidden);
    }
    Ok(notification)
}

#[tracing::instrument(skip(store, users), fields(user_id=%&*user_id))]
pub async fn list_notifications(
    store: web::Data<dyn NotificationStore>,
    users: web::Data<dyn UserDirectory>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, NotificationError> {
    let user_id = user_id.into_inner();

    let records = store.list_for_recipient(*user_id, INBOX_LIMIT).await?;
    let actors = live_profiles(users.get_ref(), records.iter().map(|n| n.actor_id)).await;

    let notifications: Vec<NotificationResponseBody> = records
        .into_iter()
        .map(|record| {
            let actor = actors.get(&record.actor_id);
            NotificationResponseBody::render(record, actor)
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "notifications": notifications })))
}

#[tracing::instrument(skip(store), fields(user_id=%&*user_id))]
pub async fn unread_notification_count(
    store: web::Data<dyn NotificationStore>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, NotificationError> {
    let unread_count = store.count_unread(*user_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "unread_count": unread_count })))
}

#[tracing::instrument(skip(store, users, payload), fields(notification_id=%path.id, user_id=%&*user_id))]
pub async fn update_notification(
    path: web::Path<NotificationPathParams>,
    payload: web::Json<UpdateNotificationPayload>,
    store: web::Data<dyn NotificationStore>,
    users: web::Data<dyn UserDirectory>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, NotificationError> {
    let user_id = user_id.into_inner();
    find_owned(path.id, *user_id, store.get_ref()).await?;

    let updated = store
        .set_read(path.id, payload.is_read, timestamp_now())
        .await?
        .ok_or(NotificationError::NotFound)?;

    let actors = live_profiles(users.get_ref(), [updated.actor_id]).await;
    let actor = actors.get(&updated.actor_id);

    Ok(HttpResponse::Ok().json(NotificationResponseBody::render(updated, actor)))
}

#[tracing::instrument(skip(store), fields(notification_id=%path.id, user_id=%&*user_id))]
pub async fn delete_notification(
    path: web::Path<NotificationPathParams>,
    store: web::Data<dyn NotificationStore>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, NotificationError> {
    let user_id = user_id.into_inner();
    find_owned(path.id, *user_id, store.get_ref()).await?;

    if !store.delete_notification(path.id).await? {
        return Err(NotificationError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(store), fields(user_id=%&*user_id))]
pub async fn delete_all_notifications(
    store: web::Data<dyn NotificationStore>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, NotificationError> {
    let deleted = store.delete_all_for_recipient(*user_id.into_inner()).await?;
    tracing::info!(deleted, "Cleared notification inbox");

    Ok(HttpResponse::NoContent().finish())
}
