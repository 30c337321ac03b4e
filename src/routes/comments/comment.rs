use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    authentication::UserId,
    comment_thread::{CommentError, CommentThreadManager},
    domain::{CreateCommentPayload, UpdateCommentPayload},
    utils,
};

impl ResponseError for CommentError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            CommentError::NotFound(_) => StatusCode::NOT_FOUND,
            CommentError::InvalidParent
            | CommentError::EmptyContent
            | CommentError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CommentError::Forbidden => StatusCode::FORBIDDEN,
            CommentError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct PostPathParams {
    pub post_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct CommentPathParams {
    pub post_id: Uuid,
    pub comment_id: Uuid,
}

#[tracing::instrument(skip(manager), fields(post_id=%path.post_id))]
pub async fn list_comments(
    path: web::Path<PostPathParams>,
    manager: web::Data<CommentThreadManager>,
) -> Result<HttpResponse, CommentError> {
    let comments = manager.list(path.post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "comments": comments })))
}

#[tracing::instrument(skip(manager, payload), fields(post_id=%path.post_id, user_id=%&*user_id))]
pub async fn create_comment(
    path: web::Path<PostPathParams>,
    payload: web::Json<CreateCommentPayload>,
    manager: web::Data<CommentThreadManager>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();
    let payload = payload.into_inner();

    let comment = manager
        .create(
            path.post_id,
            *user_id,
            payload.content,
            payload.image_url,
            payload.parent_id,
        )
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

#[tracing::instrument(skip(manager, payload), fields(comment_id=%path.comment_id, user_id=%&*user_id))]
pub async fn update_comment(
    path: web::Path<CommentPathParams>,
    payload: web::Json<UpdateCommentPayload>,
    manager: web::Data<CommentThreadManager>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();
    let payload = payload.into_inner();

    let comment = manager
        .update(
            path.post_id,
            path.comment_id,
            *user_id,
            payload.content,
            payload.image_url,
        )
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

#[tracing::instrument(skip(manager), fields(comment_id=%path.comment_id, user_id=%&*user_id))]
pub async fn delete_comment(
    path: web::Path<CommentPathParams>,
    manager: web::Data<CommentThreadManager>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();

    let outcome = manager
        .delete(path.post_id, path.comment_id, *user_id)
        .await?;
    tracing::info!(?outcome, "Comment deleted");

    Ok(HttpResponse::NoContent().finish())
}
