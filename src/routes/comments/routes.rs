use crate::authentication::reject_anonymous_users;
use crate::routes::{create_comment, delete_comment, list_comments, update_comment};
use actix_web::middleware::from_fn;
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{post_id}/comments")
            // Public
            .route(web::get().to(list_comments))
            // Protected (require authentication)
            .route(
                web::post()
                    .to(create_comment)
                    .wrap(from_fn(reject_anonymous_users)),
            ),
    )
    .service(
        web::resource("/{post_id}/comments/{comment_id}")
            .wrap(from_fn(reject_anonymous_users))
            .route(web::put().to(update_comment))
            .route(web::delete().to(delete_comment)),
    );
}
