use crate::authentication::reject_anonymous_users;
use crate::routes::{
    delete_all_notifications, delete_notification, list_notifications, unread_notification_count,
    update_notification,
};
use actix_web::middleware::from_fn;
use actix_web::web;

pub fn notification_routes(cfg: &mut web::ServiceConfig) {
    // Every inbox route is protected (require authentication)
    cfg.service(
        web::scope("/notifications")
            .wrap(from_fn(reject_anonymous_users))
            .route("", web::get().to(list_notifications))
            .route("", web::delete().to(delete_all_notifications))
            .route("/unread/count", web::get().to(unread_notification_count))
            .route("/{id}", web::put().to(update_notification))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
