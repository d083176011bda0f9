//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::get_posts))
                    .route("/{pid}", web::get().to(posts::get_post))
                    .route("/{pid}", web::put().to(posts::set_post_fields))
                    .route("/{pid}/fields/{field}", web::get().to(posts::get_post_field))
                    .route("/{pid}/fields/{field}", web::put().to(posts::set_post_field)),
            ),
    );
}
