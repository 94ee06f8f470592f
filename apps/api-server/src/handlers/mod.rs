//! HTTP handlers and route configuration.

mod health;
mod votes;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Votes; identity is optional on every route
            .service(
                web::scope("/posts/{post_id}/votes")
                    .route("", web::get().to(votes::list_votes))
                    .route("", web::post().to(votes::cast_vote))
                    .route("/summary", web::get().to(votes::vote_summary)),
            ),
    );
}
