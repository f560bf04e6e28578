//! # pb-api
//!
//! The web routing and orchestration layer for Postboard.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use handlers::AppState;

/// Configures the routes and extractor settings.
///
/// # Developer Note
/// Kept as a `ServiceConfig` callback so tests and the binary mount the
/// exact same routing table.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error))
        .app_data(web::PathConfig::default().error_handler(error::path_error))
        .route("/", web::get().to(handlers::index))
        // Users
        .route("/users", web::get().to(handlers::list_users))
        .route("/register", web::post().to(handlers::register))
        .route("/login", web::post().to(handlers::login))
        // Posts
        .service(
            web::resource("/posts")
                .route(web::get().to(handlers::list_posts))
                .route(web::post().to(handlers::create_post)),
        )
        .service(
            web::resource("/posts/{id}")
                .route(web::get().to(handlers::get_post))
                .route(web::put().to(handlers::update_post))
                .route(web::delete().to(handlers::delete_post)),
        );
}
