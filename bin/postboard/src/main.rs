//! # Postboard Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use pb_api::{configure_routes, middleware, AppState};
use std::sync::Arc;

use crate::settings::Settings;

#[cfg(feature = "db-sqlite")]
use pb_db_sqlite::SqliteRepo;

#[cfg(feature = "auth-simple")]
use pb_auth_simple::SimpleAuthProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "auth-simple")))]
compile_error!("postboard needs a database plugin (db-sqlite) and an auth plugin (auth-simple)");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load().context("failed to load settings")?;

    // 1. Initialize Database Implementation
    let repo = Arc::new(
        SqliteRepo::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("failed to open database")?,
    );
    repo.init_schema().await.context("failed to create schema")?;

    // 2. Initialize Auth Implementation
    let auth = Arc::new(SimpleAuthProvider::new());

    // 3. Wrap in AppState (dynamic dispatch keeps handlers plugin-agnostic)
    let state = web::Data::new(AppState {
        users: repo.clone(),
        posts: repo.clone(),
        auth,
    });

    let bind = (settings.server.host.clone(), settings.server.port);
    log::info!("Postboard starting on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::cors_policy())
            .wrap(middleware::standard_middleware())
            .configure(configure_routes)
    })
    .bind(bind)
    .with_context(|| format!("failed to bind {}:{}", settings.server.host, settings.server.port))?
    .run()
    .await?;

    repo.close().await;
    log::info!("Postboard stopped");
    Ok(())
}
