//! Wrappers the binary puts around every route.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// One access-log line per request through the `log` facade.
pub fn standard_middleware() -> Logger {
    Logger::default()
}

/// Browser clients on any origin may call every verb the post routes use.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}
