//! Cross-origin access for browser clients served from another origin.

use actix_cors::Cors;

const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];

/// Builds the CORS middleware from a comma-separated origin list. `*` (or an
/// empty list) allows every origin and answers with a wildcard.
pub fn cors(allowed_origins: &str) -> Cors {
    let origins: Vec<&str> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();

    let cors = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allow_any_header()
        .max_age(3600);

    if origins.is_empty() || origins.contains(&"*") {
        cors.allow_any_origin().send_wildcard()
    } else {
        origins
            .into_iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
