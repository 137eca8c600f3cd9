use std::env;

use axum::http::{HeaderValue, Method};
use tower::{
    ServiceBuilder,
    layer::util::{Identity, Stack},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

fn allowed_origin() -> AllowOrigin {
    let origin = env::var("API_ALLOWED_ORIGIN").unwrap_or(DEFAULT_ALLOWED_ORIGIN.into());

    match origin.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!("Ignoring invalid allowed origin {origin:?}");
            AllowOrigin::exact(HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN))
        }
    }
}

// the catalog is read-only
pub(crate) fn build_service_layers() -> ServiceBuilder<Stack<CorsLayer, Identity>> {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(allowed_origin());

    ServiceBuilder::new().layer(cors_layer)
}
