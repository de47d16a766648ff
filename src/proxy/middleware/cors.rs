// CORS 中间件
use tower_http::cors::{Any, CorsLayer};

/// The browser client is served from arbitrary origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
