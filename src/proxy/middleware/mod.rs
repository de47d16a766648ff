// Middleware 模块 - Axum 中间件

pub mod cors;
pub mod panic;

pub use cors::cors_layer;
pub use panic::catch_panic_layer;
