// proxy module - Jira / portal bridge service

pub mod config;
pub mod error;
pub mod server;

pub mod handlers;          // API endpoint handlers
pub mod mappers;           // Request builders
pub mod middleware;        // Axum middleware
pub mod upstream;          // Upstream clients

pub use config::{BridgeConfig, JiraCredentials};
pub use error::BridgeError;
pub use server::{build_router, AppState, AxumServer};
