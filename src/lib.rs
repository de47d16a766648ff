pub mod models;
pub mod modules;
pub mod proxy;
