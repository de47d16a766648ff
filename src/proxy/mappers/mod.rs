// Mappers module - request builders

pub mod jira;
