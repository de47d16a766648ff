// Jira request mapping
pub mod labels;
pub mod payload;

pub use labels::{sanitize_label, sanitize_labels};
pub use payload::build_issue_payload;
