pub mod issue;
pub mod probe;

pub use issue::{CreatedIssue, IssueFailure, IssueRequest, IssueResult};
pub use probe::{PermissionProbeResult, ProjectAccess, ProjectSummary};
