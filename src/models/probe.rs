use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectAccess {
    /// Status of the project-detail call
    pub status: u16,
    pub accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionProbeResult {
    pub project_access: ProjectAccess,
    pub available_projects: Vec<ProjectSummary>,
    /// Jira's `mypermissions` entries, relayed as received
    pub permissions: Map<String, Value>,
}

impl PermissionProbeResult {
    pub fn project_accessible(&self) -> bool {
        self.project_access.accessible
    }
}
