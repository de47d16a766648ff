use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Issue fields as posted by the browser client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Raw labels; non-string entries are dropped while deserializing.
    #[serde(default, deserialize_with = "string_items")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub bcf_reference: Option<String>,
}

impl Default for IssueRequest {
    fn default() -> Self {
        Self {
            summary: default_summary(),
            description: default_description(),
            issue_type: default_issue_type(),
            priority: default_priority(),
            labels: Vec::new(),
            bcf_reference: None,
        }
    }
}

fn default_summary() -> String {
    "Issue from BIM Analysis".to_string()
}

fn default_description() -> String {
    "Issue created from BIM data analysis".to_string()
}

fn default_issue_type() -> String {
    "Task".to_string()
}

fn default_priority() -> String {
    "Medium".to_string()
}

/// Accepts `null`, a single non-array value, or an array of anything and
/// keeps only the string items.
fn string_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let items = match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(items)
}

/// A created issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedIssue {
    pub issue_key: String,
    pub issue_url: String,
    /// REST API revision that accepted the request ("3" or "2")
    pub api_version_used: String,
}

/// Why issue creation failed, after every API version was tried.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueFailure {
    pub error_message: String,
    /// Upstream HTTP status of the last attempt, when one was received
    pub status: Option<u16>,
    /// Raw upstream error body
    pub details: Option<Value>,
}

/// Outcome of an issue creation; exactly one of the two.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueResult {
    Success(CreatedIssue),
    Failure(IssueFailure),
}

impl IssueResult {
    pub fn is_success(&self) -> bool {
        matches!(self, IssueResult::Success(_))
    }

    pub fn failure(message: impl Into<String>) -> Self {
        IssueResult::Failure(IssueFailure {
            error_message: message.into(),
            status: None,
            details: None,
        })
    }
}

// Wire form keeps the flat `success` flag the browser client checks.
impl Serialize for IssueResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            IssueResult::Success(created) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("issue_key", &created.issue_key)?;
                map.serialize_entry("issue_url", &created.issue_url)?;
                map.serialize_entry("api_version", &created.api_version_used)?;
                map.end()
            }
            IssueResult::Failure(failure) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &failure.error_message)?;
                if let Some(status) = failure.status {
                    map.serialize_entry("status", &status)?;
                }
                if let Some(details) = &failure.details {
                    map.serialize_entry("details", details)?;
                }
                map.end()
            }
        }
    }
}
