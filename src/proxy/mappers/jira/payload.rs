// Jira create-issue payload
use serde_json::{json, Value};

use super::labels::sanitize_labels;
use crate::models::IssueRequest;

/// Build the `POST /rest/api/{v}/issue` body.
///
/// The same body is sent to every API version. `bcf_field` receives the BCF
/// reference when the request carries one.
pub fn build_issue_payload(project_key: &str, bcf_field: &str, request: &IssueRequest) -> Value {
    let mut fields = json!({
        "project": { "key": project_key },
        "summary": request.summary,
        "description": request.description,
        "issuetype": { "name": request.issue_type },
        "priority": { "name": request.priority },
        "labels": sanitize_labels(&request.labels),
    });

    if let (Some(reference), Some(map)) = (&request.bcf_reference, fields.as_object_mut()) {
        map.insert(bcf_field.to_string(), Value::String(reference.clone()));
    }

    json!({ "fields": fields })
}
