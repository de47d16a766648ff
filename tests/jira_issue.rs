use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, ResponseTemplate,
};

mod common;
use common::{TestContext, BASIC_AUTH};

fn issue_body() -> String {
    json!({
        "summary": "Door width below minimum",
        "description": "IfcDoor 2O2Fr$t4X7Zf8NOew3FLOH is 0.7m wide",
        "priority": "High",
        "labels": ["Fire Door", "Büro", "!!!", "valid_label-1", 7],
        "bcf_reference": "bcf-topic-42"
    })
    .to_string()
}

#[tokio::test]
async fn test_v3_success_skips_v2() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_partial_json(json!({
            "fields": {
                "project": { "key": "CRM" },
                "summary": "Door width below minimum",
                "issuetype": { "name": "Task" },
                "priority": { "name": "High" },
                "labels": ["Fire-Door", "Buero", "valid_label-1"],
                "customfield_10000": "bcf-topic-42"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "10001",
            "key": "CRM-1",
            "self": "https://acme.atlassian.net/rest/api/3/issue/10001"
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "issue_key": "CRM-1",
            "issue_url": format!("{}/browse/CRM-1", ctx.uri()),
            "api_version": "3"
        })
    );
}

#[tokio::test]
async fn test_falls_back_to_v2() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Operation value must be an Atlassian Document"],
            "errors": {}
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_partial_json(json!({
            "fields": {
                "project": { "key": "CRM" },
                "summary": "Door width below minimum",
                "issuetype": { "name": "Task" },
                "priority": { "name": "High" },
                "labels": ["Fire-Door", "Buero", "valid_label-1"],
                "customfield_10000": "bcf-topic-42"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "10002", "key": "CRM-2" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["issue_key"], json!("CRM-2"));
    assert_eq!(body["api_version"], json!("2"));

    let requests = ctx.mock_server.received_requests().await.unwrap();
    let sent: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn test_timeout_triggers_fallback() {
    let ctx = TestContext::with(|config| config.request_timeout = 1).await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "key": "CRM-LATE" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "key": "CRM-3" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issue_key"], json!("CRM-3"));
    assert_eq!(body["api_version"], json!("2"));
}

#[tokio::test]
async fn test_both_versions_fail_last_error_wins() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Field 'summary' required"]
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessages": ["Project not found"]
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Project not found"));
    assert_eq!(body["status"], json!(404));
    assert_eq!(body["details"], json!({ "errorMessages": ["Project not found"] }));
}

#[tokio::test]
async fn test_error_body_without_messages_is_stringified() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": [],
            "errors": { "priority": "Priority name 'Urgent' is not valid" }
        })))
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!(r#"{"errorMessages":[],"errors":{"priority":"Priority name 'Urgent' is not valid"}}"#)
    );
}

#[tokio::test]
async fn test_transport_failure_on_both_versions() {
    // Nothing listens on the discard port
    let ctx = TestContext::with(|config| config.jira.base_url = "http://127.0.0.1:9".to_string()).await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Request failed:"), "unexpected error: {}", error);
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_success_without_key_does_not_fall_back() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "10009" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "CRM-9" })))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Jira response did not contain an issue key"));
}

#[tokio::test]
async fn test_missing_credentials_make_no_calls() {
    let ctx = TestContext::unconfigured().await;

    let (status, body) = ctx.post_json("/api/jira/issue", issue_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("JIRA_EMAIL"));
    assert_eq!(ctx.outbound_calls().await, 0);
}

#[tokio::test]
async fn test_invalid_body_makes_no_calls() {
    let ctx = TestContext::new().await;

    for raw in ["", "{}", "not json", "null"] {
        let (status, body) = ctx.post_json("/api/jira/issue", raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {:?}", raw);
        assert_eq!(body["error"], json!("No JSON data provided"));
    }

    let (status, body) = ctx
        .post_json("/api/jira/issue", json!({ "summary": 12 }).to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid issue data"));

    assert_eq!(ctx.outbound_calls().await, 0);
}

#[tokio::test]
async fn test_defaults_fill_missing_fields() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_partial_json(json!({
            "fields": {
                "summary": "Issue from BIM Analysis",
                "description": "Issue created from BIM data analysis",
                "issuetype": { "name": "Bug" },
                "priority": { "name": "Medium" },
                "labels": []
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "CRM-4" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let (status, body) = ctx
        .post_json("/api/jira/issue", json!({ "issue_type": "Bug" }).to_string())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issue_key"], json!("CRM-4"));

    let requests = ctx.mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent["fields"].get("customfield_10000").is_none());
}
