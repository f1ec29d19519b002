//! End-to-end sheet runs against a local mock of the service under test.

use httpmock::prelude::*;
use serde_json::json;

use testman::config::Settings;
use testman::http::ApiClient;
use testman::report::{RunSummary, render_html};
use testman::runner::{StepOutcome, run_sheet};
use testman::suite::TestSheet;

fn client_for(server: &MockServer) -> ApiClient {
    let mut settings = Settings::default();
    settings.base_url = server.base_url();
    ApiClient::new(&settings).expect("client should build")
}

fn sheet(raw: serde_json::Value) -> TestSheet {
    serde_json::from_value(raw).expect("sheet should deserialize")
}

#[tokio::test]
async fn mixed_sheet_preserves_row_order_and_counts() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user");
            then.status(200).json_body(json!({"status": 0}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/group");
            then.status(200).json_body(json!({
                "status": 7,
                "delErrors": [{"id": 14, "status": 1}, {"id": 7, "status": 163}],
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/broken");
            then.status(200).json_body(json!({"status": 5}));
        })
        .await;

    let sheet = sheet(json!({
        "sheet": "user",
        "steps": [
            {
                "seq": 1, "name": "create user", "url": "/api/user",
                "method": "post", "payload": {"name": "alice"},
                "expected_code": 0,
            },
            {
                "seq": 2, "name": "batch delete partly fails", "url": "/api/group",
                "method": "delete",
                "expected_code": "", "expected_error_code": 163,
            },
            {
                "seq": 3, "name": "status mismatch", "url": "/api/broken",
                "method": "get", "expected_code": 7,
            },
            {
                "seq": 4, "name": "bad method cell", "url": "/api/user",
                "method": "postuser", "expected_code": 0,
            },
        ],
    }));

    let report = run_sheet(&client_for(&server), &sheet).await;

    assert_eq!(report.total(), 4);
    let sequences: Vec<&str> = report.results.iter().map(|r| r.sequence.as_str()).collect();
    assert_eq!(sequences, ["1", "2", "3", "4"]);

    assert_eq!(report.results[0].outcome, StepOutcome::Pass);
    assert_eq!(report.results[1].outcome, StepOutcome::Pass);
    assert_eq!(report.results[2].outcome, StepOutcome::Fail);
    assert_eq!(
        report.results[2].reason,
        "primary code mismatch: expected 7, got 5"
    );
    // A bad method cell is a harness error for that row, not a verdict,
    // and must not abort the remaining rows.
    assert_eq!(report.results[3].outcome, StepOutcome::Error);

    assert_eq!(report.count(StepOutcome::Pass), 2);
    assert_eq!(report.count(StepOutcome::Fail), 1);
    assert_eq!(report.count(StepOutcome::Error), 1);
    assert!(!report.all_passed());
}

#[tokio::test]
async fn non_json_body_is_a_distinct_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/html");
            then.status(500).body("<html>Internal Server Error</html>");
        })
        .await;

    let sheet = sheet(json!({
        "sheet": "errors",
        "steps": [{
            "seq": 1, "name": "html error page", "url": "/api/html",
            "method": "get", "expected_code": 0,
        }],
    }));

    let report = run_sheet(&client_for(&server), &sheet).await;
    assert_eq!(report.results[0].outcome, StepOutcome::Fail);
    assert!(
        report.results[0]
            .reason
            .starts_with("response body is not valid JSON"),
        "unexpected reason: {}",
        report.results[0].reason
    );
}

#[tokio::test]
async fn session_cookie_from_login_carries_across_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/login");
            then.status(200)
                .header("set-cookie", "sid=abc123; Path=/")
                .json_body(json!({"status": 0}));
        })
        .await;
    let authed = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/whoami")
                .header("cookie", "sid=abc123");
            then.status(200).json_body(json!({"status": 0}));
        })
        .await;

    let mut settings = Settings::default();
    settings.base_url = server.base_url();
    let client = ApiClient::new(&settings).unwrap();

    let login = testman::config::LoginSettings {
        url: "/api/login".to_string(),
        payload: json!({"username": "admin", "password": "admin"}),
    };
    client.login(&login).await.unwrap();

    let sheet = sheet(json!({
        "sheet": "session",
        "steps": [{
            "seq": 1, "name": "whoami", "url": "/api/whoami",
            "method": "get", "expected_code": 0,
        }],
    }));
    let report = run_sheet(&client, &sheet).await;

    authed.assert_async().await;
    assert!(report.all_passed());
}

#[tokio::test]
async fn report_renders_run_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/ping");
            then.status(200).json_body(json!({"status": 0}));
        })
        .await;

    let sheet = sheet(json!({
        "sheet": "smoke",
        "steps": [{
            "seq": 1, "name": "ping", "url": "/api/ping",
            "method": "get", "expected_code": 0,
        }],
    }));
    let results = run_sheet(&client_for(&server), &sheet).await;
    let summary = RunSummary::new("Smoke Run".to_string(), vec![results]);

    let html = render_html(&summary).unwrap();
    assert!(html.contains("Smoke Run"));
    assert!(html.contains("ping"));
    assert!(html.contains("primary code matched"));
    assert!(html.contains("100.0"));
}
