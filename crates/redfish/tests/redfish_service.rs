//! Integration tests against a mock Redfish service.
//!
//! These tests drive the public client over HTTP and check fetching,
//! collection resolution and partial updates end to end.

use std::fs;
use std::path::PathBuf;

use redfish::{BatteryMetrics, Error, RedfishClient, Session, SessionService, Updatable};
use redfish_core::{Concurrency, Link};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSIONS: &str = "/redfish/v1/SessionService/Sessions";

fn fixture(name: &str) -> Value {
    let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let text = fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&text).unwrap()
}

fn session(id: &str) -> Value {
    json!({
        "@odata.id": format!("{SESSIONS}/{id}"),
        "Id": id,
        "Name": "User Session",
        "UserName": format!("user-{id}")
    })
}

async fn mount_json(server: &MockServer, uri: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(uri))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_sessions(server: &MockServer, ids: &[&str]) {
    let members: Vec<Value> = ids
        .iter()
        .map(|id| json!({"@odata.id": format!("{SESSIONS}/{id}")}))
        .collect();
    mount_json(
        server,
        SESSIONS,
        json!({
            "@odata.id": SESSIONS,
            "Members": members,
            "Members@odata.count": ids.len()
        }),
    )
    .await;
}

async fn client(server: &MockServer) -> RedfishClient {
    RedfishClient::builder(server.uri())
        .unwrap()
        .with_basic_auth("admin", "secret")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_list_sessions_in_declared_order() {
    let server = MockServer::start().await;
    mount_sessions(&server, &["A", "B", "C"]).await;
    for id in ["A", "B", "C"] {
        mount_json(&server, &format!("{SESSIONS}/{id}"), session(id)).await;
    }

    let client = client(&server).await;
    let sessions: Vec<Session> = client.list(&Link::new(SESSIONS)).await.unwrap();

    let ids: Vec<&str> = sessions.iter().map(|s| s.entity.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert!(sessions.iter().all(|s| s.entity.is_bound()));
}

#[tokio::test]
async fn test_list_fails_when_one_member_fails() {
    let server = MockServer::start().await;
    mount_sessions(&server, &["A", "B", "C"]).await;
    mount_json(&server, &format!("{SESSIONS}/A"), session("A")).await;
    mount_json(&server, &format!("{SESSIONS}/C"), session("C")).await;
    Mock::given(method("GET"))
        .and(path(format!("{SESSIONS}/B")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server)
        .await
        .with_concurrency(Concurrency::Limited(2));
    let err = client
        .list::<Session>(&Link::new(SESSIONS))
        .await
        .unwrap_err();

    let failures = err.as_collection().expect("collection error");
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures.get(&format!("{SESSIONS}/B")),
        Some(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_empty_link_makes_no_request() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let sessions: Vec<Session> = client.list(&Link::default()).await.unwrap();
    assert!(sessions.is_empty());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_update_sends_only_changed_field() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/redfish/v1/SessionService",
        fixture("session_service.json"),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/SessionService"))
        .and(header("If-Match", "W/\"1604509181\""))
        .and(body_json(json!({"SessionTimeout": 60})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let mut service: SessionService = client.get("/redfish/v1/SessionService").await.unwrap();
    assert!(service.service_enabled);
    assert_eq!(service.session_timeout, 30);

    service.session_timeout = 60;
    service.update().await.unwrap();
}

#[tokio::test]
async fn test_update_without_changes_sends_nothing() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/redfish/v1/SessionService",
        fixture("session_service.json"),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let mut service: SessionService = client.get("/redfish/v1/SessionService").await.unwrap();
    service.description = "changed locally".to_string();
    service.update().await.unwrap();
}

#[tokio::test]
async fn test_update_rejected_by_service() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/redfish/v1/SessionService",
        fixture("session_service.json"),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/SessionService"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "Base.1.8.GeneralError",
                "message": "A general error has occurred.",
                "@Message.ExtendedInfo": [
                    {"Message": "The value 0 for the property SessionTimeout is not in the supported range."}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let mut service: SessionService = client.get("/redfish/v1/SessionService").await.unwrap();
    service.session_timeout = 0;

    match service.update().await.unwrap_err() {
        Error::InvalidRequest(message) => assert!(message.contains("SessionTimeout")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_session_service_navigates_to_sessions() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/redfish/v1/",
        json!({
            "@odata.id": "/redfish/v1/",
            "Id": "RootService",
            "RedfishVersion": "1.15.0",
            "SessionService": {"@odata.id": "/redfish/v1/SessionService"}
        }),
    )
    .await;
    mount_json(
        &server,
        "/redfish/v1/SessionService",
        fixture("session_service.json"),
    )
    .await;
    mount_sessions(&server, &["7"]).await;
    mount_json(&server, &format!("{SESSIONS}/7"), session("7")).await;

    let client = client(&server).await;
    let service = client.session_service().await.unwrap();
    let sessions = service.sessions().await.unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].user_name, "user-7");
}

#[tokio::test]
async fn test_fetch_battery_metrics() {
    let server = MockServer::start().await;
    let uri = "/redfish/v1/Chassis/1U/PowerSubsystem/Batteries/Module1/Metrics";
    mount_json(&server, uri, fixture("battery_metrics.json")).await;

    let client = client(&server).await;
    let metrics: BatteryMetrics = client.get(uri).await.unwrap();

    assert_eq!(metrics.cell_voltages.len(), metrics.cell_voltages_count);
    assert_eq!(metrics.output_current_amps.len(), 1);
    assert_eq!(metrics.stored_energy_watt_hours.reading, Some(37.4));
    assert!(!metrics.status.is_healthy());
}
