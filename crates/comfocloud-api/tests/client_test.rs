#![allow(clippy::unwrap_used)]
// Integration tests for `CloudClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comfocloud_api::{CloudClient, DeviceId, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CloudClient) {
    let server = MockServer::start().await;
    let client = CloudClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Auth header tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_header_sent() {
    let server = MockServer::start().await;
    let token: secrecy::SecretString = "tok-123".to_string().into();
    let client =
        CloudClient::from_token(&server.uri(), &token, &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": [1]})))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.get_devices().await.unwrap();
    assert_eq!(devices, vec![DeviceId(1)]);
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"devices": [12345, 67890]})),
        )
        .mount(&server)
        .await;

    let devices = client.get_devices().await.unwrap();

    assert_eq!(devices, vec![DeviceId(12345), DeviceId(67890)]);
}

#[tokio::test]
async fn test_get_device_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/12345/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": 1_718_443_800,
            "ventilationPreset": 2,
            "exhaustAirTemp": 264,
            "manualMode": true
        })))
        .mount(&server)
        .await;

    let state = client.get_device_state(DeviceId(12345)).await.unwrap();

    assert_eq!(state.timestamp(), Some(1_718_443_800));
    assert_eq!(state.value("ventilationPreset"), Some(&json!(2)));
    assert_eq!(state.value("exhaustAirTemp"), Some(&json!(264)));
}

#[tokio::test]
async fn test_get_device_details() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/12345/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serialNumber": "BEA004185031910",
            "deviceType": {"name": "ComfoAirQ"},
            "properties": [
                {"name": "swVersion", "value": "R1.4.0"},
                {"name": "hwVersion", "value": "2"}
            ]
        })))
        .mount(&server)
        .await;

    let details = client.get_device_details(DeviceId(12345)).await.unwrap();

    assert_eq!(details.property("swVersion"), Some("R1.4.0"));
    assert_eq!(
        details.value("serialNumber").and_then(|v| v.as_str()),
        Some("BEA004185031910")
    );
}

#[tokio::test]
async fn test_set_device_settings() {
    let (server, client) = setup().await;

    let patch = json!({"setVentilationPreset": {"value": 3}});

    Mock::given(method("PUT"))
        .and(path("/devices/12345/settings"))
        .and(body_json(&patch))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_device_settings(DeviceId(12345), &patch)
        .await
        .unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_auth_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_device_state(DeviceId(1)).await;

    match result {
        Err(ref err @ Error::AuthenticationExpired) => assert!(err.is_auth_expired()),
        other => panic!("expected AuthenticationExpired, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_maps_to_auth_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.get_devices().await;

    assert!(
        matches!(result, Err(Error::AuthenticationExpired)),
        "expected AuthenticationExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_structured_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/1/state"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "internal gateway error",
            "code": "gateway.upstream"
        })))
        .mount(&server)
        .await;

    let result = client.get_device_state(DeviceId(1)).await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 500);
            assert!(message.contains("internal gateway error"));
            assert_eq!(code.as_deref(), Some("gateway.upstream"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.get_devices().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
