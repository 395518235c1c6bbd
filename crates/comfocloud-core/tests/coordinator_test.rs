#![allow(clippy::unwrap_used)]
// Integration tests for the update coordinator, entities, and hub,
// using wiremock as a stand-in for the cloud API.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comfocloud_api::{CloudClient, DeviceId};
use comfocloud_core::{
    CoreError, Fan, HubConfig, Hub, SENSORS, Select, Sensor, UpdateCoordinator,
    descriptor::BYPASS_SELECT,
};

const DEVICE: DeviceId = DeviceId(12345);

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CloudClient) {
    let server = MockServer::start().await;
    let client = CloudClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn coordinator(client: &CloudClient) -> Arc<UpdateCoordinator> {
    Arc::new(UpdateCoordinator::new(
        client.clone(),
        DEVICE,
        Duration::from_secs(30),
    ))
}

async fn mount_state(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/devices/12345/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/devices/12345/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serialNumber": "BEA004185031910",
            "deviceType": {"name": "ComfoAirQ"},
            "properties": [{"name": "swVersion", "value": "R1.4.0"}]
        })))
        .mount(server)
        .await;
}

fn sensor_by_key(coordinator: &Arc<UpdateCoordinator>, key: &str) -> Sensor {
    let descriptor = SENSORS.iter().find(|d| d.key == key).unwrap();
    Sensor::new(Arc::clone(coordinator), descriptor)
}

// ── Fetch cycle tests ───────────────────────────────────────────────

#[tokio::test]
async fn successful_cycle_publishes_snapshot_with_timestamp() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    let snapshot = coordinator.snapshot().expect("snapshot published");
    assert_eq!(snapshot.state.timestamp(), Some(111));
    assert_eq!(snapshot.details.property("swVersion"), Some("R1.4.0"));
}

#[tokio::test]
async fn missing_timestamp_fails_cycle_and_stores_nothing() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"ventilationPreset": 2})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    let result = coordinator.first_refresh().await;

    match result {
        Err(CoreError::UpdateFailed { ref message }) => {
            assert!(message.contains("timestamp"), "got: {message}");
        }
        other => panic!("expected UpdateFailed, got: {other:?}"),
    }
    assert!(coordinator.snapshot().is_none());
}

#[tokio::test]
async fn failed_cycle_retains_previous_snapshot() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    // Subsequent updates come back incomplete -- the old snapshot stays.
    server.reset().await;
    mount_state(&server, json!({"ventilationPreset": 3})).await;
    mount_details(&server).await;

    let result = coordinator.refresh_now().await;
    assert!(matches!(result, Err(CoreError::UpdateFailed { .. })));

    let snapshot = coordinator.snapshot().expect("previous snapshot retained");
    assert_eq!(snapshot.state.timestamp(), Some(111));
}

#[tokio::test]
async fn auth_failure_on_state_call_is_authentication_required() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/devices/12345/state"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let coordinator = coordinator(&client);
    let result = coordinator.first_refresh().await;

    assert!(
        matches!(result, Err(CoreError::AuthenticationRequired { .. })),
        "expected AuthenticationRequired, got: {result:?}"
    );
    assert!(coordinator.snapshot().is_none());
}

#[tokio::test]
async fn auth_failure_on_details_call_is_authentication_required() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111})).await;
    Mock::given(method("GET"))
        .and(path("/devices/12345/details"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let coordinator = coordinator(&client);
    let result = coordinator.first_refresh().await;

    assert!(
        matches!(result, Err(CoreError::AuthenticationRequired { .. })),
        "expected AuthenticationRequired, got: {result:?}"
    );
}

#[tokio::test]
async fn refresh_now_awaits_in_flight_fetch_instead_of_duplicating() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/12345/state"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"timestamp": 111}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices/12345/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"properties": []})))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&client);

    let first = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.refresh_now().await })
    };
    // Let the first refresh take the in-flight guard.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Overlapping call: must await the running cycle, not start another.
    coordinator.refresh_now().await.unwrap();
    first.await.unwrap().unwrap();

    assert!(coordinator.snapshot().is_some());
    // Mock expectations (exactly one state + one details request)
    // are verified when `server` drops.
}

#[tokio::test]
async fn reads_before_first_fetch_are_not_yet_available() {
    let (_server, client) = setup().await;
    let coordinator = coordinator(&client);

    let sensor = sensor_by_key(&coordinator, "ventilationPreset");
    assert!(matches!(sensor.value(), Err(CoreError::NotYetAvailable)));
}

#[tokio::test]
async fn snapshot_stream_sees_publication() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    let mut stream = coordinator.subscribe();
    assert!(stream.current().is_none());

    coordinator.first_refresh().await.unwrap();

    let snapshot = stream.changed().await.expect("publication observed");
    assert_eq!(snapshot.state.timestamp(), Some(111));
}

// ── Entity tests ────────────────────────────────────────────────────

#[tokio::test]
async fn fan_and_sensor_read_the_reference_scenario() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    let fan = Fan::new(Arc::clone(&coordinator));
    assert_eq!(fan.percentage().unwrap(), 50);
    assert!(fan.is_on().unwrap());

    let sensor = sensor_by_key(&coordinator, "ventilationPreset");
    assert_eq!(sensor.value().unwrap(), json!(2));
    assert_eq!(sensor.unique_id(), "12345_ventilationPreset");
}

#[tokio::test]
async fn missing_field_fails_one_entity_but_not_siblings() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    let missing = sensor_by_key(&coordinator, "exhaustAirTemp");
    assert!(matches!(
        missing.value(),
        Err(CoreError::FieldMissing {
            key: "exhaustAirTemp"
        })
    ));

    let sibling = sensor_by_key(&coordinator, "ventilationPreset");
    assert_eq!(sibling.value().unwrap(), json!(2));
}

#[tokio::test]
async fn fan_set_percentage_patches_settings_then_refreshes() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    Mock::given(method("PUT"))
        .and(path("/devices/12345/settings"))
        .and(body_json(json!({"setVentilationPreset": {"value": 2}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    let fan = Fan::new(Arc::clone(&coordinator));
    fan.set_percentage(50).await.unwrap();

    assert_eq!(fan.percentage().unwrap(), 50);
}

#[tokio::test]
async fn select_reads_state_and_sends_override() {
    let (server, client) = setup().await;
    mount_state(&server, json!({"timestamp": 111, "bypassMode": 2})).await;
    mount_details(&server).await;

    Mock::given(method("PUT"))
        .and(path("/devices/12345/settings"))
        .and(body_json(json!({"forceBypass": {"seconds": 3600}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&client);
    coordinator.first_refresh().await.unwrap();

    let select = Select::new(Arc::clone(&coordinator), &BYPASS_SELECT);
    assert_eq!(select.current_option().unwrap(), "auto");

    select.select_option("open").await.unwrap();

    // Unknown options are rejected without touching the network.
    let result = select.select_option("closed").await;
    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
}

// ── Hub tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn hub_discovers_devices_and_builds_entities() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": [12345]})))
        .mount(&server)
        .await;
    mount_state(&server, json!({"timestamp": 111, "ventilationPreset": 2})).await;
    mount_details(&server).await;

    let hub = Hub::from_client(client, HubConfig::default());
    hub.connect().await.unwrap();

    assert_eq!(hub.device_ids(), vec![DEVICE]);
    assert_eq!(hub.fan(DEVICE).unwrap().percentage().unwrap(), 50);
    assert_eq!(hub.sensors(DEVICE).unwrap().len(), SENSORS.len());

    let unknown = hub.fan(DeviceId(999));
    assert!(matches!(
        unknown,
        Err(CoreError::DeviceNotFound { id: DeviceId(999) })
    ));

    hub.shutdown().await;
}

#[tokio::test]
async fn hub_setup_fails_hard_on_auth_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": [12345]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices/12345/state"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let hub = Hub::from_client(client, HubConfig::default());
    let result = hub.connect().await;

    assert!(
        matches!(result, Err(CoreError::AuthenticationRequired { .. })),
        "expected AuthenticationRequired, got: {result:?}"
    );
    assert!(hub.device_ids().is_empty());
}
