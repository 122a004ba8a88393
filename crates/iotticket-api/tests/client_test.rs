// Integration tests for `IoTTicketClient` using wiremock.

use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use iotticket_api::{
    CancellationToken, Credentials, DatanodeQueryCriteria, DatanodeWritableValue, Device,
    ErrorCode, Error, Grouping, IoTTicketClient, SecretString, SortOrder,
    StatisticalDataQueryCriteria, Value,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// `user:pass` in Basic form.
const BASIC_AUTH: &str = "Basic dXNlcjpwYXNz";

async fn setup() -> (MockServer, IoTTicketClient) {
    let server = MockServer::start().await;
    let credentials = Credentials::new("user", SecretString::from("pass".to_owned())).unwrap();
    let client =
        IoTTicketClient::new(&format!("{}/api/v1", server.uri()), &credentials).unwrap();
    (server, client)
}

fn local_midnight(y: i32, m: u32, d: u32) -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(y, m, d, 0, 0, 0)
        .unwrap()
}

fn device_json(id: &str) -> serde_json::Value {
    json!({
        "name": "Sensor",
        "manufacturer": "Acme",
        "type": "thermometer",
        "attributes": [{ "key": "floor", "value": "7" }],
        "deviceId": id,
        "href": format!("https://my.iot-ticket.com/api/v1/devices/{id}"),
        "createdAt": "2019-01-01T10:00:00UTC"
    })
}

fn write_result_json() -> serde_json::Value {
    json!({
        "totalWritten": 1,
        "writeResults": [{
            "href": "https://my.iot-ticket.com/api/v1/process/read/d-1/?datanodes=room/Temperature",
            "writtenCount": 1
        }]
    })
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_request_sends_basic_auth_and_accept_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .and(header("authorization", BASIC_AUTH))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalDevices": 2,
            "maxNumberOfDevices": 10,
            "maxDataNodePerDevice": 100,
            "usedStorageSize": 1024,
            "maxStorageSize": 1_048_576
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quota = client.get_quota().await.unwrap();
    assert_eq!(quota.total_device_count, 2);
    assert_eq!(quota.max_storage_bytes, 1_048_576);

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap();
    assert!(agent.to_str().unwrap().starts_with("iotticket-rs/"));
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_device_posts_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/devices/"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({
            "name": "Sensor",
            "manufacturer": "Acme",
            "type": "thermometer",
            "attributes": [{ "key": "floor", "value": "7" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(device_json("d-1")))
        .expect(1)
        .mount(&server)
        .await;

    let device = Device::new("Sensor", "Acme")
        .with_type("thermometer")
        .with_attribute("floor", "7");
    let details = client.register_device(&device).await.unwrap();

    assert_eq!(details.id, "d-1");
    assert_eq!(details.device, device);
    assert_eq!(
        details.creation_date,
        Utc.with_ymd_and_hms(2019, 1, 1, 10, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_get_devices_sends_limit_and_offset() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [device_json("d-1"), device_json("d-2")],
            "offset": 20,
            "limit": 10,
            "fullSize": 22
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.get_devices(10, 20).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.skip, 20);
    assert_eq!(page.total_count, 22);
    assert_eq!(page.result[1].id, "d-2");
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_get_device_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/d-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_json("d-1")))
        .expect(1)
        .mount(&server)
        .await;

    let details = client.get_device("d-1").await.unwrap();
    assert_eq!(details.device.manufacturer, "Acme");
}

#[tokio::test]
async fn test_get_datanodes_for_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/d-1/datanodes/"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "name": "Temperature",
                "unit": "c",
                "dataType": "double",
                "href": "https://my.iot-ticket.com/api/v1/process/read/d-1/?datanodes=room/Temperature"
            }],
            "offset": 0,
            "limit": 5,
            "fullSize": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.get_datanodes("d-1", 5, 0).await.unwrap();
    assert_eq!(page.result[0].name, "Temperature");
    assert_eq!(page.result[0].data_type, "double");
}

#[tokio::test]
async fn test_ids_are_escaped_as_single_path_segments() {
    let (server, client) = setup().await;

    let empty_page = json!({ "items": [], "offset": 0, "limit": 10, "fullSize": 0 });
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/a%20b%2Fc/datanodes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/enterprises/E%C3%A4%2B1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty_page))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.get_datanodes("a b/c", 10, 0).await.unwrap().is_empty());
    assert!(client.get_sub_enterprises("Eä+1", 10, 0).await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/api/v1/devices/a%20b%2Fc/datanodes/");
    assert_eq!(requests[0].url.query(), Some("limit=10&offset=0"));
    assert_eq!(requests[1].url.path(), "/api/v1/enterprises/E%C3%A4%2B1/");
}

#[tokio::test]
async fn test_blank_ids_fail_before_any_request() {
    let (server, client) = setup().await;

    assert!(client.get_device("").await.unwrap_err().is_invalid_argument());
    assert!(client.get_device("   ").await.unwrap_err().is_invalid_argument());
    assert!(client.get_datanodes("", 10, 0).await.unwrap_err().is_invalid_argument());
    assert!(client.get_device_quota("").await.unwrap_err().is_invalid_argument());
    assert!(
        client
            .get_sub_enterprises(" ", 10, 0)
            .await
            .unwrap_err()
            .is_invalid_argument()
    );
    assert!(
        client
            .write_datapoint_collection("d-1", &[])
            .await
            .unwrap_err()
            .is_invalid_argument()
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Process data ────────────────────────────────────────────────────

#[tokio::test]
async fn test_write_datapoint_matches_single_element_collection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/process/write/d-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_result_json()))
        .expect(2)
        .mount(&server)
        .await;

    let value = DatanodeWritableValue::new("Temperature", "room", 21.5)
        .with_unit("c")
        .with_timestamp(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap());

    let single = client.write_datapoint("d-1", &value).await.unwrap();
    let many = client
        .write_datapoint_collection("d-1", std::slice::from_ref(&value))
        .await
        .unwrap();
    assert_eq!(single, many);
    assert_eq!(single.total_write_count, 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!([{
            "name": "Temperature",
            "path": "room",
            "unit": "c",
            "v": 21.5,
            "ts": 1_546_300_800_000_i64,
            "dataType": "double"
        }])
    );
}

#[tokio::test]
async fn test_write_collection_tags_each_value_type() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/process/write/d-1/"))
        .and(body_json(json!([
            { "name": "count", "path": "p", "v": 7, "dataType": "long" },
            { "name": "label", "path": "p", "v": "on", "dataType": "string" },
            { "name": "open", "path": "p", "v": true, "dataType": "boolean" },
            { "name": "blob", "path": "p", "v": "AQID", "dataType": "binary" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_result_json()))
        .expect(1)
        .mount(&server)
        .await;

    let values = [
        DatanodeWritableValue::new("count", "p", 7_i32),
        DatanodeWritableValue::new("label", "p", "on"),
        DatanodeWritableValue::new("open", "p", true),
        DatanodeWritableValue::new("blob", "p", vec![1_u8, 2, 3]),
    ];
    client.write_datapoint_collection("d-1", &values).await.unwrap();
}

#[tokio::test]
async fn test_write_with_non_finite_double_is_a_serialization_error() {
    let (server, client) = setup().await;

    let value = DatanodeWritableValue::new("bad", "p", f64::INFINITY);
    let err = client.write_datapoint("d-1", &value).await.unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_process_data_query_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/process/read/id1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "https://my.iot-ticket.com/api/v1/process/read/id1/",
            "datanodeReads": [{
                "name": "path1",
                "dataType": "long",
                "path": "test",
                "values": [{ "v": "42", "ts": 1_546_293_600_000_i64 }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = DatanodeQueryCriteria::new("id1", ["test/path1", "test/path2"])
        .unwrap()
        .with_sort_order(SortOrder::Descending)
        .with_start_date(local_midnight(2019, 1, 1))
        .with_end_date(local_midnight(2019, 1, 2))
        .with_count(10);
    let values = client.read_process_data(&criteria).await.unwrap();

    assert_eq!(
        values.datanodes[0].decoded_values().unwrap(),
        vec![Value::Long(42)]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some(
            "datanodes=test/path1,test/path2&order=descending&fromdate=1546293600000&todate=1546380000000&limit=10"
        )
    );
}

#[tokio::test]
async fn test_read_statistical_data_query_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stat/read/deviceId/"))
        .and(query_param("grouping", "day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "https://my.iot-ticket.com/api/v1/stat/read/deviceId/",
            "datanodeReads": [{
                "name": "path1",
                "dataType": "double",
                "path": "test",
                "values": [
                    { "min": 1.0, "max": 2.0, "avg": 1.5, "count": 2, "sum": 3.0, "ts": 1_546_293_600_000_i64 },
                    { "count": 0, "sum": 0.0, "ts": 1_546_380_000_000_i64 }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = StatisticalDataQueryCriteria::new(
        "deviceId",
        Grouping::Day,
        local_midnight(2019, 1, 1),
        local_midnight(2019, 2, 1),
        ["test/path1", "test/path2"],
    )
    .unwrap()
    .with_sort_order(SortOrder::Descending)
    .with_vtags(["vtag1", "vtag2"]);
    let stats = client.read_statistical_data(&criteria).await.unwrap();

    let buckets = &stats.datanodes[0].values;
    assert_eq!(buckets[0].average, Some(1.5));
    assert_eq!(buckets[1].average, None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some(
            "datanodes=test/path1,test/path2&fromdate=1546293600000&todate=1548972000000&grouping=day&order=descending&vtags=vtag1,vtag2"
        )
    );
}

// ── Enterprises & quota ─────────────────────────────────────────────

#[tokio::test]
async fn test_enterprise_listings() {
    let (server, client) = setup().await;

    let page = json!({
        "items": [{
            "href": "https://my.iot-ticket.com/api/v1/enterprises/E1",
            "name": "Root",
            "resourceId": "E1",
            "hasSubEnterprises": true
        }],
        "offset": 0,
        "limit": 10,
        "fullSize": 1
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/enterprises/"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/enterprises/E1/"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;

    let roots = client.get_root_enterprises(10, 0).await.unwrap();
    assert_eq!(roots.result[0].resource_id, "E1");
    assert!(roots.result[0].has_sub_enterprises);

    let subs = client.get_sub_enterprises("E1", 10, 0).await.unwrap();
    assert_eq!(subs.len(), 1);
}

#[tokio::test]
async fn test_get_device_quota() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/d-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deviceId": "d-1",
            "totalRequestToday": 4,
            "maxReadRequestPerDay": 1000,
            "numberOfDataNodes": 3,
            "storageSize": 2048
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quota = client.get_device_quota("d-1").await.unwrap();
    assert_eq!(quota.device_id, "d-1");
    assert_eq!(quota.max_read_request_count_per_day, 1000);
}

// ── Error translation ───────────────────────────────────────────────

#[tokio::test]
async fn test_forbidden_with_error_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "description": "Permission not sufficient",
            "code": 8001,
            "moreInfo": "https://my.iot-ticket.com/api/v1/errorcodes",
            "apiver": 1
        })))
        .mount(&server)
        .await;

    let err = client.get_quota().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.error_code(), Some(ErrorCode::PermissionNotSufficient));

    match err {
        Error::ServerCommunication {
            status,
            message,
            error_info: Some(info),
            ..
        } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Permission not sufficient");
            assert_eq!(info.description, "Permission not sufficient");
            assert_eq!(info.code, 8001);
            assert_eq!(
                info.more_info_url.as_deref(),
                Some("https://my.iot-ticket.com/api/v1/errorcodes")
            );
            assert_eq!(info.api_version, 1);
        }
        other => panic!("expected ServerCommunication with ErrorInfo, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_with_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<html>Forbidden</html>"))
        .mount(&server)
        .await;

    let err = client.get_quota().await.unwrap_err();
    match err {
        Error::ServerCommunication {
            status,
            message,
            body,
            error_info,
        } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Forbidden");
            assert_eq!(body, "<html>Forbidden</html>");
            assert!(error_info.is_none());
        }
        other => panic!("expected ServerCommunication, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_info_without_description_keeps_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "code": 8001 })))
        .mount(&server)
        .await;

    let err = client.get_quota().await.unwrap_err();
    assert_eq!(err.error_code(), Some(ErrorCode::PermissionNotSufficient));
    match err {
        Error::ServerCommunication { message, .. } => assert_eq!(message, "Forbidden"),
        other => panic!("expected ServerCommunication, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_device("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.error_info().is_none());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_quota().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "not json"));
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_failure() {
    let credentials = Credentials::new("user", SecretString::from("pass".to_owned())).unwrap();
    let client = IoTTicketClient::new("http://127.0.0.1:1/api/v1/", &credentials).unwrap();

    let err = client.get_quota().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.status().is_none());
    assert!(err.error_info().is_none());
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quota/all/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let scoped = client.with_cancellation(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let err = scoped.get_quota().await.unwrap_err();
    assert!(err.is_cancelled(), "got: {err:?}");
    assert!(!matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_already_cancelled_token_sends_nothing() {
    let (server, client) = setup().await;

    let token = CancellationToken::new();
    token.cancel();
    let err = client
        .with_cancellation(token)
        .get_device("d-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_client_stays_usable_after_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/d-1/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/d-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_json("d-1")))
        .mount(&server)
        .await;

    assert_eq!(client.get_device("d-1").await.unwrap_err().status(), Some(500));
    assert_eq!(client.get_device("d-1").await.unwrap().id, "d-1");
}
