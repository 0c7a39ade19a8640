#[path = "../../xdome-client/tests/common/mod.rs"]
mod common;

use common::serve_once;
use serde_json::{json, Value};
use xdome_core::Params;
use xdome_operations::{
    check_health, dispatch, execute_generic_claroty_api, get_devices, ConnectorConfig,
    ErrorDetail,
};

fn config_for(base_url: &str) -> ConnectorConfig {
    let mut config = ConnectorConfig::new(base_url, "secret-key");
    config.timeout_secs = 2;
    config.utc_timestamps = true;
    config
}

fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn devices_query_posts_filter_expression() {
    let (base, server) = serve_once("200 OK", r#"{"devices": [], "count": 0}"#).await;

    let response = get_devices(
        &config_for(&base),
        &params(json!({
            "fields": {"limit": 10},
            "device_type": "PLC, Sensor",
            "purdue_level": ["Level 1", "Level 3"],
            "after_detected_time": 0,
            "offset": ""
        })),
    )
    .await
    .unwrap();
    assert_eq!(response, json!({"devices": [], "count": 0}));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post /api/v1/devices "));
    assert!(captured.head.contains("authorization: bearer secret-key"));
    assert_eq!(
        captured.json(),
        json!({
            "limit": 10,
            "filter_by": {
                "operation": "and",
                "operands": [
                    {"field": "device_type", "operation": "in", "value": ["PLC", "Sensor"]},
                    {"field": "purdue_level", "operation": "in", "value": [1, 3]},
                    {"field": "detected_time", "operation": "greater_or_equal", "value": "1970-01-01T00:00:00.000000Z"}
                ]
            }
        })
    );
}

#[tokio::test]
async fn dispatch_by_name_reaches_endpoint() {
    let (base, server) = serve_once("200 OK", r#"{"ot_activity_events": []}"#).await;

    dispatch(&config_for(&base), "get_ot_events", &params(json!({"limit": 5})))
        .await
        .unwrap();

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post /api/v1/ot_activity_events "));
    assert_eq!(captured.json(), json!({"limit": 5}));
}

#[tokio::test]
async fn generic_call_sends_parameters_verbatim() {
    let (base, server) = serve_once("200 OK", r#"{"sites": []}"#).await;

    let body = json!({"fields": ["site_name"], "filter_by": {"operation": "and", "operands": []}});
    execute_generic_claroty_api(
        &config_for(&base),
        &params(json!({"endpoint": "api/v1/sites", "parameters": body})),
    )
    .await
    .unwrap();

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post /api/v1/sites "));
    assert_eq!(captured.json(), body);
}

#[tokio::test]
async fn generic_call_requires_endpoint() {
    let err = execute_generic_claroty_api(
        &config_for("http://127.0.0.1:9"),
        &params(json!({"parameters": {}})),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.detail,
        ErrorDetail::Message("Missing required parameter: endpoint".into())
    );
}

#[tokio::test]
async fn unauthorized_surfaces_description() {
    let (base, _server) = serve_once("401 Unauthorized", r#"{"error": "bad token"}"#).await;

    let err = dispatch(&config_for(&base), "get_alerts", &Params::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.detail,
        ErrorDetail::Described {
            error_description: "bad token".into()
        }
    );
}

#[tokio::test]
async fn invalid_label_fails_before_sending() {
    let err = dispatch(
        &config_for("http://127.0.0.1:9"),
        "get_devices",
        &params(json!({"purdue_level": "Level 0"})),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.error_description(),
        "unknown label 'Level 0' for 'purdue_level'"
    );
}

#[tokio::test]
async fn health_check_probes_alerts() {
    let (base, server) = serve_once("200 OK", r#"{"alerts": [{"id": 1, "alert_name": "x"}]}"#).await;

    assert!(check_health(&config_for(&base)).await.unwrap());

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post /api/v1/alerts "));
    assert_eq!(
        captured.json(),
        json!({"limit": 1, "fields": ["id", "alert_name"]})
    );
}

#[tokio::test]
async fn health_check_reports_empty_response() {
    let (base, _server) = serve_once("200 OK", "{}").await;
    assert!(!check_health(&config_for(&base)).await.unwrap());
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let err = dispatch(&config_for("http://127.0.0.1:9"), "delete_everything", &Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported operation: delete_everything");
}
