use axum::body::Bytes;
use axum::extract::Path;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method as AxumMethod, StatusCode as AxumStatusCode, Uri as AxumUri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use headers::ContentType;
use http::uri::Scheme;
use http::{Method, StatusCode};
use serde_json::{Value, json};

use super::{
    ApiClient, ApiClientBuilder, ApiClientError, Authentication, CallQuery, MultipartPart,
    Operation, Output, PROCESSING_MODE_HEADER, ProcessingMode, catalog,
};
use crate::redaction::RuleSet;

const ALARM_MEDIA_TYPE: &str = "application/vnd.com.nsn.cumulocity.alarm+json;charset=UTF-8;ver=0.9";

/// Describes the received request as JSON.
async fn echo(method: AxumMethod, uri: AxumUri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "accept": header("accept"),
        "contentType": header("content-type"),
        "authorization": header("authorization"),
        "processingMode": header("x-cumulocity-processing-mode"),
        "body": body,
    }))
}

async fn alarm_by_id(Path(id): Path<String>) -> Response {
    if id == "404" {
        let error = json!({
            "error": "alarm/Not Found",
            "message": format!("Finding alarm from database failed : No alarm for gid '{id}'!"),
            "info": "https://cumulocity.com/guides/reference/rest-implementation",
        });
        return (AxumStatusCode::NOT_FOUND, Json(error)).into_response();
    }

    let alarm = json!({
        "id": id,
        "type": "c8y_UnavailabilityAlarm",
        "severity": "MAJOR",
        "count": 1,
    });
    ([(CONTENT_TYPE, ALARM_MEDIA_TYPE)], alarm.to_string()).into_response()
}

async fn event_binary() -> Response {
    ([(CONTENT_TYPE, "image/png")], vec![0x89_u8, b'P', b'N', b'G']).into_response()
}

fn app() -> Router {
    Router::new()
        .route("/alarm/alarms/{id}", get(alarm_by_id).put(echo))
        .route("/event/events/{id}/binaries", get(event_binary).post(echo))
        .route("/ping", get(|| async { "pong" }))
        .route("/no-content", delete(|| async { AxumStatusCode::NO_CONTENT }))
        .fallback(echo)
}

async fn start_server() -> anyhow::Result<ApiClientBuilder> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app()).await });

    let builder = ApiClient::builder()
        .with_scheme(Scheme::HTTP)
        .with_host(addr.ip().to_string())
        .with_port(addr.port())
        .with_authentication(Authentication::Basic {
            tenant: Some("t1".to_string()),
            username: "user".to_string(),
            password: "pass".into(),
        });
    Ok(builder)
}

#[tokio::test]
async fn should_create_alarm_without_read_only_fields() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;
    let fetched = json!({
        "id": "10",
        "self": "https://t1.example/alarm/alarms/10",
        "creationTime": "2024-03-01T10:00:00.000Z",
        "type": "c8y_UnavailabilityAlarm",
        "text": "No data received",
        "severity": "MAJOR",
        "time": "2024-03-01T10:00:00.000Z",
        "count": 3,
        "source": {"id": "42", "name": "Device 42", "self": "https://t1.example/inventory/managedObjects/42"},
    });

    let echo = client
        .operation(&catalog::CREATE_ALARM)?
        .json(&fetched)?
        .await?
        .as_json::<Value>()?;

    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["path"], "/alarm/alarms");
    assert_eq!(echo["contentType"], "application/vnd.com.nsn.cumulocity.alarm+json");
    assert_eq!(echo["accept"], "application/vnd.com.nsn.cumulocity.alarm+json");
    // "t1/user:pass"
    assert_eq!(echo["authorization"], "Basic dDEvdXNlcjpwYXNz");
    insta::assert_snapshot!(
        serde_json::to_string(&echo["body"])?,
        @r#"{"type":"c8y_UnavailabilityAlarm","text":"No data received","severity":"MAJOR","time":"2024-03-01T10:00:00.000Z","source":{"id":"42"}}"#
    );
    Ok(())
}

#[tokio::test]
async fn should_update_alarm_by_operation_id() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;
    let alarm = json!({
        "id": "10",
        "source": {"id": "42"},
        "type": "c8y_UnavailabilityAlarm",
        "status": "ACKNOWLEDGED",
    });

    let echo = client
        .operation_by_id("updateAlarm")?
        .with_path_param("id", 10)
        .json(&alarm)?
        .await?
        .as_json::<Value>()?;

    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["path"], "/alarm/alarms/10");
    assert_eq!(echo["body"], json!({"status": "ACKNOWLEDGED"}));
    Ok(())
}

#[tokio::test]
async fn should_send_query_parameters() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let echo = client
        .operation_by_id("listAlarms")?
        .with_query(
            CallQuery::new()
                .add_param("source", 42)
                .add_param("severity", vec!["MAJOR", "CRITICAL"])
                .add_param("resolved", None::<bool>)
                .with_paging(5, 2),
        )
        .await?
        .as_json::<Value>()?;

    assert_eq!(echo["method"], "GET");
    assert_eq!(
        echo["query"],
        "source=42&severity=MAJOR%2CCRITICAL&pageSize=5&currentPage=2"
    );
    assert_eq!(
        echo["accept"],
        "application/vnd.com.nsn.cumulocity.alarmcollection+json"
    );
    assert_eq!(echo["contentType"], Value::Null);
    assert_eq!(echo["body"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn should_send_processing_mode() -> anyhow::Result<()> {
    let client = start_server()
        .await?
        .with_processing_mode(ProcessingMode::Transient)
        .build()?;

    let default = client.post("/event/events")?.await?.as_json::<Value>()?;
    let overridden = client
        .post("/event/events")?
        .with_processing_mode(ProcessingMode::Quiescent)
        .await?
        .as_json::<Value>()?;
    let custom = client
        .post("/event/events")?
        .with_processing_mode(ProcessingMode::Quiescent)
        .with_header(PROCESSING_MODE_HEADER, "CEP")
        .await?
        .as_json::<Value>()?;

    assert_eq!(default["processingMode"], "TRANSIENT");
    assert_eq!(overridden["processingMode"], "QUIESCENT");
    assert_eq!(custom["processingMode"], "CEP");
    Ok(())
}

#[tokio::test]
async fn should_report_platform_error() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let error = client
        .operation(&catalog::GET_ALARM)?
        .with_path_param("id", "404")
        .await
        .expect_err("alarm not found");

    assert_eq!(error.status_code(), Some(404));
    let ApiClientError::UnexpectedStatusCode { error: body, .. } = error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(body.error.as_deref(), Some("alarm/Not Found"));
    assert_eq!(
        body.message.as_deref(),
        Some("Finding alarm from database failed : No alarm for gid '404'!")
    );
    Ok(())
}

#[tokio::test]
async fn should_accept_expected_not_found() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let alarm = client
        .operation(&catalog::GET_ALARM)?
        .with_path_param("id", "404")
        .add_expected_status_code(StatusCode::NOT_FOUND)
        .await?
        .as_optional_json::<Value>()?;

    assert_eq!(alarm, None);
    Ok(())
}

#[tokio::test]
async fn should_read_vendor_json() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let result = client
        .operation(&catalog::GET_ALARM)?
        .with_path_param("id", "10")
        .await?;

    let content_type = result.content_type().map(ToString::to_string).unwrap_or_default();
    assert!(content_type.starts_with("application/vnd.com.nsn.cumulocity.alarm+json"));
    let alarm = result.as_payload()?;
    assert_eq!(
        serde_json::to_string(&alarm)?,
        r#"{"id":"10","type":"c8y_UnavailabilityAlarm","severity":"MAJOR","count":1}"#
    );
    Ok(())
}

#[tokio::test]
async fn should_upload_and_download_event_binary() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let upload = client
        .operation(&catalog::UPLOAD_EVENT_BINARY)?
        .with_path_param("id", 7)
        .multipart(vec![
            MultipartPart::text("object", r#"{"name":"log.txt","type":"text/plain"}"#),
            MultipartPart::file(
                "file",
                "log.txt",
                &ContentType::text(),
                b"line 1".to_vec(),
            ),
        ])?
        .await?
        .as_json::<Value>()?;
    let download = client
        .operation(&catalog::DOWNLOAD_EVENT_BINARY)?
        .with_path_param("id", 7)
        .await?;

    assert_eq!(upload["path"], "/event/events/7/binaries");
    let content_type = upload["contentType"].as_str().unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = upload["body"].as_str().unwrap_or_default();
    assert!(body.contains(r#"name="file"; filename="log.txt""#));
    assert_eq!(download.as_bytes()?, [0x89, b'P', b'N', b'G']);
    Ok(())
}

#[tokio::test]
async fn should_redact_bulk_bodies_element_wise() -> anyhow::Result<()> {
    static CREATE_MEASUREMENTS: Operation = Operation {
        id: "createMeasurements",
        method: Method::POST,
        path: "/measurement/measurements",
        content_type: Some("application/json"),
        accept: None,
        read_only: &["id", "self"],
        bulk: true,
    };
    let client = start_server().await?.build()?;
    let measurements = json!([
        {"id": "1", "type": "c8y_Temperature", "source": {"id": "42"}},
        {"id": "2", "self": "https://t1.example/measurement/measurements/2", "type": "c8y_Humidity"},
    ]);

    let echo = client
        .operation(&CREATE_MEASUREMENTS)?
        .json(&measurements)?
        .await?
        .as_json::<Value>()?;

    assert_eq!(
        echo["body"],
        json!([
            {"type": "c8y_Temperature", "source": {"id": "42"}},
            {"type": "c8y_Humidity"},
        ])
    );
    Ok(())
}

#[tokio::test]
async fn should_apply_ad_hoc_rules() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;
    let rules = RuleSet::parse(["id", "lastUpdated", "c8y_Firmware.url"])?;
    let device = json!({
        "id": "42",
        "lastUpdated": "2024-03-01T10:05:00.000Z",
        "name": "Device 42",
        "c8y_Firmware": {"name": "core", "version": "1.2.0", "url": "https://t1.example/fw"},
    });

    let echo = client
        .put("/inventory/managedObjects/{id}")?
        .with_path_param("id", 42)
        .with_read_only(&rules)
        .json(&device)?
        .await?
        .as_json::<Value>()?;

    assert_eq!(echo["path"], "/inventory/managedObjects/42");
    assert_eq!(echo["contentType"], "application/json");
    insta::assert_snapshot!(
        serde_json::to_string(&echo["body"])?,
        @r#"{"name":"Device 42","c8y_Firmware":{"name":"core","version":"1.2.0"}}"#
    );
    Ok(())
}

#[tokio::test]
async fn should_override_authentication_per_call() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let bearer = client
        .get("/inventory/managedObjects")?
        .with_authentication(Authentication::Bearer("device-token".into()))
        .await?
        .as_json::<Value>()?;
    let anonymous = client
        .get("/inventory/managedObjects")?
        .with_authentication_none()
        .await?
        .as_json::<Value>()?;

    assert_eq!(bearer["authorization"], "Bearer device-token");
    assert_eq!(anonymous["authorization"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn should_read_text_and_empty_bodies() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let ping = client.get("/ping")?.await?;
    let deleted = client.delete("/no-content")?.await?;

    assert_eq!(ping.as_text()?, "pong");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(deleted.output(), &Output::Empty);
    deleted.as_empty()?;
    Ok(())
}

#[tokio::test]
async fn should_reject_unknown_operation_and_missing_path_param() -> anyhow::Result<()> {
    let client = start_server().await?.build()?;

    let unknown = client.operation_by_id("createTenant").expect_err("unknown id");
    let unresolved = client
        .operation(&catalog::UPDATE_EVENT)?
        .json(&json!({"text": "moved"}))?
        .await
        .expect_err("missing id");

    assert!(matches!(unknown, ApiClientError::UnknownOperation { .. }));
    insta::assert_snapshot!(
        unresolved,
        @r#"Path '/event/events/{id}' is missing required arguments: ["id"]"#
    );
    Ok(())
}
