//! Verify request building and response parsing against JSON vectors stored
//! in `test-vectors/`.
//!
//! Request vectors name an operation, its input, and either the request the
//! client must produce or the error it must raise. Response vectors pair a
//! simulated response with the expected classification. Bodies are compared
//! as parsed JSON so key order never matters.

use pushbots::{
    parse_response, request, ApiError, Batch, Broadcast, ClientConfig, DevicePush, HttpMethod,
    HttpResponse, Operation, Platform, PushBots, PushRequest, RegisterDevice, Result,
};
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PushBots {
    PushBots::with_config(ClientConfig::new("appId", "secret", false).with_base_url(BASE_URL))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

/// Arguments of the operations that take positional parameters.
#[derive(Deserialize)]
struct Args {
    platform: Platform,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lng: String,
    #[serde(default)]
    notification_type: String,
    #[serde(default)]
    stats: String,
    #[serde(default)]
    count: i64,
}

impl Args {
    fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }
}

fn args(input: &Value) -> Args {
    serde_json::from_value(input.clone()).unwrap()
}

fn input<T: serde::de::DeserializeOwned>(input: &Value) -> T {
    serde_json::from_value(input.clone()).unwrap()
}

fn build(operation: &str, value: &Value) -> (Operation, Result<PushRequest>) {
    match operation {
        "register_device" => (
            Operation::RegisterDevice,
            request::register_device(&input::<RegisterDevice>(value)),
        ),
        "unregister_device" => {
            let a = args(value);
            (Operation::UnregisterDevice, request::unregister_device(a.token(), a.platform))
        }
        "set_alias" => {
            let a = args(value);
            let alias = a.alias.clone().unwrap_or_default();
            (Operation::Alias, request::set_alias(a.token(), a.platform, &alias))
        }
        "tag_device" | "untag_device" => {
            let a = args(value);
            let op = if operation == "tag_device" {
                Operation::TagDevice
            } else {
                Operation::UnTagDevice
            };
            (op, request::tag(a.token.as_deref(), a.platform, a.alias.as_deref(), &a.tag))
        }
        "geo" => {
            let a = args(value);
            (Operation::Geo, request::geo(a.token(), a.platform, &a.lat, &a.lng))
        }
        "add_notification_type" | "remove_notification_type" => {
            let a = args(value);
            let op = if operation == "add_notification_type" {
                Operation::AddNotificationType
            } else {
                Operation::RemoveNotificationType
            };
            let req = request::notification_type(
                a.token.as_deref(),
                a.platform,
                a.alias.as_deref(),
                &a.notification_type,
            );
            (op, req)
        }
        "broadcast" => (Operation::Broadcast, request::broadcast(&input::<Broadcast>(value))),
        "send_push_to_device" => (
            Operation::PushOne,
            request::device_push(&input::<DevicePush>(value)),
        ),
        "batch" => (Operation::Batch, request::batch(&input::<Batch>(value))),
        "badge" => {
            let a = args(value);
            (Operation::Badge, request::badge(a.token(), a.platform, a.count))
        }
        "record_analytics" => {
            let a = args(value);
            (
                Operation::RecordAnalytics,
                request::record_analytics(a.token(), a.platform, &a.stats),
            )
        }
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (op, payload) = build(case["operation"].as_str().unwrap(), &case["input"]);

        if let Some(expected_error) = case.get("expected_error") {
            let err = payload.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidArgument" => assert!(
                    matches!(err, ApiError::InvalidArgument(_)),
                    "{name}: expected InvalidArgument, got {err:?}"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let expected_req = &case["expected_request"];
        let req = c.build_request(op, &payload.unwrap()).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let req_body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");
    }
}

#[test]
fn vectors_reject_unknown_platform_codes() {
    let bad = serde_json::json!({ "token": "token", "platform": "2" });
    assert!(serde_json::from_value::<RegisterDevice>(bad).is_err());
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let expected_message = case.get("expected_message").and_then(Value::as_str);
        let result = parse_response(response);

        match case["expected"].as_str().unwrap() {
            "Ok" => assert!(result.is_ok(), "{name}: expected success, got {result:?}"),
            "Application" => match result {
                Err(ApiError::Application(message)) => {
                    if let Some(expected) = expected_message {
                        assert_eq!(message, expected, "{name}: message");
                    }
                }
                other => panic!("{name}: expected Application, got {other:?}"),
            },
            "MalformedResponse" => assert!(
                matches!(result, Err(ApiError::MalformedResponse(_))),
                "{name}: expected MalformedResponse, got {result:?}"
            ),
            "UnexpectedStatus" => match result {
                Err(ApiError::UnexpectedStatus { status, message, .. }) => {
                    assert_eq!(status as u64, sim["status"].as_u64().unwrap(), "{name}: status");
                    assert_eq!(message.as_deref(), expected_message, "{name}: message");
                }
                other => panic!("{name}: expected UnexpectedStatus, got {other:?}"),
            },
            other => panic!("{name}: unknown expectation: {other}"),
        }
    }
}
