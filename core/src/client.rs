//! The PushBots API client.
//!
//! # Design
//! Each public operation validates its arguments, builds a `PushRequest`,
//! turns it into an `HttpRequest` (`build_request`), hands that to the
//! `Transport`, and classifies the `HttpResponse` (`parse_response`). The
//! build and parse halves are public so callers that own their HTTP stack can
//! run the round-trip themselves.
//!
//! The endpoint table is owned by the client. It is resolved from the base
//! URL on first use behind a `OnceLock` and replaced only through
//! `apply_endpoint_override`, which needs `&mut self`. No other state
//! outlives a call.

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ClientConfig;
use crate::endpoint::{EndpointTable, Operation};
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::request;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Batch, Broadcast, DevicePush, Platform, PushRequest, RegisterDevice};

pub const APP_ID_HEADER: &str = "x-pushbots-appid";
pub const SECRET_HEADER: &str = "x-pushbots-secret";
const CONTENT_TYPE: &str = "application/json";

/// Client for the PushBots REST API.
pub struct PushBots<T = UreqTransport> {
    config: ClientConfig,
    endpoints: OnceLock<EndpointTable>,
    transport: T,
}

impl PushBots<UreqTransport> {
    /// Client for the production endpoint using the default `ureq` transport.
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>, debug: bool) -> Self {
        Self::with_config(ClientConfig::new(app_id, secret, debug))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> PushBots<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            endpoints: OnceLock::new(),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Point every endpoint at `base_url` and rebuild the endpoint table.
    pub fn apply_endpoint_override(&mut self, base_url: &str) {
        self.config.set_base_url(base_url);
        self.endpoints = OnceLock::from(EndpointTable::new(self.config.base_url()));
    }

    pub fn endpoints(&self) -> &EndpointTable {
        self.endpoints
            .get_or_init(|| EndpointTable::new(self.config.base_url()))
    }

    // -----------------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------------

    pub fn register_device(&self, input: &RegisterDevice) -> Result<()> {
        self.execute(Operation::RegisterDevice, &request::register_device(input)?)
    }

    pub fn unregister_device(&self, token: &str, platform: Platform) -> Result<()> {
        self.execute(
            Operation::UnregisterDevice,
            &request::unregister_device(token, platform)?,
        )
    }

    /// Attach `alias` to the device identified by `token`.
    pub fn set_alias(&self, token: &str, platform: Platform, alias: &str) -> Result<()> {
        self.execute(Operation::Alias, &request::set_alias(token, platform, alias)?)
    }

    /// Either `token` or `alias` identifies the device.
    pub fn tag_device(
        &self,
        token: Option<&str>,
        platform: Platform,
        alias: Option<&str>,
        tag: &str,
    ) -> Result<()> {
        self.execute(Operation::TagDevice, &request::tag(token, platform, alias, tag)?)
    }

    pub fn untag_device(
        &self,
        token: Option<&str>,
        platform: Platform,
        alias: Option<&str>,
        tag: &str,
    ) -> Result<()> {
        self.execute(Operation::UnTagDevice, &request::tag(token, platform, alias, tag)?)
    }

    pub fn geo(&self, token: &str, platform: Platform, lat: &str, lng: &str) -> Result<()> {
        self.execute(Operation::Geo, &request::geo(token, platform, lat, lng)?)
    }

    pub fn add_notification_type(
        &self,
        token: Option<&str>,
        platform: Platform,
        alias: Option<&str>,
        notification_type: &str,
    ) -> Result<()> {
        let req = request::notification_type(token, platform, alias, notification_type)?;
        self.execute(Operation::AddNotificationType, &req)
    }

    pub fn remove_notification_type(
        &self,
        token: Option<&str>,
        platform: Platform,
        alias: Option<&str>,
        notification_type: &str,
    ) -> Result<()> {
        let req = request::notification_type(token, platform, alias, notification_type)?;
        self.execute(Operation::RemoveNotificationType, &req)
    }

    /// Set the badge count shown on the device. Zero clears it.
    pub fn badge(&self, token: &str, platform: Platform, count: i64) -> Result<()> {
        self.execute(Operation::Badge, &request::badge(token, platform, count)?)
    }

    pub fn record_analytics(&self, token: &str, platform: Platform, stats: &str) -> Result<()> {
        self.execute(
            Operation::RecordAnalytics,
            &request::record_analytics(token, platform, stats)?,
        )
    }

    // -----------------------------------------------------------------------
    // Pushes
    // -----------------------------------------------------------------------

    /// Push to every device on the given platforms.
    pub fn broadcast(&self, input: &Broadcast) -> Result<()> {
        self.execute(Operation::Broadcast, &request::broadcast(input)?)
    }

    pub fn send_push_to_device(&self, input: &DevicePush) -> Result<()> {
        self.execute(Operation::PushOne, &request::device_push(input)?)
    }

    /// Push to the devices on one platform matching the input's filters.
    pub fn batch(&self, input: &Batch) -> Result<()> {
        self.execute(Operation::Batch, &request::batch(input)?)
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    /// Resolve, authenticate and serialize `payload` for `op`.
    pub fn build_request(&self, op: Operation, payload: &PushRequest) -> Result<HttpRequest> {
        let endpoint = self
            .endpoints()
            .get(op)
            .ok_or(ApiError::UnknownEndpoint(op))?;

        if !self.config.has_credentials() {
            return Err(ApiError::Unauthenticated);
        }

        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        Ok(HttpRequest {
            method: endpoint.method,
            url: endpoint.url.clone(),
            headers: vec![
                (APP_ID_HEADER.to_string(), self.config.app_id().to_string()),
                (SECRET_HEADER.to_string(), self.config.secret().to_string()),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ],
            body,
        })
    }

    /// Classify a response. See [`parse_response`].
    pub fn parse_response(&self, response: HttpResponse) -> Result<()> {
        parse_response(response)
    }

    fn execute(&self, op: Operation, payload: &PushRequest) -> Result<()> {
        let req = self.build_request(op, payload);
        if self.config.debug() {
            match &req {
                Ok(req) => {
                    debug!(target: "pushbots", operation = %op, method = %req.method, url = %req.url, body = %req.body, "sending request")
                }
                Err(err) => {
                    debug!(target: "pushbots", operation = %op, error = %err, payload = ?payload, "request not sent")
                }
            }
        }
        let req = req?;

        let response = self.transport.send(&req).map_err(ApiError::Transport)?;
        if self.config.debug() {
            debug!(target: "pushbots", operation = %op, status = response.status, body = %response.body, "received response");
        }

        parse_response(response)
    }
}

impl<T> fmt::Debug for PushBots<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushBots")
            .field("config", &self.config)
            .field("endpoints", &self.endpoints.get().map(EndpointTable::len))
            .finish_non_exhaustive()
    }
}

/// Classify a PushBots response.
///
/// Only 200 and 201 count as success, and even then a non-empty body is an
/// error envelope: the API answers successful calls with an empty body.
pub fn parse_response(response: HttpResponse) -> Result<()> {
    let body = response.body.trim();

    if response.status != 200 && response.status != 201 {
        return Err(ApiError::UnexpectedStatus {
            status: response.status,
            message: envelope_message(body),
            body: response.body,
        });
    }

    if body.is_empty() {
        return Ok(());
    }

    let mut envelope = parse_envelope(body)?;
    match envelope.remove("message") {
        Some(Value::String(message)) if !message.is_empty() => Err(ApiError::Application(message)),
        None | Some(Value::Null) | Some(Value::String(_)) => Err(ApiError::MalformedResponse(
            "could not interpret server message".to_string(),
        )),
        Some(Value::Object(_)) => Err(ApiError::Application(format!("server error: {body}"))),
        Some(_) => Err(ApiError::MalformedResponse(format!(
            "could not parse server message: {body}"
        ))),
    }
}

/// The envelope must be a JSON object; arrays and scalars are rejected.
fn parse_envelope(body: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))? {
        Value::Object(envelope) => Ok(envelope),
        _ => Err(ApiError::MalformedResponse(format!(
            "response body is not a JSON object: {body}"
        ))),
    }
}

fn envelope_message(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    match parse_envelope(body).ok()?.remove("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message),
        _ => None,
    }
}
