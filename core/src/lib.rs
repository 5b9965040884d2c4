//! Client for the PushBots push notification REST API.
//!
//! # Overview
//! Registers and tags devices, manages notification types and badges, records
//! analytics, and dispatches pushes to one device, to whole platforms, or to a
//! filtered batch. Every call is a single synchronous JSON request carrying
//! the app id and secret headers.
//!
//! # Design
//! - Arguments are validated before anything is sent; a bad call never
//!   reaches the network.
//! - `PushBots` builds an `HttpRequest`, passes it to a [`Transport`], and
//!   classifies the `HttpResponse`. The default transport is a blocking `ureq`
//!   agent; any other HTTP stack plugs in through the trait.
//! - The endpoint table is owned by the client, resolved once from the base
//!   URL and rebuilt only by `apply_endpoint_override`.
//! - With `debug` enabled, outgoing bodies and responses are emitted as
//!   `tracing` debug events under the `pushbots` target.
//!
//! ```no_run
//! use pushbots::{DevicePush, Platform, PushBots};
//!
//! let client = PushBots::new("app id", "secret", false);
//! let mut push = DevicePush::new("device token", Platform::Ios, "Hello");
//! push.sound = Some("chime".to_string());
//! client.send_push_to_device(&push)?;
//! # Ok::<(), pushbots::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{parse_response, PushBots, APP_ID_HEADER, SECRET_HEADER};
pub use config::{ClientConfig, PRODUCTION_ENDPOINT};
pub use endpoint::{EndpointDescriptor, EndpointTable, Operation};
pub use error::{ApiError, BoxError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Batch, Broadcast, DevicePush, OneOrMany, Platform, PushRequest, RegisterDevice};
