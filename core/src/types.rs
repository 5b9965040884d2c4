//! Wire payload and operation inputs for the PushBots API.
//!
//! # Design
//! `PushRequest` is the single body shape every endpoint accepts. All of its
//! fields are optional and skipped when unset, so an operation only ever
//! sends the keys it populated. `badge_count` is the one numeric field where
//! zero is meaningful; presence is carried by the `Option`, not the value.
//!
//! Operations with more than a handful of inputs take one of the named input
//! structs below instead of a long positional argument list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Target mobile platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Wire code: `"0"` for iOS, `"1"` for Android.
    pub fn code(self) -> &'static str {
        match self {
            Platform::Ios => "0",
            Platform::Android => "1",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Platform {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Platform::Ios),
            "1" => Ok(Platform::Android),
            other => Err(ApiError::invalid(format!(
                "platform must be \"0\" (iOS) or \"1\" (Android), got {other:?}"
            ))),
        }
    }
}

impl TryFrom<&str> for Platform {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Platform {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for &'static str {
    fn from(platform: Platform) -> Self {
        platform.code()
    }
}

/// A JSON field that is sometimes a single value and sometimes a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Request body shared by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<OneOrMany<Platform>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub except_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(rename = "active", skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub except_tags: Vec<String>,
    #[serde(rename = "except_active", skip_serializing_if = "Vec::is_empty")]
    pub except_notification_types: Vec<String>,
    #[serde(rename = "setbadgecount", skip_serializing_if = "Option::is_none")]
    pub badge_count: Option<i64>,
}

/// Input for `PushBots::register_device`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDevice {
    pub token: String,
    pub platform: Platform,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
    #[serde(default)]
    pub notification_types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

impl RegisterDevice {
    /// Registration carrying only the device token.
    pub fn new(token: impl Into<String>, platform: Platform) -> Self {
        Self {
            token: token.into(),
            platform,
            lat: None,
            lng: None,
            notification_types: Vec::new(),
            tags: Vec::new(),
            alias: None,
        }
    }
}

/// Input for `PushBots::broadcast`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Broadcast {
    pub platforms: Vec<Platform>,
    pub msg: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

/// Input for `PushBots::send_push_to_device`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePush {
    pub token: String,
    pub platform: Platform,
    pub msg: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

impl DevicePush {
    pub fn new(token: impl Into<String>, platform: Platform, msg: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            platform,
            msg: msg.into(),
            sound: None,
            badge: None,
            payload: None,
        }
    }
}

/// Input for `PushBots::batch`. Every filter is optional; an empty filter
/// set targets every device on `platform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub platform: Platform,
    pub msg: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub except_tags: Vec<String>,
    #[serde(default)]
    pub notification_types: Vec<String>,
    #[serde(default)]
    pub except_notification_types: Vec<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub except_alias: Option<String>,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

impl Batch {
    pub fn new(platform: Platform, msg: impl Into<String>) -> Self {
        Self {
            platform,
            msg: msg.into(),
            sound: None,
            badge: None,
            tags: Vec::new(),
            except_tags: Vec::new(),
            notification_types: Vec::new(),
            except_notification_types: Vec::new(),
            alias: None,
            except_alias: None,
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn platform_codes() {
        assert_eq!(Platform::Ios.code(), "0");
        assert_eq!(Platform::Android.code(), "1");
        assert_eq!("0".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!(Platform::try_from("1").unwrap(), Platform::Android);
    }

    #[test]
    fn platform_rejects_unknown_codes() {
        for code in ["", "2", "ios", " 0"] {
            let err = code.parse::<Platform>().unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)), "{code:?}");
        }
    }

    #[test]
    fn platform_serde_uses_wire_code() {
        assert_eq!(serde_json::to_value(Platform::Ios).unwrap(), json!("0"));
        let parsed: Platform = serde_json::from_value(json!("1")).unwrap();
        assert_eq!(parsed, Platform::Android);
        assert!(serde_json::from_value::<Platform>(json!("3")).is_err());
    }

    #[test]
    fn one_or_many_flattens_to_matching_shape() {
        let one = OneOrMany::One(Platform::Ios);
        let many = OneOrMany::Many(vec![Platform::Ios, Platform::Android]);
        assert_eq!(serde_json::to_value(one).unwrap(), json!("0"));
        assert_eq!(serde_json::to_value(many).unwrap(), json!(["0", "1"]));
    }

    #[test]
    fn empty_request_serializes_to_empty_object() {
        let body = serde_json::to_value(PushRequest::default()).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn zero_badge_count_is_serialized() {
        let req = PushRequest {
            badge_count: Some(0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(req).unwrap(), json!({ "setbadgecount": 0 }));
    }

    #[test]
    fn renamed_fields_use_wire_keys() {
        let req = PushRequest {
            notification_type: Some(OneOrMany::One("news".to_string())),
            except_notification_types: vec!["promo".to_string()],
            except_alias: Some("bob".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({ "active": "news", "except_active": ["promo"], "except_alias": "bob" })
        );
    }

    #[test]
    fn batch_input_defaults_filters() {
        let input: Batch = serde_json::from_value(json!({ "platform": "1", "msg": "hi" })).unwrap();
        assert_eq!(input.platform, Platform::Android);
        assert!(input.tags.is_empty());
        assert!(input.sound.is_none());
    }
}
