//! Argument validation and payload construction, one function per operation.
//!
//! Every function here is pure: it either rejects its input with
//! `ApiError::InvalidArgument` or returns the `PushRequest` to send. Nothing
//! touches the network, so a validation failure never produces a request.

use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::types::{Batch, Broadcast, DevicePush, OneOrMany, Platform, PushRequest, RegisterDevice};

/// Sound iOS plays when none is given. Android has no equivalent.
pub const DEFAULT_IOS_SOUND: &str = "default";
pub const DEFAULT_BADGE: &str = "0";

pub fn register_device(input: &RegisterDevice) -> Result<PushRequest> {
    let token = require_token(&input.token)?;
    let notification_type = if input.notification_types.is_empty() {
        None
    } else {
        Some(OneOrMany::Many(input.notification_types.clone()))
    };
    Ok(PushRequest {
        token: Some(token),
        platform: Some(OneOrMany::One(input.platform)),
        lat: non_empty(input.lat.as_deref()),
        lng: non_empty(input.lng.as_deref()),
        tags: input.tags.clone(),
        alias: non_empty(input.alias.as_deref()),
        notification_type,
        ..Default::default()
    })
}

pub fn unregister_device(token: &str, platform: Platform) -> Result<PushRequest> {
    device(token, platform)
}

pub fn set_alias(token: &str, platform: Platform, alias: &str) -> Result<PushRequest> {
    let mut req = device(token, platform)?;
    req.alias = Some(require(alias, "alias must not be empty")?);
    Ok(req)
}

/// Shared by tagging and untagging.
pub fn tag(token: Option<&str>, platform: Platform, alias: Option<&str>, tag: &str) -> Result<PushRequest> {
    let mut req = device_or_alias(token, platform, alias)?;
    req.tag = non_empty(Some(tag));
    Ok(req)
}

pub fn geo(token: &str, platform: Platform, lat: &str, lng: &str) -> Result<PushRequest> {
    let mut req = device(token, platform)?;
    if lat.is_empty() || lng.is_empty() {
        return Err(ApiError::invalid("latitude and longitude must both be set"));
    }
    req.lat = Some(lat.to_string());
    req.lng = Some(lng.to_string());
    Ok(req)
}

/// Shared by activating and deactivating a notification type.
pub fn notification_type(
    token: Option<&str>,
    platform: Platform,
    alias: Option<&str>,
    notification_type: &str,
) -> Result<PushRequest> {
    let mut req = device_or_alias(token, platform, alias)?;
    let notification_type = require(notification_type, "no notification type specified")?;
    req.notification_type = Some(OneOrMany::One(notification_type));
    Ok(req)
}

pub fn broadcast(input: &Broadcast) -> Result<PushRequest> {
    if input.platforms.is_empty() {
        return Err(ApiError::invalid(
            "either iOS or Android must be specified as platforms",
        ));
    }
    let ios_only = input.platforms.iter().all(|&p| p == Platform::Ios);
    let msg = require(&input.msg, "message not specified")?;
    let sound = resolve_sound(input.sound.as_deref(), ios_only)?;
    Ok(PushRequest {
        platform: Some(OneOrMany::Many(input.platforms.clone())),
        msg: Some(msg),
        badge: Some(resolve_badge(input.badge.as_deref())),
        sound: Some(sound),
        payload: non_empty_payload(input.payload.as_ref()),
        ..Default::default()
    })
}

pub fn device_push(input: &DevicePush) -> Result<PushRequest> {
    let mut req = device(&input.token, input.platform)?;
    let sound = resolve_sound(input.sound.as_deref(), input.platform == Platform::Ios)?;
    req.msg = Some(require(&input.msg, "message not specified")?);
    req.sound = Some(sound);
    req.badge = Some(resolve_badge(input.badge.as_deref()));
    req.payload = non_empty_payload(input.payload.as_ref());
    Ok(req)
}

pub fn batch(input: &Batch) -> Result<PushRequest> {
    let msg = require(&input.msg, "message not specified")?;
    let sound = resolve_sound(input.sound.as_deref(), input.platform == Platform::Ios)?;
    let notification_type = if input.notification_types.is_empty() {
        None
    } else {
        Some(OneOrMany::Many(input.notification_types.clone()))
    };
    Ok(PushRequest {
        payload: non_empty_payload(input.payload.as_ref()),
        alias: non_empty(input.alias.as_deref()),
        except_alias: non_empty(input.except_alias.as_deref()),
        platform: Some(OneOrMany::One(input.platform)),
        msg: Some(msg),
        sound: Some(sound),
        badge: Some(resolve_badge(input.badge.as_deref())),
        tags: input.tags.clone(),
        except_tags: input.except_tags.clone(),
        notification_type,
        except_notification_types: input.except_notification_types.clone(),
        ..Default::default()
    })
}

/// `count` is always sent, zero included.
pub fn badge(token: &str, platform: Platform, count: i64) -> Result<PushRequest> {
    let mut req = device(token, platform)?;
    req.badge_count = Some(count);
    Ok(req)
}

pub fn record_analytics(token: &str, platform: Platform, stats: &str) -> Result<PushRequest> {
    let mut req = device(token, platform)?;
    req.stats = non_empty(Some(stats));
    Ok(req)
}

fn device(token: &str, platform: Platform) -> Result<PushRequest> {
    Ok(PushRequest {
        token: Some(require_token(token)?),
        platform: Some(OneOrMany::One(platform)),
        ..Default::default()
    })
}

fn device_or_alias(token: Option<&str>, platform: Platform, alias: Option<&str>) -> Result<PushRequest> {
    let token = non_empty(token);
    let alias = non_empty(alias);
    if token.is_none() && alias.is_none() {
        return Err(ApiError::invalid("either token or alias must be set"));
    }
    Ok(PushRequest {
        token,
        alias,
        platform: Some(OneOrMany::One(platform)),
        ..Default::default()
    })
}

fn require_token(token: &str) -> Result<String> {
    require(token, "token must be a non-empty device token")
}

fn require(value: &str, message: &str) -> Result<String> {
    if value.is_empty() {
        Err(ApiError::invalid(message))
    } else {
        Ok(value.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn non_empty_payload(payload: Option<&Map<String, Value>>) -> Option<Map<String, Value>> {
    payload.filter(|p| !p.is_empty()).cloned()
}

fn resolve_sound(sound: Option<&str>, ios_only: bool) -> Result<String> {
    match non_empty(sound) {
        Some(sound) => Ok(sound),
        None if ios_only => Ok(DEFAULT_IOS_SOUND.to_string()),
        None => Err(ApiError::invalid("no sound specified")),
    }
}

fn resolve_badge(badge: Option<&str>) -> String {
    non_empty(badge).unwrap_or_else(|| DEFAULT_BADGE.to_string())
}
