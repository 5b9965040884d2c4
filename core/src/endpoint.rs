//! Endpoint table: which URL and verb each operation talks to.

use std::collections::HashMap;
use std::fmt;

use crate::http::HttpMethod;

/// Every API operation the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterDevice,
    UnregisterDevice,
    Alias,
    TagDevice,
    UnTagDevice,
    Geo,
    AddNotificationType,
    RemoveNotificationType,
    Broadcast,
    PushOne,
    Batch,
    Badge,
    RecordAnalytics,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::RegisterDevice,
        Operation::UnregisterDevice,
        Operation::Alias,
        Operation::TagDevice,
        Operation::UnTagDevice,
        Operation::Geo,
        Operation::AddNotificationType,
        Operation::RemoveNotificationType,
        Operation::Broadcast,
        Operation::PushOne,
        Operation::Batch,
        Operation::Badge,
        Operation::RecordAnalytics,
    ];

    /// Path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::RegisterDevice => "deviceToken",
            Operation::UnregisterDevice => "deviceToken/del",
            Operation::Alias => "alias",
            Operation::TagDevice => "tag",
            Operation::UnTagDevice => "tag/del",
            Operation::Geo => "geo",
            Operation::AddNotificationType => "activate",
            Operation::RemoveNotificationType => "deactivate",
            Operation::Broadcast | Operation::Batch => "push/all",
            // Single-device pushes have their own endpoint; they are not
            // routed through `push/all`.
            Operation::PushOne => "push/one",
            Operation::Badge => "badge",
            Operation::RecordAnalytics => "stats",
        }
    }

    /// Pushes are POSTed; device mutations are PUT.
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Broadcast | Operation::PushOne | Operation::Batch => HttpMethod::Post,
            _ => HttpMethod::Put,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Resolved URL and verb for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub url: String,
    pub method: HttpMethod,
}

/// All endpoints resolved against one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    endpoints: HashMap<Operation, EndpointDescriptor>,
}

impl EndpointTable {
    /// `base_url` must not end with `/`.
    pub fn new(base_url: &str) -> Self {
        let endpoints = Operation::ALL
            .iter()
            .map(|&op| {
                let descriptor = EndpointDescriptor {
                    url: format!("{base_url}/{}", op.path()),
                    method: op.method(),
                };
                (op, descriptor)
            })
            .collect();
        Self { endpoints }
    }

    pub fn get(&self, op: Operation) -> Option<&EndpointDescriptor> {
        self.endpoints.get(&op)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
