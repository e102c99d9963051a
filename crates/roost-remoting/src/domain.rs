//! Invocation request and response types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MESSAGE_TYPE_HEART: i32 = 1;
pub const MESSAGE_TYPE_SERVICE: i32 = 2;
pub const MESSAGE_TYPE_EXCEPTION: i32 = 3;
pub const MESSAGE_TYPE_SERVICE_EXCEPTION: i32 = 4;

/// Kind of a remoting message, carried as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MessageType {
    Heartbeat,
    Service,
    /// Framework failure while processing a call
    Exception,
    /// Failure raised by the business method
    ServiceException,
    Unknown(i32),
}

impl MessageType {
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, MessageType::Heartbeat)
    }
}

impl From<i32> for MessageType {
    fn from(value: i32) -> Self {
        match value {
            MESSAGE_TYPE_HEART => MessageType::Heartbeat,
            MESSAGE_TYPE_SERVICE => MessageType::Service,
            MESSAGE_TYPE_EXCEPTION => MessageType::Exception,
            MESSAGE_TYPE_SERVICE_EXCEPTION => MessageType::ServiceException,
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for i32 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Heartbeat => MESSAGE_TYPE_HEART,
            MessageType::Service => MESSAGE_TYPE_SERVICE,
            MessageType::Exception => MESSAGE_TYPE_EXCEPTION,
            MessageType::ServiceException => MESSAGE_TYPE_SERVICE_EXCEPTION,
            MessageType::Unknown(other) => other,
        }
    }
}

/// Whether the caller waits for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    #[default]
    Reply,
    NoReply,
}

/// An inbound remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub seq: u64,
    pub message_type: MessageType,
    #[serde(default)]
    pub call_type: CallType,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub method_name: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
    #[serde(default)]
    pub timeout_ms: u64,
    /// Context propagated from the caller
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl InvocationRequest {
    pub fn service(
        seq: u64,
        service_name: impl Into<String>,
        method_name: impl Into<String>,
        parameters: Vec<Value>,
    ) -> Self {
        Self {
            seq,
            message_type: MessageType::Service,
            call_type: CallType::Reply,
            service_name: service_name.into(),
            method_name: method_name.into(),
            parameters,
            timeout_ms: 0,
            context: HashMap::new(),
        }
    }

    pub fn heartbeat(seq: u64) -> Self {
        Self {
            seq,
            message_type: MessageType::Heartbeat,
            call_type: CallType::Reply,
            service_name: String::new(),
            method_name: String::new(),
            parameters: Vec::new(),
            timeout_ms: 0,
            context: HashMap::new(),
        }
    }

    pub fn with_call_type(mut self, call_type: CallType) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Whether a response must be written back to the caller.
    pub fn is_two_way(&self) -> bool {
        self.call_type == CallType::Reply
    }
}

/// The outcome of a remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub seq: u64,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl InvocationResponse {
    fn new(seq: u64, message_type: MessageType) -> Self {
        Self {
            seq,
            message_type,
            result: None,
            exception: None,
            context: HashMap::new(),
        }
    }

    pub fn success(seq: u64, result: Value) -> Self {
        Self {
            result: Some(result),
            ..Self::new(seq, MessageType::Service)
        }
    }

    pub fn service_exception(seq: u64, message: impl Into<String>) -> Self {
        Self {
            exception: Some(message.into()),
            ..Self::new(seq, MessageType::ServiceException)
        }
    }

    pub fn exception(seq: u64, message: impl Into<String>) -> Self {
        Self {
            exception: Some(message.into()),
            ..Self::new(seq, MessageType::Exception)
        }
    }

    pub fn heartbeat(seq: u64) -> Self {
        Self::new(seq, MessageType::Heartbeat)
    }

    pub fn is_exception(&self) -> bool {
        matches!(
            self.message_type,
            MessageType::Exception | MessageType::ServiceException
        )
    }
}
