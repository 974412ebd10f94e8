use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name carried by the channel transport.
pub const RUN_ACTION_EVENT: &str = "run-action";

/// Endpoint path for the HTTP transport, resolved against the configured
/// base URL.
pub const RUN_ACTION_PATH: &str = "runAction";

/// Body of the HTTP transport's POST request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub query: String,
}

/// Payload of the channel transport's `run-action` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunActionPayload {
    pub data: String,
}

/// One event emitted over the persistent message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEnvelope {
    pub event: String,
    pub payload: Value,
}
