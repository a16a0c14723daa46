//! Incoming message envelopes.
//!
//! The upstream pipeline writes one JSON message per line on standard
//! input. Only the envelope is interpreted here; record and schema payloads
//! pass through as opaque JSON for the loader to deal with.

use serde::Deserialize;
use serde_json::Value;

/// A single message from the upstream pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Stream schema announcement.
    #[serde(rename = "SCHEMA")]
    Schema { stream: String, schema: Value },

    /// A data record destined for a stream.
    #[serde(rename = "RECORD")]
    Record { stream: String, record: Value },

    /// Progress snapshot to acknowledge once preceding work is durable.
    #[serde(rename = "STATE")]
    State { value: Value },
}

impl Message {
    /// Parse a single input line.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
