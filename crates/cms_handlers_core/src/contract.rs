use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque content record. Handlers only interpret the fields named by a
/// filter, projection, or sort key; everything else passes through untouched.
pub type Record = BTreeMap<String, Value>;

/// Equality filter on a single record field. The CMS handlers never filter on
/// anything richer than `field == value` (e.g. `status == "published"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanFilter {
    pub field: String,
    pub equals: Value,
}

/// One full-table scan request: filter, projected fields, and the per-page
/// record limit imposed by the backing store. Constructed once per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSpec {
    pub filter: Option<ScanFilter>,
    pub projection: Vec<String>,
    pub page_limit: Option<i32>,
}

/// One page of scan results. `next_token` is the backing store's opaque
/// continuation cursor; `None` means the scan is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage {
    pub records: Vec<Record>,
    pub next_token: Option<String>,
}

/// The backing store could not serve a page. A scan never returns partial
/// results: the whole accumulator is discarded and this error surfaces to
/// the caller, whose environment owns retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUnavailable {
    message: String,
}

impl BackendUnavailable {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for BackendUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backend unavailable: {}", self.message)
    }
}

impl std::error::Error for BackendUnavailable {}

/// A message as delivered by the external queue. The queue owns the message
/// until `receipt_handle` is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub body: String,
    pub receipt_handle: String,
}

/// A document to add to the search index, keyed by content id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub document: Value,
}

/// Decoded queue message body. The `action` tag selects the handler-side
/// behavior; the payload shape is fixed per action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MessageEnvelope {
    Index {
        #[serde(default)]
        add: Vec<IndexEntry>,
        #[serde(default)]
        remove_ids: Vec<String>,
    },
    Notify {
        recipient: String,
        subject: String,
        body: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeError {
    message: String,
}

impl EnvelopeError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EnvelopeError {}

pub fn decode_envelope(body: &str) -> Result<MessageEnvelope, EnvelopeError> {
    serde_json::from_str(body).map_err(|error| EnvelopeError {
        message: format!("malformed message body: {error}"),
    })
}

/// Why a drained message was left on the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainError {
    MalformedMessage(String),
    ActionFailed(String),
    AckFailed(String),
}

impl DrainError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedMessage(_) => "malformed_message",
            Self::ActionFailed(_) => "action_failed",
            Self::AckFailed(_) => "ack_failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MalformedMessage(message)
            | Self::ActionFailed(message)
            | Self::AckFailed(message) => message,
        }
    }
}

impl std::fmt::Display for DrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for DrainError {}

/// Per-message outcome of one batch drain. Transient: lives only for the
/// duration of the invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainResult {
    pub message_id: String,
    pub succeeded: bool,
    pub error: Option<DrainError>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_index_envelope_with_defaults() {
        let envelope = decode_envelope(r#"{"action":"index","remove_ids":["a","b"]}"#)
            .expect("index envelope should decode");

        assert_eq!(
            envelope,
            MessageEnvelope::Index {
                add: Vec::new(),
                remove_ids: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn decodes_notify_envelope() {
        let envelope = decode_envelope(
            r#"{"action":"notify","recipient":"editor@example.com","subject":"s","body":"b"}"#,
        )
        .expect("notify envelope should decode");

        assert_eq!(
            envelope,
            MessageEnvelope::Notify {
                recipient: "editor@example.com".to_string(),
                subject: "s".to_string(),
                body: "b".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unknown_action() {
        let error = decode_envelope(r#"{"action":"transcode","payload":{}}"#)
            .expect_err("unknown action should fail");
        assert!(error.message().contains("malformed message body"));
    }

    #[test]
    fn rejects_non_json_body() {
        let error = decode_envelope("not json at all").expect_err("non-json body should fail");
        assert!(error.message().contains("malformed message body"));
    }

    #[test]
    fn index_entry_round_trips_document_payload() {
        let entry = IndexEntry {
            id: "post-1".to_string(),
            document: json!({"title": "Hello", "tags": ["a", "b"]}),
        };

        let body = serde_json::to_string(&MessageEnvelope::Index {
            add: vec![entry.clone()],
            remove_ids: Vec::new(),
        })
        .expect("envelope should serialize");

        let decoded = decode_envelope(&body).expect("envelope should decode");
        let MessageEnvelope::Index { add, .. } = decoded else {
            panic!("expected index envelope");
        };
        assert_eq!(add, vec![entry]);
    }
}
