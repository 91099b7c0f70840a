use serde_json::{json, Value};

use crate::adapters::search::SearchIndex;
use crate::handlers::drain::MessageAction;
use crate::runtime::contract::{MessageEnvelope, QueueMessage};

/// Applies one index envelope: add every carried document, then remove every
/// listed id. A failed sub-operation is logged and does not stop the
/// remaining sub-operations of the same message; if any sub-operation
/// failed, the whole action reports failure so the message is redelivered.
/// Sub-operations are upserts/deletes against the index, so replaying the
/// ones that already succeeded is harmless.
pub struct IndexContentAction<'a, S: SearchIndex> {
    pub index: &'a S,
}

impl<S: SearchIndex> MessageAction for IndexContentAction<'_, S> {
    fn apply(&self, envelope: &MessageEnvelope, message: &QueueMessage) -> Result<(), String> {
        let MessageEnvelope::Index { add, remove_ids } = envelope else {
            return Err("indexer received a non-index envelope".to_string());
        };

        let total_operations = add.len() + remove_ids.len();
        let mut failures = Vec::new();

        for entry in add {
            if let Err(error) = self.index.add_document(&entry.id, &entry.document) {
                log_indexer_error(
                    "add_document_failed",
                    json!({
                        "message_id": message.message_id.clone(),
                        "content_id": entry.id.clone(),
                        "error": error.clone(),
                    }),
                );
                failures.push(error);
            }
        }

        for id in remove_ids {
            if let Err(error) = self.index.remove_document(id) {
                log_indexer_error(
                    "remove_document_failed",
                    json!({
                        "message_id": message.message_id.clone(),
                        "content_id": id.clone(),
                        "error": error.clone(),
                    }),
                );
                failures.push(error);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "{} of {total_operations} index operations failed: {}",
                failures.len(),
                failures.join("; ")
            ))
        }
    }
}

fn log_indexer_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "indexer_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::runtime::contract::IndexEntry;

    use super::*;

    struct RecordingIndex {
        failing_ids: Vec<String>,
        operations: Mutex<Vec<String>>,
    }

    impl RecordingIndex {
        fn new(failing_ids: &[&str]) -> Self {
            Self {
                failing_ids: failing_ids.iter().map(|id| id.to_string()).collect(),
                operations: Mutex::new(Vec::new()),
            }
        }

        fn operations(&self) -> Vec<String> {
            self.operations.lock().expect("poisoned mutex").clone()
        }

        fn attempt(&self, operation: String, id: &str) -> Result<(), String> {
            self.operations.lock().expect("poisoned mutex").push(operation);
            if self.failing_ids.iter().any(|failing| failing == id) {
                return Err(format!("index rejected {id}"));
            }
            Ok(())
        }
    }

    impl SearchIndex for RecordingIndex {
        fn add_document(&self, id: &str, _document: &Value) -> Result<(), String> {
            self.attempt(format!("add:{id}"), id)
        }

        fn remove_document(&self, id: &str) -> Result<(), String> {
            self.attempt(format!("remove:{id}"), id)
        }
    }

    fn index_envelope(add_ids: &[&str], remove_ids: &[&str]) -> MessageEnvelope {
        MessageEnvelope::Index {
            add: add_ids
                .iter()
                .map(|id| IndexEntry {
                    id: id.to_string(),
                    document: json!({"id": id, "title": format!("title for {id}")}),
                })
                .collect(),
            remove_ids: remove_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn message() -> QueueMessage {
        QueueMessage {
            message_id: "m1".to_string(),
            body: String::new(),
            receipt_handle: "rh-1".to_string(),
        }
    }

    #[test]
    fn applies_adds_then_removes() {
        let index = RecordingIndex::new(&[]);
        let action = IndexContentAction { index: &index };

        action
            .apply(&index_envelope(&["a", "b"], &["c"]), &message())
            .expect("action should succeed");

        assert_eq!(index.operations(), vec!["add:a", "add:b", "remove:c"]);
    }

    #[test]
    fn sub_operation_failure_does_not_stop_remaining_sub_operations() {
        let index = RecordingIndex::new(&["b"]);
        let action = IndexContentAction { index: &index };

        let error = action
            .apply(&index_envelope(&["a", "b", "c"], &["d"]), &message())
            .expect_err("action should report the sub-operation failure");

        assert_eq!(
            index.operations(),
            vec!["add:a", "add:b", "add:c", "remove:d"]
        );
        assert!(error.contains("1 of 4 index operations failed"));
        assert!(error.contains("index rejected b"));
    }

    #[test]
    fn rejects_notify_envelope() {
        let index = RecordingIndex::new(&[]);
        let action = IndexContentAction { index: &index };
        let envelope = MessageEnvelope::Notify {
            recipient: "a@b.c".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };

        let error = action
            .apply(&envelope, &message())
            .expect_err("notify envelope should be rejected");
        assert!(error.contains("non-index envelope"));
        assert!(index.operations().is_empty());
    }
}
