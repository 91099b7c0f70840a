use serde_json::{json, Value};

use crate::adapters::queue::QueueAck;
use crate::runtime::contract::{
    decode_envelope, DrainError, DrainResult, MessageEnvelope, QueueMessage,
};
use crate::runtime::ids::guid;

/// The per-message work a drain performs, supplied by each use case
/// (index content, send a notification). Must be idempotent: an
/// unacknowledged message is redelivered and the action runs again.
pub trait MessageAction {
    fn apply(&self, envelope: &MessageEnvelope, message: &QueueMessage) -> Result<(), String>;
}

/// Drains one externally delivered batch with strict per-message isolation.
///
/// A message is acknowledged if and only if its action fully completed; a
/// decode or action failure leaves the message on the queue for the queue's
/// own redelivery, and never aborts the siblings. Acknowledgement is never
/// speculative. No internal retries.
pub fn drain_batch(
    batch: &[QueueMessage],
    action: &impl MessageAction,
    queue: &impl QueueAck,
) -> Vec<DrainResult> {
    let invocation_id = guid();
    log_drain_info(
        "batch_started",
        json!({
            "invocation_id": invocation_id.clone(),
            "batch_size": batch.len(),
        }),
    );

    let results: Vec<DrainResult> = batch
        .iter()
        .map(|message| process_message(message, action, queue))
        .collect();

    let succeeded = results.iter().filter(|result| result.succeeded).count();
    log_drain_info(
        "batch_completed",
        json!({
            "invocation_id": invocation_id,
            "batch_size": batch.len(),
            "succeeded": succeeded,
            "failed": batch.len() - succeeded,
        }),
    );

    results
}

fn process_message(
    message: &QueueMessage,
    action: &impl MessageAction,
    queue: &impl QueueAck,
) -> DrainResult {
    let envelope = match decode_envelope(&message.body) {
        Ok(envelope) => envelope,
        Err(error) => {
            return failed_result(
                message,
                DrainError::MalformedMessage(error.message().to_string()),
            );
        }
    };

    if let Err(error) = action.apply(&envelope, message) {
        return failed_result(message, DrainError::ActionFailed(error));
    }

    if let Err(error) = queue.ack(&message.receipt_handle) {
        return failed_result(message, DrainError::AckFailed(error));
    }

    DrainResult {
        message_id: message.message_id.clone(),
        succeeded: true,
        error: None,
    }
}

fn failed_result(message: &QueueMessage, error: DrainError) -> DrainResult {
    log_drain_error(
        "message_failed",
        json!({
            "message_id": message.message_id.clone(),
            "kind": error.kind(),
            "error": error.message(),
        }),
    );
    DrainResult {
        message_id: message.message_id.clone(),
        succeeded: false,
        error: Some(error),
    }
}

/// Decodes the Lambda SQS trigger event into queue messages. The event shape
/// is the only Lambda-specific thing the drain path touches, so every queue
/// binary shares this one decoder.
pub fn queue_messages_from_sqs_event(event: &Value) -> Result<Vec<QueueMessage>, String> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| "SQS event must include Records array".to_string())?;

    let mut messages = Vec::with_capacity(records.len());
    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .ok_or_else(|| "SQS record messageId must be a string".to_string())?;
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| "SQS record body must be a string".to_string())?;
        let receipt_handle = record
            .get("receiptHandle")
            .and_then(Value::as_str)
            .ok_or_else(|| "SQS record receiptHandle must be a string".to_string())?;

        messages.push(QueueMessage {
            message_id: message_id.to_string(),
            body: body.to_string(),
            receipt_handle: receipt_handle.to_string(),
        });
    }

    Ok(messages)
}

fn log_drain_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "drain_processor",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_drain_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "drain_processor",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
