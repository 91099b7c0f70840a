use crate::adapters::notify::Notifier;
use crate::handlers::drain::MessageAction;
use crate::runtime::contract::{MessageEnvelope, QueueMessage};

/// Applies one notify envelope: a single send through the notifier. Delivery
/// failures surface as action failures so the message is redelivered.
pub struct SendNotificationAction<'a, N: Notifier> {
    pub notifier: &'a N,
}

impl<N: Notifier> MessageAction for SendNotificationAction<'_, N> {
    fn apply(&self, envelope: &MessageEnvelope, _message: &QueueMessage) -> Result<(), String> {
        let MessageEnvelope::Notify {
            recipient,
            subject,
            body,
        } = envelope
        else {
            return Err("mailer received a non-notify envelope".to_string());
        };

        self.notifier.send(recipient, subject, body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingNotifier {
        fail: bool,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().expect("poisoned mutex").clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), String> {
            if self.fail {
                return Err("mail provider timed out".to_string());
            }
            self.sent.lock().expect("poisoned mutex").push((
                recipient.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    fn message() -> QueueMessage {
        QueueMessage {
            message_id: "m1".to_string(),
            body: String::new(),
            receipt_handle: "rh-1".to_string(),
        }
    }

    fn notify_envelope() -> MessageEnvelope {
        MessageEnvelope::Notify {
            recipient: "editor@example.com".to_string(),
            subject: "content published".to_string(),
            body: "your draft went live".to_string(),
        }
    }

    #[test]
    fn sends_one_notification_per_envelope() {
        let notifier = RecordingNotifier::new(false);
        let action = SendNotificationAction {
            notifier: &notifier,
        };

        action
            .apply(&notify_envelope(), &message())
            .expect("send should succeed");

        assert_eq!(
            notifier.sent(),
            vec![(
                "editor@example.com".to_string(),
                "content published".to_string(),
                "your draft went live".to_string(),
            )]
        );
    }

    #[test]
    fn delivery_failure_surfaces_as_action_failure() {
        let notifier = RecordingNotifier::new(true);
        let action = SendNotificationAction {
            notifier: &notifier,
        };

        let error = action
            .apply(&notify_envelope(), &message())
            .expect_err("send should fail");
        assert!(error.contains("timed out"));
    }

    #[test]
    fn rejects_index_envelope() {
        let notifier = RecordingNotifier::new(false);
        let action = SendNotificationAction {
            notifier: &notifier,
        };
        let envelope = MessageEnvelope::Index {
            add: Vec::new(),
            remove_ids: vec!["a".to_string()],
        };

        let error = action
            .apply(&envelope, &message())
            .expect_err("index envelope should be rejected");
        assert!(error.contains("non-notify envelope"));
        assert!(notifier.sent().is_empty());
    }
}
