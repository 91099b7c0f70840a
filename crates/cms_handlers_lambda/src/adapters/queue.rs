/// Irreversible queue acknowledgement. Removing a message signals that its
/// action fully completed; an unacknowledged message is redelivered by the
/// queue after its visibility timeout.
pub trait QueueAck {
    fn ack(&self, receipt_handle: &str) -> Result<(), String>;
}

pub struct SqsQueueAck {
    pub queue_url: String,
    pub sqs_client: aws_sdk_sqs::Client,
}

impl QueueAck for SqsQueueAck {
    fn ack(&self, receipt_handle: &str) -> Result<(), String> {
        let queue_url = self.queue_url.clone();
        let handle = receipt_handle.to_string();
        let client = self.sqs_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_message()
                    .queue_url(queue_url)
                    .receipt_handle(handle)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to delete queue message: {error}"))
            })
        })
    }
}
