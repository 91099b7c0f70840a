use serde_json::json;

/// Outbound notification capability consumed by the mailer handler.
pub trait Notifier {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), String>;
}

/// Transactional mail provider spoken to over its JSON send API.
pub struct HttpNotifier {
    pub api_url: String,
    pub api_key: String,
    pub http_client: reqwest::Client,
}

impl Notifier for HttpNotifier {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), String> {
        let url = self.api_url.clone();
        let api_key = self.api_key.clone();
        let payload = json!({
            "to": recipient,
            "subject": subject,
            "body": body,
        });
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .post(url)
                    .bearer_auth(api_key)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|error| format!("failed to reach mail provider: {error}"))?;
                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(format!(
                        "mail provider rejected notification: status {}",
                        response.status()
                    ))
                }
            })
        })
    }
}
