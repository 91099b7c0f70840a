use serde_json::Value;

/// Search-index capability consumed by the indexer handler.
pub trait SearchIndex {
    fn add_document(&self, id: &str, document: &Value) -> Result<(), String>;
    fn remove_document(&self, id: &str) -> Result<(), String>;
}

/// Search service spoken to over its JSON document API.
pub struct HttpSearchIndex {
    pub endpoint: String,
    pub api_key: String,
    pub http_client: reqwest::Client,
}

impl HttpSearchIndex {
    fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{id}", self.endpoint.trim_end_matches('/'))
    }
}

impl SearchIndex for HttpSearchIndex {
    fn add_document(&self, id: &str, document: &Value) -> Result<(), String> {
        let url = self.document_url(id);
        let api_key = self.api_key.clone();
        let body = document.clone();
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .put(url)
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|error| format!("failed to reach search index: {error}"))?;
                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(format!(
                        "search index rejected document: status {}",
                        response.status()
                    ))
                }
            })
        })
    }

    fn remove_document(&self, id: &str) -> Result<(), String> {
        let url = self.document_url(id);
        let api_key = self.api_key.clone();
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .delete(url)
                    .bearer_auth(api_key)
                    .send()
                    .await
                    .map_err(|error| format!("failed to reach search index: {error}"))?;
                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(format!(
                        "search index rejected removal: status {}",
                        response.status()
                    ))
                }
            })
        })
    }
}
