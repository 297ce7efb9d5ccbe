use crate::models::ProductRecord;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Body posted to the backend after each run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendPayload<'a> {
    pub parent_url: &'a str,
    pub watch_data: &'a [ProductRecord],
}

/// Writes results to disk and optionally pushes them to a backend
pub struct Sink {
    client: Client,
    output_path: PathBuf,
    backend_url: Option<String>,
}

impl Sink {
    pub fn new(client: Client, output_path: PathBuf, backend_url: Option<String>) -> Self {
        Self {
            client,
            output_path,
            backend_url,
        }
    }

    pub async fn write_json(&self, records: &[ProductRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.output_path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.output_path.display()))?;

        info!(
            "💾 Watch data saved to {} ({} watches)",
            self.output_path.display(),
            records.len()
        );
        Ok(())
    }

    /// POST the results if a backend is configured. Returns whether a post succeeded;
    /// failures are logged, never raised.
    pub async fn post(&self, parent_url: &str, records: &[ProductRecord]) -> bool {
        let Some(backend_url) = &self.backend_url else {
            return false;
        };

        let payload = BackendPayload {
            parent_url,
            watch_data: records,
        };

        let result = self
            .client
            .post(backend_url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                info!("✓ Watch data posted successfully to backend");
                true
            }
            Err(e) => {
                warn!("⚠ Failed to post to backend: {}", e);
                false
            }
        }
    }

    pub async fn deliver(&self, parent_url: &str, records: &[ProductRecord]) -> Result<()> {
        self.write_json(records).await?;
        self.post(parent_url, records).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchData.json");
        let sink = Sink::new(Client::new(), path.clone(), None);

        let record = ProductRecord::blank("https://shop.test/products/a", "CHF", "Switzerland");
        sink.deliver("https://shop.test/collections/all", &[record.clone()])
            .await
            .unwrap();

        let written: Vec<ProductRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec![record]);
    }

    #[tokio::test]
    async fn unreachable_backend_still_writes_file() {
        // Bind then drop a listener so the port is known to be closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchData.json");
        let sink = Sink::new(
            Client::new(),
            path.clone(),
            Some(format!("http://127.0.0.1:{}/watches", port)),
        );

        let records = vec![ProductRecord::blank("https://shop.test/products/a", "CHF", "Switzerland")];
        assert!(sink.deliver("https://shop.test/collections/all", &records).await.is_ok());

        let written: Vec<ProductRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, records);
        assert!(!sink.post("https://shop.test/collections/all", &records).await);
    }

    #[tokio::test]
    async fn no_backend_means_no_post() {
        let sink = Sink::new(Client::new(), PathBuf::from("unused.json"), None);
        assert!(!sink.post("https://shop.test", &[]).await);
    }

    #[test]
    fn payload_shape() {
        let records = vec![ProductRecord::blank("u", "CHF", "Switzerland")];
        let payload = BackendPayload {
            parent_url: "https://shop.test/collections/all",
            watch_data: &records,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["parentUrl"], "https://shop.test/collections/all");
        assert_eq!(json["watchData"].as_array().unwrap().len(), 1);
    }
}
