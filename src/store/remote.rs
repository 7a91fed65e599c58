//! Remote table backend: one row per (collection, device), upsert-by-key.

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::store::{Backend, StoreError};

pub struct RemoteBackend {
    client: Client,
    base_url: String,
    device_id: String,
}

impl RemoteBackend {
    pub fn new(base_url: &str, device_id: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            device_id,
        })
    }

    fn row_url(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, self.device_id)
    }

    fn status_error(&self, collection: &str, status: StatusCode) -> StoreError {
        StoreError::RemoteStatus {
            status: status.as_u16(),
            collection: collection.to_string(),
        }
    }
}

impl Backend for RemoteBackend {
    fn get(&self, collection: &str) -> Result<Option<String>> {
        let response = self.client.get(self.row_url(collection)).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.text()?)),
            status => Err(self.status_error(collection, status).into()),
        }
    }

    fn put(&self, collection: &str, payload: &str) -> Result<()> {
        let response = self
            .client
            .put(self.row_url(collection))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.status_error(collection, status).into())
        }
    }

    fn delete(&self, collection: &str) -> Result<()> {
        let response = self.client.delete(self.row_url(collection)).send()?;
        let status = response.status();
        // Deleting a row that never existed is fine.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(self.status_error(collection, status).into())
        }
    }

    fn label(&self) -> &'static str {
        "remote"
    }
}
