//! HTTP implementation of the HistoryRemote trait.
//!
//! Talks to a REST service exposing a single collection:
//!
//! | Operation   | Request                | Success response        |
//! |-------------|------------------------|-------------------------|
//! | fetch all   | `GET {base}/history`   | `[{expression, result}]`|
//! | append one  | `POST {base}/history`  | the stored item         |
//! | clear all   | `DELETE {base}/history`| no content              |

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::item::HistoryItem;
use crate::remote::HistoryRemote;

const HISTORY_PATH: &str = "history";

/// REST client for the remote history store.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    endpoint: Url,
}

impl HttpRemote {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| SyncError::InvalidConfig(format!("base url {:?}: {}", config.base_url, e)))?;

        // Without a trailing slash `join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(HISTORY_PATH)
            .map_err(|e| SyncError::InvalidConfig(e.to_string()))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SyncError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// The resolved history collection URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Turn a non-2xx response into an error.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::Status {
            code: status.as_u16(),
        })
    }
}

#[async_trait]
impl HistoryRemote for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<HistoryItem>> {
        let response = check(self.client.get(self.endpoint.clone()).send().await?)?;
        let items: Vec<HistoryItem> = response.json().await?;
        tracing::debug!(count = items.len(), "fetched remote history");
        Ok(items)
    }

    async fn append(&self, item: &HistoryItem) -> Result<HistoryItem> {
        let response = check(
            self.client
                .post(self.endpoint.clone())
                .json(item)
                .send()
                .await?,
        )?;
        Ok(response.json().await?)
    }

    async fn clear_all(&self) -> Result<()> {
        check(self.client.delete(self.endpoint.clone()).send().await?)?;
        Ok(())
    }
}
