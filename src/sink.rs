use std::time::Duration;

use tracing::info;

use crate::record::NormalizedRecord;
use crate::settings::Settings;

/// Upload failure. Every variant hands the unsent batch back so the caller
/// decides what to do with it; nothing is retried here.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("sink rejected {} records: HTTP {status}: {body}", .batch.len())]
    Rejected {
        status: u16,
        body: String,
        batch: Vec<NormalizedRecord>,
    },

    #[error("upload of {} records failed: {source}", .batch.len())]
    Transport {
        source: reqwest::Error,
        batch: Vec<NormalizedRecord>,
    },
}

impl UploadError {
    pub fn batch(&self) -> &[NormalizedRecord] {
        match self {
            UploadError::Rejected { batch, .. } | UploadError::Transport { batch, .. } => batch,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Rejected { status, .. } => Some(*status),
            UploadError::Transport { .. } => None,
        }
    }
}

/// Supabase REST sink for the snapshots table.
pub struct SupabaseSink {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    timeout: Duration,
}

impl SupabaseSink {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: settings.sink_endpoint(),
            key: settings.supabase_key.clone(),
            timeout: settings.upload_timeout(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the whole batch as one JSON array. Only 200 and 201 count as
    /// success. Returns the number of records sent.
    pub async fn upload(&self, batch: Vec<NormalizedRecord>) -> Result<usize, UploadError> {
        if batch.is_empty() {
            return Ok(0);
        }

        info!(endpoint = %self.endpoint, records = batch.len(), "Uploading batch");
        let sent = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(&batch)
            .send()
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(source) => return Err(UploadError::Transport { source, batch }),
        };

        let status = resp.status().as_u16();
        if status != 200 && status != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, body, batch });
        }

        info!(records = batch.len(), status, "Batch uploaded");
        Ok(batch.len())
    }
}
