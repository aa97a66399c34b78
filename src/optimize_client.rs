use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::errors::KilnError;

/// Which al-ULS routine the service should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeMethod {
    Auto,
    Kfp,
    Stability,
    Entropy,
    Rank,
    Sparsity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeRequest {
    pub matrix: Vec<Vec<f64>>,
    pub method: OptimizeMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_entropy: Option<f64>,
}

/// Blocking client for the al-ULS optimization service. One request per
/// call, no retries.
pub struct AlUlsClient {
    base: String,
    http: Client,
}

impl AlUlsClient {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, KilnError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kiln/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KilnError::Http(e.to_string()))?;
        Ok(Self {
            base: format!("http://{host}:{port}"),
            http,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/optimize", self.base)
    }

    pub fn optimize(&self, req: &OptimizeRequest) -> Result<serde_json::Value, KilnError> {
        let url = self.endpoint();
        tracing::debug!(%url, method = ?req.method, rows = req.matrix.len(), "sending optimize request");
        let resp = self
            .http
            .post(&url)
            .json(req)
            .send()
            .map_err(|e| KilnError::Http(format!("{url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(KilnError::Http(format!("{url} returned {status}: {}", body.trim())));
        }
        resp.json::<serde_json::Value>()
            .map_err(|e| KilnError::Http(format!("{url}: invalid JSON response: {e}")))
    }
}
