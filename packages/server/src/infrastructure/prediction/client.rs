//! HTTP client for the external sign-language prediction service.
//!
//! The inference itself (hand landmark extraction, letter classification,
//! sentence building) lives in a separate service; this client only proxies
//! request bodies through with a bounded timeout. It is called from the HTTP
//! layer and never while any room state lock is held.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    /// Network failure or timeout talking to the prediction service.
    #[error("prediction service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    BadStatus(StatusCode),
}

/// Client for the prediction service's JSON API.
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Forward a prediction request body verbatim and return the service's
    /// JSON response.
    pub async fn predict_sign(&self, body: &Value) -> Result<Value, PredictionError> {
        let url = format!("{}/api/predict-sign", self.base_url);
        let response = self.http.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(PredictionError::BadStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Whether the prediction service answers its health endpoint.
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
