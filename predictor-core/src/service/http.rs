use async_trait::async_trait;
use reqwest::{Client, header};

use crate::{FormState, PredictError, model::PredictResponse};

use super::{PredictionService, interpret_response};

/// Talks to the prediction endpoint over HTTP. One POST per call, no retries,
/// no client-side timeout.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    endpoint: String,
    http: Client,
}

impl HttpPredictionService {
    pub fn new(endpoint: String) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: String, http: Client) -> Self {
        Self { endpoint, http }
    }

    async fn post_form(&self, form: &FormState) -> Result<PredictResponse, PredictError> {
        let res = self
            .http
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(form)
            .send()
            .await?;

        // The body decides the outcome, whatever the status says.
        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%status, bytes = body.len(), "prediction response received");
        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "prediction endpoint returned an error status");
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, form: &FormState) -> Result<f64, PredictError> {
        tracing::debug!(endpoint = %self.endpoint, "submitting prediction request");

        let result = self.post_form(form).await.and_then(interpret_response);

        if let Err(PredictError::Transport(detail)) = &result {
            tracing::warn!(endpoint = %self.endpoint, %detail, "prediction request failed");
        }
        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
