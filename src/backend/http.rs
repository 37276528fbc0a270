//! HTTP implementation of the assistant backend

use super::types::*;
use super::{AssistantBackend, BackendError};
use crate::dialogue::{DialogueSource, DialogueStep};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// Assistant backend reached over HTTP
///
/// No request timeout is configured; calls wait as long as the network
/// stack does.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let start = Instant::now();
        let result = self.client.get(self.url(path)).send().await;
        let parsed = Self::decode(path, result).await;
        log_outcome("GET", path, start, parsed.as_ref().err());
        parsed
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let result = self.client.post(self.url(path)).json(body).send().await;
        let parsed = Self::decode(path, result).await;
        log_outcome("POST", path, start, parsed.as_ref().err());
        parsed
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        result: reqwest::Result<Response>,
    ) -> Result<T, BackendError> {
        let response = result.map_err(|e| {
            if e.is_timeout() {
                BackendError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                BackendError::network(format!("Connection failed: {e}"))
            } else {
                BackendError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BackendError::status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| BackendError::decode(format!("{path}: {e}")))
    }
}

fn log_outcome(method: &str, path: &str, start: Instant, error: Option<&BackendError>) {
    let duration_ms = start.elapsed().as_millis();
    match error {
        None => tracing::debug!(method, path, duration_ms = %duration_ms, "Assistant request completed"),
        Some(e) => tracing::warn!(
            method,
            path,
            duration_ms = %duration_ms,
            kind = e.kind.as_str(),
            error = %e.message,
            "Assistant request failed"
        ),
    }
}

#[async_trait]
impl DialogueSource for HttpBackend {
    async fn start(&self) -> Result<DialogueStep, BackendError> {
        let envelope: NodeEnvelope = self.get_json("/assistant/start").await?;
        DialogueStep::from_envelope(envelope)
    }

    async fn node(&self, id: NodeId) -> Result<DialogueStep, BackendError> {
        let envelope: NodeEnvelope = self.get_json(&format!("/assistant/node/{id}")).await?;
        DialogueStep::from_envelope(envelope)
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn log_interaction(&self, entry: &InteractionLog) -> Result<(), BackendError> {
        // The acknowledgement body carries nothing we use
        let _: serde_json::Value = self.post_json("/assistant/log", entry).await?;
        Ok(())
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError> {
        self.post_json("/assistant/query", request).await
    }

    async fn plans(&self) -> Result<PlanList, BackendError> {
        self.get_json("/assistant/plans").await
    }

    async fn testimonials(&self) -> Result<TestimonialList, BackendError> {
        self.get_json("/assistant/testimonials").await
    }

    async fn info(&self) -> Result<ProgramInfo, BackendError> {
        self.get_json("/assistant/info").await
    }

    async fn contact(&self) -> Result<ContactDetails, BackendError> {
        self.get_json("/assistant/contact").await
    }

    async fn config(&self) -> Result<WidgetConfig, BackendError> {
        self.get_json("/assistant/config").await
    }
}
