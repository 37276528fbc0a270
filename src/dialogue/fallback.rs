//! Source composition: try the primary, fall back on any error

use super::{DialogueSource, DialogueStep};
use crate::backend::{BackendError, NodeId};
use async_trait::async_trait;

/// Serves steps from `primary`, substituting `fallback` whenever the
/// primary errors. The substitution is logged and otherwise invisible.
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F>
where
    P: DialogueSource,
    F: DialogueSource,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P, F> DialogueSource for WithFallback<P, F>
where
    P: DialogueSource,
    F: DialogueSource,
{
    async fn start(&self) -> Result<DialogueStep, BackendError> {
        match self.primary.start().await {
            Ok(step) => Ok(step),
            Err(e) => {
                tracing::info!(kind = e.kind.as_str(), error = %e, "Dialogue start unavailable, using scripted greeting");
                self.fallback.start().await
            }
        }
    }

    async fn node(&self, id: NodeId) -> Result<DialogueStep, BackendError> {
        match self.primary.node(id).await {
            Ok(step) => Ok(step),
            Err(e) => {
                tracing::info!(node_id = id, kind = e.kind.as_str(), error = %e, "Dialogue node unavailable");
                self.fallback.node(id).await
            }
        }
    }
}
