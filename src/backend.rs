//! Assistant backend abstraction
//!
//! The widget talks to the remote assistant service through the
//! [`AssistantBackend`] trait so the driver can be exercised against
//! mocks in tests and against the real HTTP service in production.

mod error;
mod http;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use types::*;

use crate::dialogue::DialogueSource;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote assistant service
///
/// The dialogue graph endpoints come from the [`DialogueSource`]
/// supertrait; everything else the widget fetches lives here.
#[async_trait]
pub trait AssistantBackend: DialogueSource {
    /// Record an option click. Callers treat failures as diagnostic only.
    async fn log_interaction(&self, entry: &InteractionLog) -> Result<(), BackendError>;

    /// Send free text to the assistant
    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError>;

    /// Active investment plans
    async fn plans(&self) -> Result<PlanList, BackendError>;

    /// Success stories
    async fn testimonials(&self) -> Result<TestimonialList, BackendError>;

    /// Program description
    async fn info(&self) -> Result<ProgramInfo, BackendError>;

    /// Admin contact details
    async fn contact(&self) -> Result<ContactDetails, BackendError>;

    /// Widget configuration gate
    async fn config(&self) -> Result<WidgetConfig, BackendError>;
}

#[async_trait]
impl<T: AssistantBackend + ?Sized> AssistantBackend for Arc<T> {
    async fn log_interaction(&self, entry: &InteractionLog) -> Result<(), BackendError> {
        (**self).log_interaction(entry).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError> {
        (**self).query(request).await
    }

    async fn plans(&self) -> Result<PlanList, BackendError> {
        (**self).plans().await
    }

    async fn testimonials(&self) -> Result<TestimonialList, BackendError> {
        (**self).testimonials().await
    }

    async fn info(&self) -> Result<ProgramInfo, BackendError> {
        (**self).info().await
    }

    async fn contact(&self) -> Result<ContactDetails, BackendError> {
        (**self).contact().await
    }

    async fn config(&self) -> Result<WidgetConfig, BackendError> {
        (**self).config().await
    }
}
