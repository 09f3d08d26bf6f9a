//! Core ConversionGateway trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ConversionInput, ConversionResponse};

/// The conversion entry point consumed by front ends.
///
/// Implementations never fail at the type level: backend errors arrive as
/// a response with `success == false` and `error` set.
#[async_trait]
pub trait ConversionGateway: Send + Sync {
    /// Convert `input.text` to markdown, serving from cache when possible.
    async fn convert_text(&self, input: &ConversionInput) -> ConversionResponse;
}

#[async_trait]
impl<T: ConversionGateway + ?Sized> ConversionGateway for Arc<T> {
    async fn convert_text(&self, input: &ConversionInput) -> ConversionResponse {
        (**self).convert_text(input).await
    }
}
