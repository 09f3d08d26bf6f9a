//! Converter backend trait.
//!
//! A [`MarkdownConverter`] is the slow, fallible step behind the cache.
//! The [`ConversionService`](crate::ConversionService) calls it only on a
//! cache miss, and at most once at a time per distinct input text.
//!
//! # Failure semantics
//!
//! Errors are not propagated to callers of the service. They become a
//! [`ConversionResponse::failure`](crate::ConversionResponse::failure) and
//! are never cached, so the next call for the same text retries the backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Backend that turns raw text into markdown.
#[async_trait]
pub trait MarkdownConverter: Send + Sync {
    /// Converter name for logging and metric labels.
    fn name(&self) -> &str;

    /// Convert `text` to a markdown document.
    async fn convert(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<T: MarkdownConverter + ?Sized> MarkdownConverter for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn convert(&self, text: &str) -> Result<String> {
        (**self).convert(text).await
    }
}
