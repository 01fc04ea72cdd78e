//! Generation client for the external image service.
//!
//! `GenerationService` is the seam the orchestrator talks to; `GeminiClient`
//! is the production implementation. Both operations are single attempts with
//! no retry, and both return an embeddable `data:` URI.
pub mod client;
pub mod payload;

use async_trait::async_trait;

use crate::encoder::EncodedImage;
use crate::error::AppResult;
use crate::style::StyleCategory;

pub use client::GeminiClient;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate one outfit image for `style` around the uploaded item.
    async fn generate_for_style(&self, image: &EncodedImage, style: StyleCategory) -> AppResult<String>;

    /// Produce a modified copy of `image_ref` following `instruction`.
    async fn edit_image(&self, image_ref: &str, instruction: &str) -> AppResult<String>;
}
