//! Thin HTTP client for the Gemini image model.
//!
//! - `generate_for_style` posts the uploaded item plus a style instruction.
//! - `edit_image` posts an existing outfit image plus a refinement instruction.
//!
//! Both go through `models/{model}:generateContent` and return a data URI.
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::encoder::EncodedImage;
use crate::error::{AppResult, AppError};
use crate::gemini::payload::{build_request, extract_image};
use crate::gemini::GenerationService;
use crate::prompt::PromptConstructor;
use crate::style::StyleCategory;

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: PromptConstructor,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        GeminiClient {
            client: Client::new(),
            base_url: base,
            model,
            api_key,
            prompts: PromptConstructor::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        )
    }

    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }

    /// Send one `generateContent` request and return the produced image.
    async fn generate_content(&self, image: &EncodedImage, instruction: &str) -> AppResult<EncodedImage> {
        let url = self.endpoint();
        let body = build_request(image, instruction);
        tracing::info!("Sending image request to Gemini at URL: {}", url);
        tracing::debug!(payload_bytes = image.data.len(), instruction = %instruction, "Request details");

        let response = self.client.post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(AppError::HttpClient)?;
            let image = extract_image(&json)?;
            tracing::info!("Received {} image ({} base64 bytes)", image.mime_type, image.data.len());
            Ok(image)
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            let error_message = format!("Image request failed. Status: {}, Body: {}", status, error_body);
            tracing::error!("{}", error_message);
            Err(AppError::Service(error_message))
        }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_for_style(&self, image: &EncodedImage, style: StyleCategory) -> AppResult<String> {
        let instruction = self.prompts.style_instruction(style)?;
        let generated = self.generate_content(image, &instruction).await?;
        Ok(generated.to_data_uri())
    }

    async fn edit_image(&self, image_ref: &str, instruction: &str) -> AppResult<String> {
        let current = EncodedImage::from_data_uri(image_ref)?;
        let instruction = self.prompts.edit_instruction(instruction)?;
        let edited = self.generate_content(&current, &instruction).await?;
        Ok(edited.to_data_uri())
    }
}
