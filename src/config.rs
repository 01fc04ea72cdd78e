//! Env-driven configuration for the server, the CLI and the library.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Everything except the API key has a development default.
use std::env;
use dotenv;

use crate::error::{AppError, AppResult};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub api_host: String,
    pub api_port: String,
    pub max_upload_bytes: usize,
    pub output_dir: String,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> AppResult<Self> {
        let gemini_api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("GOOGLE_API_KEY"))
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))?;
        let max_upload_bytes = match non_empty_env("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid MAX_UPLOAD_BYTES '{}', falling back to {}", raw, DEFAULT_MAX_UPLOAD_BYTES);
                DEFAULT_MAX_UPLOAD_BYTES
            }),
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        Ok(Config {
            gemini_api_key,
            gemini_api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            api_port: env::var("API_PORT").unwrap_or_else(|_| "8190".to_string()),
            max_upload_bytes,
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "./outfits".to_string()),
        })
    }

    pub fn print_env_vars() {
        let key = non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY"));
        println!("GEMINI_API_KEY: {}", key.as_deref().map(mask_secret).unwrap_or_else(|| "<unset>".to_string()));
        println!("GEMINI_API_BASE: {}", env::var("GEMINI_API_BASE").unwrap_or_else(|_| "<unset>".to_string()));
        println!("GEMINI_MODEL: {}", env::var("GEMINI_MODEL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("API_HOST: {}", env::var("API_HOST").unwrap_or_else(|_| "<unset>".to_string()));
        println!("API_PORT: {}", env::var("API_PORT").unwrap_or_else(|_| "<unset>".to_string()));
        println!("MAX_UPLOAD_BYTES: {}", env::var("MAX_UPLOAD_BYTES").unwrap_or_else(|_| "<unset>".to_string()));
        println!("OUTPUT_DIR: {}", env::var("OUTPUT_DIR").unwrap_or_else(|_| "<unset>".to_string()));
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Keep the last four characters of a secret, hide the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
