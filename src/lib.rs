//! Virtual Stylist library
//!
//! Modules:
//! - `api`: Axum HTTP handlers and router setup used by the server binary.
//! - `encoder`: Upload validation, base64/data-URI encoding and local previews.
//! - `gemini`: Generation client for the external image service.
//! - `prompt`: Instruction templating with `{{placeholder}}` replacement.
//! - `style`: The fixed set of outfit styles.
//! - `stylist`: Run orchestration, refinements and session state.
//! - `view`: Server-rendered HTML for the session.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `GeminiClient`,
//! `GenerationService`, `PromptConstructor`, `StyleCategory` and `Stylist`.
pub mod api;
pub mod encoder;
pub mod gemini;
pub mod prompt;
pub mod style;
pub mod stylist;
pub mod view;
pub mod config;
pub mod error;

pub use config::Config;
pub use gemini::{GeminiClient, GenerationService};
pub use prompt::constructor::PromptConstructor;
pub use style::StyleCategory;
pub use stylist::Stylist;
