#![allow(dead_code)]
// tests/common/mod.rs

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use virtual_stylist::encoder::{encode_upload, EncodedImage, PreviewRegistry, UploadedItem};
use virtual_stylist::error::{AppError, AppResult};
use virtual_stylist::{GenerationService, StyleCategory};

/// An in-memory generation service with per-style failures and optional gates
/// that hold generation or edit requests until permits are added.
#[derive(Default)]
pub struct MockService {
    failing: HashSet<StyleCategory>,
    edit_fails: bool,
    gate: Option<Arc<Semaphore>>,
    edit_gate: Option<Arc<Semaphore>>,
    generate_calls: AtomicUsize,
    edit_calls: AtomicUsize,
    edit_inputs: Mutex<Vec<(String, String)>>,
}

impl MockService {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing(mut self, style: StyleCategory) -> Self {
        self.failing.insert(style);
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.failing.extend(StyleCategory::ALL);
        self
    }

    pub fn failing_edits(mut self) -> Self {
        self.edit_fails = true;
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn gated_edits(mut self, gate: Arc<Semaphore>) -> Self {
        self.edit_gate = Some(gate);
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn edit_calls(&self) -> usize {
        self.edit_calls.load(Ordering::SeqCst)
    }

    pub fn edit_inputs(&self) -> Vec<(String, String)> {
        self.edit_inputs.lock().unwrap().clone()
    }
}

pub fn outfit_uri(style: StyleCategory) -> String {
    EncodedImage::from_bytes("image/png", format!("{}-outfit", style.slug()).as_bytes()).to_data_uri()
}

pub fn edited_uri(instruction: &str) -> String {
    EncodedImage::from_bytes("image/png", format!("edited: {}", instruction).as_bytes()).to_data_uri()
}

#[async_trait]
impl GenerationService for MockService {
    async fn generate_for_style(&self, _image: &EncodedImage, style: StyleCategory) -> AppResult<String> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.failing.contains(&style) {
            return Err(AppError::Service(format!("{} generation failed", style.label())));
        }
        Ok(outfit_uri(style))
    }

    async fn edit_image(&self, image_ref: &str, instruction: &str) -> AppResult<String> {
        self.edit_calls.fetch_add(1, Ordering::SeqCst);
        self.edit_inputs.lock().unwrap().push((image_ref.to_string(), instruction.to_string()));
        if let Some(gate) = &self.edit_gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.edit_fails {
            return Err(AppError::Service("edit failed".to_string()));
        }
        Ok(edited_uri(instruction))
    }
}

pub async fn sample_item(previews: &PreviewRegistry, name: &str) -> UploadedItem {
    encode_upload(previews, name, Some("image/png"), b"fake png bytes".to_vec())
        .await
        .expect("sample upload encodes")
}

/// Poll `check` until it holds, failing the test after roughly two seconds.
pub async fn wait_until<F: Fn() -> bool>(check: F) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// Like `wait_until`, for checks that need to await session state.
pub async fn wait_until_async<F, Fut>(check: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
