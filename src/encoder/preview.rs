//! Revocable local references to uploaded bytes.
//!
//! Each upload gets a preview entry that the view can display without a round
//! trip to the generation service. The owner revokes it once the upload is
//! superseded.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::UploadedFile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: String,
}

impl PreviewHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> String {
        format!("/preview/{}", self.id)
    }
}

#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<RwLock<HashMap<String, Arc<UploadedFile>>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn allocate(&self, file: Arc<UploadedFile>) -> PreviewHandle {
        let id = Uuid::new_v4().to_string();
        self.entries.write().await.insert(id.clone(), file);
        tracing::debug!(preview = %id, "Allocated preview");
        PreviewHandle { id }
    }

    pub async fn fetch(&self, id: &str) -> Option<Arc<UploadedFile>> {
        self.entries.read().await.get(id).cloned()
    }

    /// Release a preview. Returns false when it was already gone.
    pub async fn revoke(&self, handle: &PreviewHandle) -> bool {
        let removed = self.entries.write().await.remove(&handle.id).is_some();
        if removed {
            tracing::debug!(preview = %handle.id, "Revoked preview");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
