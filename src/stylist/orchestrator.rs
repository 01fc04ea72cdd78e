//! Session state machine for styling runs and refinements.
//!
//! A run installs one placeholder per style, fans the requests out
//! concurrently, waits for every one of them, and keeps only the successes.
//! Every upload or new run bumps a run token; results that come back for an
//! older token are dropped instead of overwriting newer state.
use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::encoder::{EncodedImage, PreviewRegistry, UploadedItem};
use crate::error::{AppError, AppResult};
use crate::gemini::GenerationService;
use crate::style::StyleCategory;
use crate::stylist::card::CardPhase;
use crate::stylist::outfit::GeneratedOutfit;

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to process the uploaded image.";
pub const RUN_FAILED_MESSAGE: &str = "Unable to generate any outfits. Please try a different image.";
pub const EDIT_FAILED_MESSAGE: &str = "Could not refine the image. Please try again.";

#[derive(Default)]
struct Session {
    uploaded: Option<UploadedItem>,
    outfits: Vec<GeneratedOutfit>,
    generating: bool,
    error: Option<String>,
    alert: Option<String>,
    cards: HashMap<String, CardPhase>,
    run: u64,
}

/// Issued by `begin_run`; carries the token the results are checked against.
#[derive(Debug)]
pub struct RunTicket {
    run: u64,
    image: EncodedImage,
}

impl RunTicket {
    pub fn run(&self) -> u64 {
        self.run
    }
}

/// Issued by `begin_edit`; the image reference the refinement starts from.
#[derive(Debug)]
pub struct EditTicket {
    id: String,
    image_ref: String,
    instruction: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyleFailure {
    pub style: StyleCategory,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub run: u64,
    pub succeeded: Vec<StyleCategory>,
    pub failed: Vec<StyleFailure>,
    /// The session moved on (re-upload or newer run) before this run settled.
    pub superseded: bool,
}

impl RunReport {
    pub fn is_failed(&self) -> bool {
        !self.superseded && self.succeeded.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    Applied,
    Skipped,
    NotFound,
    NotReady,
    Busy,
    /// The edit came back after its card had been replaced.
    Discarded,
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadView {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    pub preview_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutfitView {
    #[serde(flatten)]
    pub outfit: GeneratedOutfit,
    pub phase: CardPhase,
}

/// Read-only copy of the session, as rendered by the view and the JSON API.
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub upload: Option<UploadView>,
    pub outfits: Vec<OutfitView>,
    pub generating: bool,
    pub error: Option<String>,
    pub alert: Option<String>,
    pub can_start: bool,
}

impl SessionView {
    pub fn has_work_in_flight(&self) -> bool {
        self.generating || self.outfits.iter().any(|o| o.outfit.is_loading || o.phase.is_submitting())
    }
}

pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub struct Stylist {
    service: Arc<dyn GenerationService>,
    previews: PreviewRegistry,
    session: RwLock<Session>,
}

impl Stylist {
    pub fn new(service: Arc<dyn GenerationService>, previews: PreviewRegistry) -> Self {
        Stylist { service, previews, session: RwLock::new(Session::default()) }
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Replace the current item. Clears results, messages and card state, and
    /// supersedes any run still in flight.
    pub async fn upload(&self, item: UploadedItem) {
        let previous = {
            let mut s = self.session.write().await;
            s.run += 1;
            s.outfits.clear();
            s.cards.clear();
            s.error = None;
            s.alert = None;
            s.generating = false;
            s.uploaded.replace(item)
        };
        if let Some(previous) = previous {
            self.previews.revoke(&previous.preview).await;
        }
    }

    /// An upload could not be read or encoded; the current item stays as it was.
    pub async fn record_upload_failure(&self, err: &AppError) {
        tracing::warn!("Upload rejected: {}", err);
        self.session.write().await.error = Some(UPLOAD_FAILED_MESSAGE.to_string());
    }

    /// Install placeholders for every style. Returns `None` without an upload.
    pub async fn begin_run(&self) -> Option<RunTicket> {
        let mut s = self.session.write().await;
        Self::install_placeholders(&mut s)
    }

    /// Like `begin_run`, but only when the start affordance is on offer: an
    /// item is uploaded, nothing is running and there are no results yet.
    pub async fn begin_run_if_idle(&self) -> Option<RunTicket> {
        let mut s = self.session.write().await;
        if s.generating || !s.outfits.is_empty() {
            return None;
        }
        Self::install_placeholders(&mut s)
    }

    fn install_placeholders(s: &mut Session) -> Option<RunTicket> {
        let image = s.uploaded.as_ref()?.encoded.clone();
        s.run += 1;
        s.generating = true;
        s.error = None;
        s.cards.clear();
        s.outfits = StyleCategory::ALL.iter().map(|&style| GeneratedOutfit::placeholder(style)).collect();
        tracing::info!(run = s.run, styles = StyleCategory::ALL.len(), "Styling run started");
        Some(RunTicket { run: s.run, image })
    }

    /// Issue every style request, wait for all of them and publish the successes.
    pub async fn settle_run(&self, ticket: RunTicket) -> RunReport {
        let image = &ticket.image;
        let requests = StyleCategory::ALL.iter().map(|&style| async move {
            (style, self.service.generate_for_style(image, style).await)
        });
        let results = join_all(requests).await;

        let mut outfits = Vec::new();
        let mut failed = Vec::new();
        for (style, result) in results {
            match result {
                Ok(image_url) if !image_url.trim().is_empty() => {
                    outfits.push(GeneratedOutfit::finished(style, image_url));
                }
                Ok(_) => {
                    tracing::warn!(run = ticket.run, style = %style, "Generation returned an empty image reference");
                    failed.push(StyleFailure { style, reason: "empty image reference".to_string() });
                }
                Err(e) => {
                    tracing::warn!(run = ticket.run, style = %style, "Generation failed: {}", e);
                    failed.push(StyleFailure { style, reason: e.to_string() });
                }
            }
        }
        let succeeded: Vec<StyleCategory> = outfits.iter().map(|o| o.style).collect();

        let mut s = self.session.write().await;
        if s.run != ticket.run {
            tracing::info!(run = ticket.run, current = s.run, "Discarding results of a superseded run");
            return RunReport { run: ticket.run, succeeded, failed, superseded: true };
        }
        s.generating = false;
        if outfits.is_empty() {
            tracing::error!(run = ticket.run, "Every style failed");
            s.outfits.clear();
            s.error = Some(RUN_FAILED_MESSAGE.to_string());
        } else {
            tracing::info!(run = ticket.run, succeeded = outfits.len(), failed = failed.len(), "Styling run resolved");
            s.outfits = outfits;
        }
        RunReport { run: ticket.run, succeeded, failed, superseded: false }
    }

    /// `begin_run` followed by `settle_run`.
    pub async fn start_styling(&self) -> Option<RunReport> {
        let ticket = self.begin_run().await?;
        Some(self.settle_run(ticket).await)
    }

    pub async fn open_editor(&self, id: &str) -> bool {
        let mut guard = self.session.write().await;
        let s = &mut *guard;
        if !s.outfits.iter().any(|o| o.id == id && !o.is_loading) {
            return false;
        }
        let phase = s.cards.entry(id.to_string()).or_default();
        *phase = phase.open();
        true
    }

    pub async fn close_editor(&self, id: &str) {
        let mut s = self.session.write().await;
        if let Some(phase) = s.cards.get_mut(id) {
            *phase = phase.cancel();
        }
    }

    /// Validate a refinement and mark its card as submitting.
    ///
    /// `Err` carries the outcome when no request should be sent: blank
    /// instruction, unknown or still-loading entry, or a card already in flight.
    pub async fn begin_edit(&self, id: &str, instruction: &str) -> Result<EditTicket, EditOutcome> {
        if instruction.trim().is_empty() {
            return Err(EditOutcome::Skipped);
        }
        let mut guard = self.session.write().await;
        let s = &mut *guard;
        let Some(outfit) = s.outfits.iter().find(|o| o.id == id) else {
            return Err(EditOutcome::NotFound);
        };
        if outfit.is_loading {
            return Err(EditOutcome::NotReady);
        }
        let phase = s.cards.entry(id.to_string()).or_default();
        if phase.is_submitting() {
            return Err(EditOutcome::Busy);
        }
        *phase = CardPhase::Submitting;
        Ok(EditTicket {
            id: id.to_string(),
            image_ref: outfit.image_url.clone(),
            instruction: instruction.to_string(),
        })
    }

    /// Send the refinement. Only the entry's image reference changes on
    /// success; on failure it is left untouched and an alert is raised. The
    /// card closes either way.
    pub async fn settle_edit(&self, ticket: EditTicket) -> AppResult<EditOutcome> {
        let id = ticket.id.as_str();
        tracing::info!(outfit = %id, "Refining outfit");
        let result = self.service.edit_image(&ticket.image_ref, &ticket.instruction).await;

        let mut guard = self.session.write().await;
        let s = &mut *guard;
        let target = s.outfits.iter_mut().find(|o| o.id == id);
        if target.is_some() {
            s.cards.insert(id.to_string(), CardPhase::Closed);
        } else {
            s.cards.remove(id);
        }

        match (result, target) {
            (Ok(image_url), Some(outfit)) => {
                outfit.image_url = image_url;
                Ok(EditOutcome::Applied)
            }
            (Ok(_), None) => {
                tracing::info!(outfit = %id, "Outfit replaced while refining; dropping result");
                Ok(EditOutcome::Discarded)
            }
            (Err(e), _) => {
                tracing::warn!(outfit = %id, "Refinement failed: {}", e);
                s.alert = Some(EDIT_FAILED_MESSAGE.to_string());
                Err(AppError::Edit(EDIT_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// `begin_edit` followed by `settle_edit`.
    pub async fn edit_outfit(&self, id: &str, instruction: &str) -> AppResult<EditOutcome> {
        match self.begin_edit(id, instruction).await {
            Ok(ticket) => self.settle_edit(ticket).await,
            Err(outcome) => Ok(outcome),
        }
    }

    pub async fn dismiss_alert(&self) {
        self.session.write().await.alert = None;
    }

    pub async fn outfits(&self) -> Vec<GeneratedOutfit> {
        self.session.read().await.outfits.clone()
    }

    pub async fn snapshot(&self) -> SessionView {
        let s = self.session.read().await;
        let upload = s.uploaded.as_ref().map(|item| UploadView {
            file_name: item.file.name.clone(),
            mime_type: item.file.mime_type.clone(),
            size: item.file.bytes.len(),
            preview_url: item.preview.url(),
        });
        let outfits = s
            .outfits
            .iter()
            .map(|o| OutfitView {
                outfit: o.clone(),
                phase: s.cards.get(&o.id).copied().unwrap_or_default(),
            })
            .collect();
        SessionView {
            can_start: upload.is_some() && !s.generating && s.outfits.is_empty(),
            upload,
            outfits,
            generating: s.generating,
            error: s.error.clone(),
            alert: s.alert.clone(),
        }
    }

    /// Materialize an outfit's current image as a file to save.
    pub async fn download(&self, id: &str) -> AppResult<Download> {
        let outfit = {
            let s = self.session.read().await;
            s.outfits
                .iter()
                .find(|o| o.id == id && !o.is_loading)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("outfit {}", id)))?
        };
        let image = EncodedImage::from_data_uri(&outfit.image_url)?;
        Ok(Download {
            file_name: format!("stylist-{}.png", outfit.style.slug()),
            bytes: image.decode()?,
            mime_type: image.mime_type,
        })
    }
}
