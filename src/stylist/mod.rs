//! Outfit orchestration: styling runs, refinements and the session they mutate.
pub mod card;
pub mod orchestrator;
pub mod outfit;

pub use card::CardPhase;
pub use orchestrator::{
    Download, EditOutcome, EditTicket, OutfitView, RunReport, RunTicket, SessionView, StyleFailure, Stylist, UploadView,
    EDIT_FAILED_MESSAGE, RUN_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
pub use outfit::GeneratedOutfit;
