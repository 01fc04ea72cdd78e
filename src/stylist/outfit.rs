use serde::Serialize;
use uuid::Uuid;

use crate::style::StyleCategory;

/// One result card, or its placeholder while the request is in flight.
///
/// The id changes when a placeholder resolves: `skeleton-<style>` while
/// loading, a fresh uuid once finished. Consumers key on the current id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedOutfit {
    pub id: String,
    pub style: StyleCategory,
    pub image_url: String,
    pub description: String,
    pub is_loading: bool,
}

impl GeneratedOutfit {
    pub fn placeholder(style: StyleCategory) -> Self {
        GeneratedOutfit {
            id: style.skeleton_id(),
            style,
            image_url: String::new(),
            description: String::new(),
            is_loading: true,
        }
    }

    pub fn finished(style: StyleCategory, image_url: String) -> Self {
        GeneratedOutfit {
            id: Uuid::new_v4().to_string(),
            style,
            image_url,
            description: format!("A {} look featuring your item.", style.label()),
            is_loading: false,
        }
    }
}
