//! The closed set of outfit themes requested on every styling run.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StyleCategory {
    Casual,
    Business,
    NightOut,
}

impl StyleCategory {
    /// Every category, in display order. One generation request is issued per entry.
    pub const ALL: [StyleCategory; 3] = [StyleCategory::Casual, StyleCategory::Business, StyleCategory::NightOut];

    pub fn label(self) -> &'static str {
        match self {
            StyleCategory::Casual => "Casual",
            StyleCategory::Business => "Business",
            StyleCategory::NightOut => "Night Out",
        }
    }

    /// Lowercase, dash-separated form used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            StyleCategory::Casual => "casual",
            StyleCategory::Business => "business",
            StyleCategory::NightOut => "night-out",
        }
    }

    /// Style-specific direction appended to the generation instruction.
    pub fn guidance(self) -> &'static str {
        match self {
            StyleCategory::Casual => {
                "Relaxed everyday pieces such as denim, clean sneakers and a light layer, suitable for a weekend in the city."
            }
            StyleCategory::Business => {
                "Polished office-appropriate pieces such as tailored trousers or a pencil skirt, a structured blazer and refined shoes."
            }
            StyleCategory::NightOut => {
                "Evening pieces for dinner or drinks, with statement accessories, elevated footwear and a bolder palette."
            }
        }
    }

    pub fn skeleton_id(self) -> String {
        format!("skeleton-{}", self.label())
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StyleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "casual" => Ok(StyleCategory::Casual),
            "business" => Ok(StyleCategory::Business),
            "nightout" => Ok(StyleCategory::NightOut),
            _ => Err(format!("Unknown style '{}'", s)),
        }
    }
}
