//! Image sizing and aspect classification for card figures.

use serde::{Deserialize, Serialize};

use crate::attrs::Validated;

/// Width/height ratio above which an image counts as landscape.
pub const RATIO_LANDSCAPE: f64 = 1.1;
/// Width/height ratio below which an image counts as portrait.
pub const RATIO_PORTRAIT: f64 = 0.85;
/// Both dimensions must exceed this many pixels to be classified.
pub const MIN_MEASURED_PX: u32 = 100;

/// Container-level image size preset (`data-imgsize`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Big,
    Full,
    Cover,
}

impl ImageSize {
    pub const ALL: [ImageSize; 5] = [
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Big,
        ImageSize::Full,
        ImageSize::Cover,
    ];

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Big => "big",
            Self::Full => "full",
            Self::Cover => "cover",
        }
    }

    /// Exact match against the known names; no trimming or case folding.
    pub fn parse(raw: Option<&str>) -> Validated<Self> {
        raw.and_then(|raw| Self::ALL.into_iter().find(|size| size.name() == raw))
            .map_or_else(|| Validated::fallback(Self::default()), Validated::accepted)
    }
}

/// Orientation of a figure's image, exposed as `data-type`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Landscape,
    Portrait,
    Square,
    #[default]
    Unknown,
}

impl Aspect {
    /// Images not yet measured (or tiny) stay `Unknown`.
    pub fn classify(width: u32, height: u32) -> Self {
        if width <= MIN_MEASURED_PX || height <= MIN_MEASURED_PX {
            return Self::Unknown;
        }
        let ratio = f64::from(width) / f64::from(height);
        if ratio > RATIO_LANDSCAPE {
            Self::Landscape
        } else if ratio < RATIO_PORTRAIT {
            Self::Portrait
        } else {
            Self::Square
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
            Self::Unknown => "unknown",
        }
    }
}
