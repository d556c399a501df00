//! One-shot setup: turn declared markup attributes into a validated
//! [`StackConfig`] plus the attribute rewrites the page needs.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attrs::{hash_prefix, ColorScheme};
use crate::capability::{AnimationMode, AnimationPreference, Capabilities};
use crate::config::{StackConfig, Timing};
use crate::error::ConfigError;
use crate::image::{Aspect, ImageSize};

/// Declared attributes of a card stack, as read from the page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackMarkup {
    /// Container `data-prefix`.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Container `data-color`.
    #[serde(default)]
    pub color: Option<String>,
    /// Container `data-imgsize`.
    #[serde(default)]
    pub img_size: Option<String>,
    /// Container `data-animation`.
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub cards: Vec<CardMarkup>,
    /// `figure > img` elements inside the stack, in document order.
    #[serde(default)]
    pub images: Vec<ImageMarkup>,
}

impl StackMarkup {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMarkup {
    /// Card `data-color`.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMarkup {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Attribute rewrites produced by setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetupChange {
    /// Container `data-color`.
    ContainerColor { scheme: ColorScheme },
    /// Card `data-color` (1-based card).
    CardColor { card: usize, scheme: ColorScheme },
    /// Container `data-imgsize`; only emitted when the declared value was
    /// unusable.
    ImageSize { size: ImageSize },
    /// Figure `data-type` for image `image` (0-based document order).
    FigureAspect { image: usize, aspect: Aspect },
    /// Prepend a background-image placeholder to the image's figure.
    FigureBackground { image: usize, src: String },
    /// Un-hide the controls root.
    ShowControls,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    pub config: StackConfig,
    pub img_size: ImageSize,
    pub changes: Vec<SetupChange>,
}

/// Validate `markup` against `caps`. Never fails: every unusable value falls
/// back to its default.
pub fn resolve(markup: &StackMarkup, caps: &Capabilities) -> Setup {
    let mut changes = Vec::new();

    let prefix = hash_prefix(markup.prefix.as_deref());
    if !prefix.valid && markup.prefix.is_some() {
        warn!(declared = ?markup.prefix, "unsupported data-prefix, using default");
    }

    let base = ColorScheme::parse(markup.color.as_deref());
    if !base.valid && markup.color.is_some() {
        warn!(declared = ?markup.color, "unsupported data-color on container");
    }
    let base = base.into_inner();
    changes.push(SetupChange::ContainerColor { scheme: base });
    let card_colors =
        ColorScheme::resolve_cards(base, markup.cards.iter().map(|c| c.color.as_deref()));
    changes.extend(
        card_colors
            .iter()
            .enumerate()
            .map(|(i, &scheme)| SetupChange::CardColor { card: i + 1, scheme }),
    );

    let img_size = ImageSize::parse(markup.img_size.as_deref());
    if !img_size.valid {
        changes.push(SetupChange::ImageSize {
            size: img_size.value,
        });
    }

    let (mode, transform) = AnimationMode::resolve(
        AnimationPreference::parse(markup.animation.as_deref()),
        caps,
    );

    changes.push(SetupChange::ShowControls);

    for (image, img) in markup.images.iter().enumerate() {
        changes.push(SetupChange::FigureBackground {
            image,
            src: img.src.clone(),
        });
        changes.push(SetupChange::FigureAspect {
            image,
            aspect: Aspect::classify(img.width, img.height),
        });
    }

    Setup {
        config: StackConfig {
            prefix: prefix.into_inner(),
            mode,
            transform,
            card_colors,
            timing: Timing::default(),
        },
        img_size: img_size.value,
        changes,
    }
}
