//! Host capability facts and animation mode resolution.

use serde::{Deserialize, Serialize};

/// Style property used to move the card strip in slide mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformProperty {
    Webkit,
    Ms,
    Standard,
}

impl TransformProperty {
    /// Probe order; the last supported candidate wins.
    pub const CANDIDATES: [TransformProperty; 3] = [
        TransformProperty::Webkit,
        TransformProperty::Ms,
        TransformProperty::Standard,
    ];

    /// Name as seen on a style object (`element.style[name]`).
    #[inline]
    pub fn style_name(self) -> &'static str {
        match self {
            Self::Webkit => "WebkitTransform",
            Self::Ms => "msTransform",
            Self::Standard => "transform",
        }
    }

    /// Name as written in CSS (`style.setProperty(name, ..)`).
    #[inline]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Webkit => "-webkit-transform",
            Self::Ms => "-ms-transform",
            Self::Standard => "transform",
        }
    }
}

/// Immutable facts about the host's styling support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub transition: bool,
    pub transform: Option<TransformProperty>,
}

impl Capabilities {
    /// Host with every capability, using the unprefixed transform.
    pub fn full() -> Self {
        Self {
            transition: true,
            transform: Some(TransformProperty::Standard),
        }
    }

    /// Build from a predicate answering "does the style object know `name`?".
    pub fn probe<F>(mut knows: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let transition = knows("transition") || knows("webkitTransition");
        let transform = TransformProperty::CANDIDATES
            .into_iter()
            .rev()
            .find(|prop| knows(prop.style_name()));
        Self {
            transition,
            transform,
        }
    }
}

/// Declared `data-animation` preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPreference {
    #[default]
    None,
    Fade,
    Slide,
}

impl AnimationPreference {
    /// Trimmed and lowercased; anything unrecognized means no animation.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "fade" => Self::Fade,
            "slide" => Self::Slide,
            _ => Self::None,
        }
    }
}

/// Transition strategy for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    None,
    Fade,
    Slide,
}

impl AnimationMode {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fade => "fade",
            Self::Slide => "slide",
        }
    }

    /// Downgrade the preference to what the host can render.
    ///
    /// Returns the mode and, for slide, the transform property to drive.
    pub fn resolve(
        pref: AnimationPreference,
        caps: &Capabilities,
    ) -> (AnimationMode, Option<TransformProperty>) {
        match pref {
            AnimationPreference::Fade if caps.transition => (AnimationMode::Fade, None),
            AnimationPreference::Slide if caps.transition => match caps.transform {
                Some(prop) => (AnimationMode::Slide, Some(prop)),
                None => (AnimationMode::None, None),
            },
            _ => (AnimationMode::None, None),
        }
    }
}
