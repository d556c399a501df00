//! Navigator configuration.

use serde::{Deserialize, Serialize};

use crate::attrs::{hash_prefix, ColorScheme, DEFAULT_PREFIX};
use crate::capability::{AnimationMode, TransformProperty};
use crate::error::ConfigError;

/// Blocking window lengths, in milliseconds.
///
/// These are timers, not animation-completion signals: the navigator unblocks
/// when they elapse regardless of what the renderer is doing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Window for `none` and `fade` transitions.
    #[serde(default = "Timing::default_settle_ms")]
    pub settle_ms: f64,
    /// Window for `slide` transitions.
    #[serde(default = "Timing::default_slide_ms")]
    pub slide_ms: f64,
}

impl Timing {
    fn default_settle_ms() -> f64 {
        150.0
    }

    fn default_slide_ms() -> f64 {
        250.0
    }

    /// Delay for one transition in `mode`.
    #[inline]
    pub fn delay_for(&self, mode: AnimationMode) -> f64 {
        match mode {
            AnimationMode::None | AnimationMode::Fade => self.settle_ms,
            AnimationMode::Slide => self.slide_ms,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_ms: Self::default_settle_ms(),
            slide_ms: Self::default_slide_ms(),
        }
    }
}

/// Everything the navigator needs, already validated.
///
/// Built by [`crate::setup::resolve`] from page markup, or decoded from JSON
/// by hosts that own their own rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default = "StackConfig::default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub mode: AnimationMode,
    #[serde(default)]
    pub transform: Option<TransformProperty>,
    /// One entry per card, in stack order.
    #[serde(default)]
    pub card_colors: Vec<ColorScheme>,
    #[serde(default)]
    pub timing: Timing,
}

impl StackConfig {
    fn default_prefix() -> String {
        DEFAULT_PREFIX.to_string()
    }

    /// `total` white cards, no animation.
    pub fn with_cards(total: usize) -> Self {
        Self {
            card_colors: vec![ColorScheme::default(); total],
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_mode(mut self, mode: AnimationMode, transform: Option<TransformProperty>) -> Self {
        self.mode = mode;
        self.transform = transform;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.card_colors.len()
    }

    /// Decode and normalize a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: StackConfig = serde_json::from_str(json)?;
        Ok(cfg.normalized())
    }

    /// Apply the same fallbacks markup parsing would: an invalid prefix
    /// becomes the default, slide without a transform property becomes none,
    /// and negative or non-finite delays become zero.
    pub fn normalized(mut self) -> Self {
        self.prefix = hash_prefix(Some(self.prefix.as_str())).into_inner();
        match self.mode {
            AnimationMode::Slide if self.transform.is_none() => {
                self.mode = AnimationMode::None;
            }
            AnimationMode::Slide => {}
            _ => self.transform = None,
        }
        for ms in [&mut self.timing.settle_ms, &mut self.timing.slide_ms] {
            if !ms.is_finite() || *ms < 0.0 {
                *ms = 0.0;
            }
        }
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
            mode: AnimationMode::None,
            transform: None,
            card_colors: Vec::new(),
            timing: Timing::default(),
        }
    }
}
