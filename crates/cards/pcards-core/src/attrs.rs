//! Declared-attribute parsing.
//!
//! Every parser here returns a usable value: unsupported or missing input
//! falls back to a documented default and is flagged with `valid = false`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hash prefix used when `data-prefix` is absent or malformed.
pub const DEFAULT_PREFIX: &str = "card";

static PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-zA-Z]+[-=:_]?)?$").expect("prefix pattern should compile"));

/// A parsed attribute value plus whether the raw input was acceptable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validated<T> {
    pub value: T,
    pub valid: bool,
}

impl<T> Validated<T> {
    #[inline]
    pub fn accepted(value: T) -> Self {
        Self { value, valid: true }
    }

    #[inline]
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            valid: false,
        }
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Validate a `data-prefix` value. The empty string is a valid prefix.
pub fn hash_prefix(raw: Option<&str>) -> Validated<String> {
    match raw.map(str::trim) {
        Some(candidate) if PREFIX_RE.is_match(candidate) => {
            Validated::accepted(candidate.to_string())
        }
        _ => Validated::fallback(DEFAULT_PREFIX.to_string()),
    }
}

/// Color scheme names understood by the stylesheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    White,
    Light,
    Dark,
    Black,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [
        ColorScheme::White,
        ColorScheme::Light,
        ColorScheme::Dark,
        ColorScheme::Black,
    ];

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Black => "black",
        }
    }

    /// Parse a `data-color` value (trimmed, case-insensitive).
    pub fn parse(raw: Option<&str>) -> Validated<Self> {
        let Some(raw) = raw else {
            return Validated::fallback(Self::default());
        };
        let clean = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name() == clean)
            .map_or_else(|| Validated::fallback(Self::default()), Validated::accepted)
    }

    /// Resolve per-card schemes, using `base` where a card declares nothing
    /// usable.
    pub fn resolve_cards<'a, I>(base: ColorScheme, raw: I) -> Vec<ColorScheme>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        raw.into_iter()
            .map(|attr| {
                let parsed = Self::parse(attr);
                if parsed.valid {
                    parsed.value
                } else {
                    base
                }
            })
            .collect()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
