//! Shared stack fixtures for pcards tests.
//!
//! `fixtures/manifest.json` names each stack and points at a JSON file holding
//! the declared attributes of one `.pcards` block. Entries may also record the
//! page the stack lives on and how many cards it declares, so scenario tests
//! can check their setup against the fixture itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Page address used when a fixture does not name one.
pub const DEFAULT_PAGE: &str = "https://example.test/gallery";

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    stacks: BTreeMap<String, StackEntry>,
}

/// One manifest entry. A bare string is shorthand for `{ "path": ... }`.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawEntry")]
pub struct StackEntry {
    pub path: String,
    pub page: Option<String>,
    pub cards: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        page: Option<String>,
        #[serde(default)]
        cards: Option<usize>,
    },
}

impl From<RawEntry> for StackEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Path(path) => Self {
                path,
                page: None,
                cards: None,
            },
            RawEntry::Detailed { path, page, cards } => Self { path, page, cards },
        }
    }
}

impl StackEntry {
    /// Page address for this stack, optionally with a fragment appended.
    pub fn href(&self, fragment: Option<&str>) -> String {
        let page = self.page.as_deref().unwrap_or(DEFAULT_PAGE);
        match fragment {
            Some(fragment) => format!("{page}#{fragment}"),
            None => page.to_string(),
        }
    }

    pub fn file(&self) -> PathBuf {
        fixtures_root().join(&self.path)
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

/// Stack markup descriptions (declared attributes of a `.pcards` block).
pub mod stacks {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        MANIFEST.stacks.keys().cloned().collect()
    }

    pub fn entry(name: &str) -> Result<&'static StackEntry> {
        match MANIFEST.stacks.get(name) {
            Some(entry) => Ok(entry),
            None => bail!("unknown stack fixture '{name}'"),
        }
    }

    pub fn json(name: &str) -> Result<String> {
        let file = entry(name)?.file();
        std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read stack fixture {}", file.display()))
    }

    /// Decode fixture `name` into any serde type (normally `StackMarkup`).
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse stack fixture '{name}'"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(entry(name)?.file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_points_at_a_file() {
        for name in stacks::keys() {
            let path = stacks::path(&name).unwrap();
            assert!(path.is_file(), "{name}: {}", path.display());
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(stacks::entry("nope").is_err());
        assert!(stacks::json("nope").is_err());
    }

    #[test]
    fn href_defaults_to_the_gallery_page() {
        let entry = StackEntry::from(RawEntry::Path("stacks/x.json".into()));
        assert_eq!(entry.href(None), DEFAULT_PAGE);
        assert_eq!(entry.href(Some("card2")), format!("{DEFAULT_PAGE}#card2"));
    }
}
