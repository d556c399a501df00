//! Address synchronizer: card deep links in the address fragment.
//!
//! A card link is `#<prefix><digits>`. Writes replace the address (no history
//! entry) and arm a one-shot guard so the resulting change notification is
//! recognized as self-inflicted.

use serde::{Deserialize, Serialize};

/// Result of parsing an address against the card-link pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    /// Address without its fragment.
    pub base: String,
    /// 1-based card index, clamped into `[1, total]`; 1 when no card link.
    pub requested: usize,
    /// Whether the fragment looked like a card link.
    pub is_card_link: bool,
}

/// Clamp a requested index into `[1, total]`. With no cards this is 1.
#[inline]
pub fn clamp_index(index: usize, total: usize) -> usize {
    index.min(total).max(1)
}

/// Split an address into base and (first) fragment.
fn split_address(href: &str) -> (&str, Option<&str>) {
    let mut parts = href.split('#');
    let base = parts.next().unwrap_or_default();
    (base, parts.next())
}

/// Matches fragments of the form `<prefix><digits>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkPattern {
    prefix: String,
}

impl LinkPattern {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Card index encoded by `fragment`, unclamped. Oversized numbers saturate.
    pub fn index_in(&self, fragment: &str) -> Option<usize> {
        let digits = fragment.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(digits.parse::<usize>().unwrap_or(usize::MAX))
    }

    pub fn parse(&self, href: &str, total: usize) -> LinkInfo {
        let (base, fragment) = split_address(href);
        let index = fragment
            .filter(|f| !f.is_empty())
            .and_then(|f| self.index_in(f));
        LinkInfo {
            base: base.to_string(),
            requested: index.map_or(1, |i| clamp_index(i, total)),
            is_card_link: index.is_some(),
        }
    }

    pub fn compose(&self, base: &str, index: usize) -> String {
        format!("{base}#{}{index}", self.prefix)
    }
}

/// Tracks the page address and the self-change guard.
#[derive(Clone, Debug)]
pub struct AddressSync {
    pattern: LinkPattern,
    href: String,
    skip_next: bool,
}

impl AddressSync {
    pub fn new(pattern: LinkPattern, href: impl Into<String>) -> Self {
        Self {
            pattern,
            href: href.into(),
            skip_next: false,
        }
    }

    #[inline]
    pub fn pattern(&self) -> &LinkPattern {
        &self.pattern
    }

    /// Last address written or observed.
    #[inline]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// True while a self-inflicted change notification is still expected.
    #[inline]
    pub fn is_guarded(&self) -> bool {
        self.skip_next
    }

    pub fn link(&self, total: usize) -> LinkInfo {
        self.pattern.parse(&self.href, total)
    }

    /// Address for card `index`, arming the guard.
    ///
    /// Returns `None` when the address already points there: the host would
    /// see no change notification, so the guard must stay disarmed.
    pub fn write(&mut self, index: usize) -> Option<String> {
        let (base, _) = split_address(&self.href);
        let next = self.pattern.compose(base, index);
        if next == self.href {
            return None;
        }
        self.href.clone_from(&next);
        self.skip_next = true;
        Some(next)
    }

    /// Handle an external address change.
    ///
    /// Returns the card to show when the new address is a card link and the
    /// change was not caused by [`AddressSync::write`].
    pub fn on_external_change(&mut self, href: &str, total: usize) -> Option<usize> {
        self.href = href.to_string();
        if self.skip_next {
            self.skip_next = false;
            return None;
        }
        let link = self.pattern.parse(href, total);
        link.is_card_link.then_some(link.requested)
    }
}
