//! Output contracts from the navigator.
//!
//! `changes` are effects the host must apply to the page, in order. `events`
//! are semantic signals (transition lifecycle, dropped requests) that hosts
//! may use for scheduling or diagnostics.

use serde::{Deserialize, Serialize};

use crate::attrs::ColorScheme;
use crate::capability::{AnimationMode, TransformProperty};
use crate::error::Rejection;
use crate::ids::SubscriptionId;
use crate::reflect::{CardState, ControlVisibility};

/// One effect on the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Replace the page address without adding a history entry.
    ReplaceAddress { href: String },
    /// Hidden state of the prev/next controls.
    Controls(ControlVisibility),
    /// Container `data-currentcolor`.
    CurrentColor { scheme: ColorScheme },
    /// Card `data-state`; `Hidden` removes the attribute.
    CardState { card: usize, state: CardState },
    /// Inline transform on the card strip.
    StackTransform {
        property: TransformProperty,
        value: String,
    },
    /// Listen once for the end of `card`'s CSS transition and report it as
    /// [`crate::HostEvent::TransitionEnd`].
    Subscribe {
        card: usize,
        subscription: SubscriptionId,
    },
    /// Drop a listener registered by `Subscribe`.
    Unsubscribe {
        card: usize,
        subscription: SubscriptionId,
    },
    /// Turn on CSS-driven animation (container class `animate`).
    EnableAnimation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum NavEvent {
    /// A transition began; call `advance` once `unblock_after_ms` elapsed.
    TransitionStarted {
        from: Option<usize>,
        to: usize,
        mode: AnimationMode,
        initial: bool,
        unblock_after_ms: f64,
    },
    /// The blocking window closed.
    TransitionSettled { current: usize },
    RequestDropped { target: usize, reason: Rejection },
}

/// Changes and events accumulated since the last clear.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<NavEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: NavEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Delay requested by the most recent `TransitionStarted`, if any.
    pub fn unblock_after_ms(&self) -> Option<f64> {
        self.events.iter().rev().find_map(|event| match event {
            NavEvent::TransitionStarted {
                unblock_after_ms, ..
            } => Some(*unblock_after_ms),
            _ => None,
        })
    }
}
