//! Input contracts and input adapters.
//!
//! Hosts translate raw DOM events into [`HostEvent`]s and pass them to
//! [`crate::Navigator::update`], or call the per-event entry points directly.
//! The adapter functions here only compute a target index; they never touch
//! navigation state.

use serde::{Deserialize, Serialize};

use crate::navigator::NavigationSnapshot;
use crate::reflect::ControlVisibility;

/// Batch of host events for one update.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Inputs {
    #[serde(default)]
    pub events: Vec<HostEvent>,
}

impl Inputs {
    pub fn single(event: HostEvent) -> Self {
        Self {
            events: vec![event],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Show the initial card (seeded from the address).
    Start,
    Key(KeyEvent),
    Click {
        control: Direction,
    },
    /// The page address changed (`hashchange`).
    AddressChanged {
        href: String,
    },
    /// A card finished a CSS transition.
    TransitionEnd {
        card: usize,
    },
    /// Programmatic request for card `index`.
    Goto {
        index: usize,
    },
}

/// Navigation direction, also naming the prev/next controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Keys the navigator cares about; everything else is `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    #[default]
    Other,
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::from_key_name(&name)
    }
}

impl Key {
    /// From `KeyboardEvent.key`, including the legacy unprefixed names.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowDown" | "Down" => Self::ArrowDown,
            _ => Self::Other,
        }
    }

    /// From the legacy `KeyboardEvent.keyCode`.
    pub fn from_code(code: u32) -> Self {
        match code {
            37 => Self::ArrowLeft,
            38 => Self::ArrowUp,
            39 => Self::ArrowRight,
            40 => Self::ArrowDown,
            _ => Self::Other,
        }
    }

    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowLeft | Self::ArrowUp => Some(Direction::Prev),
            Self::ArrowRight | Self::ArrowDown => Some(Direction::Next),
            Self::Other => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    /// Single, unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    #[inline]
    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

/// Neighbor of the current card in `direction`, if there is one.
pub fn step_target(direction: Direction, snapshot: &NavigationSnapshot) -> Option<usize> {
    match direction {
        Direction::Next if snapshot.current < snapshot.total => Some(snapshot.current + 1),
        Direction::Prev if snapshot.current > 1 => Some(snapshot.current - 1),
        _ => None,
    }
}

/// Target for a key press: direction keys only, no modifiers, no repeats.
pub fn key_target(event: &KeyEvent, snapshot: &NavigationSnapshot) -> Option<usize> {
    if event.repeat || event.has_modifier() {
        return None;
    }
    step_target(event.key.direction()?, snapshot)
}

/// Target for a control click; hidden controls do nothing.
pub fn click_target(
    control: Direction,
    controls: &ControlVisibility,
    snapshot: &NavigationSnapshot,
) -> Option<usize> {
    if controls.is_hidden(control) {
        return None;
    }
    step_target(control, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(current: usize, total: usize) -> NavigationSnapshot {
        NavigationSnapshot {
            current,
            total,
            blocking: false,
        }
    }

    #[test]
    fn arrows_map_to_neighbors() {
        let snap = at(3, 5);
        for (key, expected) in [
            (Key::ArrowLeft, 2),
            (Key::ArrowUp, 2),
            (Key::ArrowRight, 4),
            (Key::ArrowDown, 4),
        ] {
            assert_eq!(key_target(&KeyEvent::plain(key), &snap), Some(expected));
        }
        assert_eq!(key_target(&KeyEvent::plain(Key::Other), &snap), None);
    }

    #[test]
    fn modifiers_and_repeats_are_ignored() {
        let snap = at(3, 5);
        let modified = [
            KeyEvent { ctrl: true, ..KeyEvent::plain(Key::ArrowRight) },
            KeyEvent { shift: true, ..KeyEvent::plain(Key::ArrowRight) },
            KeyEvent { alt: true, ..KeyEvent::plain(Key::ArrowRight) },
            KeyEvent { meta: true, ..KeyEvent::plain(Key::ArrowRight) },
            KeyEvent { repeat: true, ..KeyEvent::plain(Key::ArrowRight) },
        ];
        for event in modified {
            assert_eq!(key_target(&event, &snap), None, "{event:?}");
        }
    }

    #[test]
    fn boundaries_stop_navigation() {
        assert_eq!(key_target(&KeyEvent::plain(Key::ArrowRight), &at(5, 5)), None);
        assert_eq!(key_target(&KeyEvent::plain(Key::ArrowLeft), &at(1, 5)), None);
    }

    #[test]
    fn hidden_controls_ignore_clicks() {
        let snap = at(2, 5);
        let hidden_prev = ControlVisibility {
            prev_hidden: true,
            next_hidden: false,
        };
        assert_eq!(click_target(Direction::Prev, &hidden_prev, &snap), None);
        assert_eq!(click_target(Direction::Next, &hidden_prev, &snap), Some(3));
    }

    #[test]
    fn key_names_and_codes() {
        assert_eq!(Key::from_key_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_key_name("Left"), Key::ArrowLeft);
        assert_eq!(Key::from_key_name("Enter"), Key::Other);
        assert_eq!(Key::from_code(39), Key::ArrowRight);
        assert_eq!(Key::from_code(13), Key::Other);
    }

    #[test]
    fn host_events_decode_from_json() {
        let inputs: Inputs = serde_json::from_str(
            r#"{ "events": [
                { "type": "key", "key": "ArrowRight" },
                { "type": "click", "control": "prev" },
                { "type": "address_changed", "href": "/p#card2" },
                { "type": "key", "key": "Escape", "shift": true }
            ] }"#,
        )
        .unwrap();
        assert_eq!(inputs.events[0], HostEvent::Key(KeyEvent::plain(Key::ArrowRight)));
        assert_eq!(
            inputs.events[1],
            HostEvent::Click {
                control: Direction::Prev
            }
        );
        assert_eq!(
            inputs.events[3],
            HostEvent::Key(KeyEvent {
                shift: true,
                ..KeyEvent::plain(Key::Other)
            })
        );
    }
}
