//! UI reflectors: state projections derived from the current index.

use serde::{Deserialize, Serialize};

use crate::attrs::ColorScheme;
use crate::inputs::Direction;

/// Hidden state of the prev/next controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlVisibility {
    pub prev_hidden: bool,
    pub next_hidden: bool,
}

impl ControlVisibility {
    pub fn for_index(current: usize, total: usize) -> Self {
        Self {
            prev_hidden: current == 1,
            next_hidden: current == total,
        }
    }

    #[inline]
    pub fn is_hidden(&self, control: Direction) -> bool {
        match control {
            Direction::Prev => self.prev_hidden,
            Direction::Next => self.next_hidden,
        }
    }
}

/// Scheme of card `current` (1-based), if it exists.
pub fn current_color(schemes: &[ColorScheme], current: usize) -> Option<ColorScheme> {
    schemes.get(current.checked_sub(1)?).copied()
}

/// Rendering state of a single card (`data-state`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    #[default]
    Hidden,
    Open,
    Closing,
}

impl CardState {
    /// Attribute value, or `None` when the attribute should be removed.
    #[inline]
    pub fn attr_value(self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::Open => Some("open"),
            Self::Closing => Some("closing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_hide_at_boundaries() {
        assert_eq!(
            ControlVisibility::for_index(1, 5),
            ControlVisibility {
                prev_hidden: true,
                next_hidden: false
            }
        );
        assert_eq!(
            ControlVisibility::for_index(5, 5),
            ControlVisibility {
                prev_hidden: false,
                next_hidden: true
            }
        );
        let single = ControlVisibility::for_index(1, 1);
        assert!(single.is_hidden(Direction::Prev) && single.is_hidden(Direction::Next));
    }

    #[test]
    fn color_lookup_is_one_based() {
        let schemes = [ColorScheme::Dark, ColorScheme::Light];
        assert_eq!(current_color(&schemes, 2), Some(ColorScheme::Light));
        assert_eq!(current_color(&schemes, 0), None);
        assert_eq!(current_color(&schemes, 3), None);
    }
}
