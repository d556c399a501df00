//! pcards core (host-agnostic)
//!
//! Navigation and transition state machine for a fixed stack of cards, of
//! which exactly one is shown at a time. Hosts (the wasm DOM adapter, tests,
//! JS-driven integrations) feed host events and elapsed time into a
//! [`Navigator`] and apply the [`Change`]s it reports.
//!
//! Setup glue (attribute validation, capability probing, image aspect
//! classification) lives in [`attrs`], [`capability`], [`image`] and
//! [`setup`], and is consumed once before the navigator is built.

pub mod attrs;
pub mod capability;
pub mod config;
pub mod error;
pub mod ids;
pub mod image;
pub mod inputs;
pub mod link;
pub mod navigator;
pub mod outputs;
pub mod reflect;
pub mod setup;

// Re-exports for consumers (adapters)
pub use attrs::{hash_prefix, ColorScheme, Validated, DEFAULT_PREFIX};
pub use capability::{AnimationMode, AnimationPreference, Capabilities, TransformProperty};
pub use config::{StackConfig, Timing};
pub use error::{ConfigError, Rejection};
pub use ids::SubscriptionId;
pub use image::{Aspect, ImageSize};
pub use inputs::{click_target, key_target, Direction, HostEvent, Inputs, Key, KeyEvent};
pub use link::{AddressSync, LinkInfo, LinkPattern};
pub use navigator::{NavigationSnapshot, Navigator};
pub use outputs::{Change, NavEvent, Outputs};
pub use reflect::{CardState, ControlVisibility};
pub use setup::{resolve, CardMarkup, ImageMarkup, Setup, SetupChange, StackMarkup};
