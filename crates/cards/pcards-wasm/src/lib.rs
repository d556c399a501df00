//! wasm-bindgen interface for pcards.
//!
//! Two ways in:
//! - [`mount`] / [`auto_mount`] take over a `.pcards` block on the page and
//!   drive it entirely from Rust (see [`dom`]).
//! - [`PcardsNavigator`] exposes the core navigator with JSON inputs and
//!   outputs for hosts that render the stack themselves.

use std::sync::Once;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use pcards_core::{
    resolve, Capabilities, HostEvent, Inputs, Navigator, StackConfig, StackMarkup,
};

pub mod dom;

pub use dom::{MountError, MountedStack};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Install the panic hook and the console tracing layer (idempotent).
pub(crate) fn init_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}

fn capabilities_from(caps: JsValue) -> Result<Capabilities, JsError> {
    if jsvalue_is_undefined_or_null(&caps) {
        Ok(Capabilities::full())
    } else {
        swb::from_value(caps).map_err(|e| JsError::new(&format!("capabilities error: {e}")))
    }
}

fn markup_from(markup: JsValue) -> Result<StackMarkup, JsError> {
    if jsvalue_is_undefined_or_null(&markup) {
        return Err(JsError::new("markup is null/undefined"));
    }
    swb::from_value(markup).map_err(|e| JsError::new(&format!("markup error: {e}")))
}

#[wasm_bindgen]
pub struct PcardsNavigator {
    core: Navigator,
}

#[wasm_bindgen]
impl PcardsNavigator {
    /// Create a navigator from a JSON `StackConfig` (undefined/null for an
    /// empty stack) and the current page address.
    /// Example:
    ///   new PcardsNavigator({ card_colors: ["dark", "light"], mode: "fade" }, location.href)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, href: String) -> Result<PcardsNavigator, JsError> {
        init_once();
        let cfg: StackConfig = if jsvalue_is_undefined_or_null(&config) {
            StackConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        Ok(PcardsNavigator {
            core: Navigator::new(cfg, &href),
        })
    }

    /// Create a navigator from declared markup attributes. `caps` is optional
    /// JSON matching `Capabilities`; undefined means full support.
    #[wasm_bindgen(js_name = from_markup)]
    pub fn from_markup(
        markup: JsValue,
        caps: JsValue,
        href: String,
    ) -> Result<PcardsNavigator, JsError> {
        init_once();
        let setup = resolve(&markup_from(markup)?, &capabilities_from(caps)?);
        Ok(PcardsNavigator {
            core: Navigator::new(setup.config, &href),
        })
    }

    /// Show the initial card. Returns Outputs JSON.
    pub fn start(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.update(0.0, Inputs::single(HostEvent::Start));
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Step by `dt_ms` milliseconds, then apply inputs JSON
    /// (`{ events: [...] }`, undefined for none). Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out = self.core.update(dt_ms, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Request card `index` (1-based) directly. Outputs accumulate until the
    /// next `update`/`take_outputs`.
    #[wasm_bindgen(js_name = request_card)]
    pub fn request_card(&mut self, index: u32) -> bool {
        self.core.request_card(index as usize, false)
    }

    /// Drain outputs accumulated by direct calls.
    #[wasm_bindgen(js_name = take_outputs)]
    pub fn take_outputs(&mut self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.take_outputs())
            .map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// `{ current, total, blocking }`.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.snapshot())
            .map_err(|e| JsError::new(&format!("snapshot error: {e}")))
    }

    #[wasm_bindgen(getter)]
    pub fn current(&self) -> u32 {
        to_u32(self.core.current())
    }

    #[wasm_bindgen(getter)]
    pub fn total(&self) -> u32 {
        to_u32(self.core.total())
    }

    #[wasm_bindgen(getter)]
    pub fn blocking(&self) -> bool {
        self.core.is_blocking()
    }
}

/// Validate markup attributes without building a navigator. Returns Setup
/// JSON (`{ config, img_size, changes }`).
#[wasm_bindgen(js_name = resolve_markup)]
pub fn resolve_markup(markup: JsValue, caps: JsValue) -> Result<JsValue, JsError> {
    let setup = resolve(&markup_from(markup)?, &capabilities_from(caps)?);
    swb::to_value(&setup).map_err(|e| JsError::new(&format!("setup error: {e}")))
}

/// Take over the first element matching `selector` (default `.pcards`).
#[wasm_bindgen]
pub fn mount(selector: Option<String>) -> Result<MountedStack, JsError> {
    init_once();
    let selector = selector.as_deref().unwrap_or(dom::CONTAINER_SELECTOR);
    dom::mount(selector).map_err(|e| JsError::new(&e.to_string()))
}

/// Mount the page's `.pcards` block if there is one. Pages without a stack
/// are left alone.
#[wasm_bindgen(js_name = auto_mount)]
pub fn auto_mount() -> Option<MountedStack> {
    init_once();
    match dom::mount(dom::CONTAINER_SELECTOR) {
        Ok(stack) => Some(stack),
        Err(err) => {
            tracing::info!(error = %err, "no card stack mounted");
            None
        }
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
