//! DOM adapter.
//!
//! Reads the declared attributes of a `.pcards` block, mounts a [`Navigator`]
//! for it, forwards page events (keys, control clicks, `hashchange`, card
//! `transitionend`) into the navigator and writes its outputs back to the
//! page. Unblock timers are plain `setTimeout`s sized from
//! [`NavEvent::TransitionStarted`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent, Window};

use pcards_core::{
    resolve, Capabilities, CardMarkup, Change, Direction, ImageMarkup, Key, KeyEvent, NavEvent,
    Navigator, Outputs, SetupChange, StackMarkup, SubscriptionId,
};

pub const CONTAINER_SELECTOR: &str = ".pcards";
const STACK_SELECTOR: &str = ".pcards-stack";
const CONTROLS_SELECTOR: &str = ".pcards-controls";
const PREV_SELECTOR: &str = ".prev";
const NEXT_SELECTOR: &str = ".next";
const IMAGES_SELECTOR: &str = "figure > img";
const TRANSITION_END_EVENTS: [&str; 2] = ["transitionend", "webkitTransitionEnd"];

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element `{0}`")]
    MissingElement(&'static str),
    #[error("element `{0}` is not an HTML element")]
    NotHtml(&'static str),
    #[error("no card at index {index}")]
    MissingCard { index: usize },
    #[error("no figure for image {index}")]
    MissingFigure { index: usize },
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

fn html(element: Element, selector: &'static str) -> Result<HtmlElement, MountError> {
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::NotHtml(selector))
}

fn find(root: &Element, selector: &'static str) -> Result<HtmlElement, MountError> {
    let element = root
        .query_selector(selector)?
        .ok_or(MountError::MissingElement(selector))?;
    html(element, selector)
}

/// `url("...")` with quotes and backslashes escaped.
fn css_url(src: &str) -> String {
    format!(
        "url(\"{}\")",
        src.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

fn key_event(event: &KeyboardEvent) -> KeyEvent {
    let key = match Key::from_key_name(&event.key()) {
        Key::Other => Key::from_code(event.key_code()),
        key => key,
    };
    KeyEvent {
        key,
        repeat: event.repeat(),
        ctrl: event.ctrl_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

/// Elements of one mounted stack, resolved once.
struct Elements {
    window: Window,
    document: Document,
    container: HtmlElement,
    stack: HtmlElement,
    cards: Vec<Element>,
    controls_root: HtmlElement,
    prev: HtmlElement,
    next: HtmlElement,
    /// `(img, parent figure)` in document order.
    images: Vec<(HtmlImageElement, Element)>,
}

impl Elements {
    fn collect(window: Window, document: Document, container: HtmlElement) -> Result<Self, MountError> {
        let stack = find(&container, STACK_SELECTOR)?;
        let controls_root = find(&container, CONTROLS_SELECTOR)?;
        let prev = find(&controls_root, PREV_SELECTOR)?;
        let next = find(&controls_root, NEXT_SELECTOR)?;

        let children = stack.children();
        let cards = (0..children.length())
            .filter_map(|i| children.item(i))
            .collect();

        let nodes = stack.query_selector_all(IMAGES_SELECTOR)?;
        let images = (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
            .filter_map(|img| {
                let figure = img.parent_element()?;
                Some((img, figure))
            })
            .collect();

        Ok(Self {
            window,
            document,
            container,
            stack,
            cards,
            controls_root,
            prev,
            next,
            images,
        })
    }

    fn card(&self, index: usize) -> Result<&Element, MountError> {
        index
            .checked_sub(1)
            .and_then(|i| self.cards.get(i))
            .ok_or(MountError::MissingCard { index })
    }

    fn figure(&self, index: usize) -> Result<&Element, MountError> {
        self.images
            .get(index)
            .map(|(_, figure)| figure)
            .ok_or(MountError::MissingFigure { index })
    }

    fn read_markup(&self) -> StackMarkup {
        let attr = |name: &str| self.container.get_attribute(name);
        StackMarkup {
            prefix: attr("data-prefix"),
            color: attr("data-color"),
            img_size: attr("data-imgsize"),
            animation: attr("data-animation"),
            cards: self
                .cards
                .iter()
                .map(|card| CardMarkup {
                    color: card.get_attribute("data-color"),
                })
                .collect(),
            images: self
                .images
                .iter()
                .map(|(img, _)| ImageMarkup {
                    src: img.src(),
                    width: img.width(),
                    height: img.height(),
                })
                .collect(),
        }
    }

    fn probe(&self) -> Capabilities {
        let style = self.container.style();
        Capabilities::probe(|name| {
            js_sys::Reflect::get(style.as_ref(), &JsValue::from_str(name))
                .map(|value| !value.is_undefined())
                .unwrap_or(false)
        })
    }

    fn apply_setup(&self, changes: &[SetupChange]) -> Result<(), MountError> {
        for change in changes {
            match change {
                SetupChange::ContainerColor { scheme } => {
                    self.container.set_attribute("data-color", scheme.name())?
                }
                SetupChange::CardColor { card, scheme } => {
                    self.card(*card)?.set_attribute("data-color", scheme.name())?
                }
                SetupChange::ImageSize { size } => {
                    self.container.set_attribute("data-imgsize", size.name())?
                }
                SetupChange::FigureAspect { image, aspect } => {
                    self.figure(*image)?.set_attribute("data-type", aspect.name())?
                }
                SetupChange::FigureBackground { image, src } => {
                    let span = self.document.create_element("span")?;
                    span.set_class_name("dummy");
                    span.set_attribute("style", &format!("background-image: {};", css_url(src)))?;
                    self.figure(*image)?.prepend_with_node_1(&span)?;
                }
                SetupChange::ShowControls => self.controls_root.set_hidden(false),
            }
        }
        Ok(())
    }
}

type Listener = Closure<dyn FnMut(Event)>;

struct Mounted {
    nav: RefCell<Navigator>,
    dom: Elements,
    /// Fade cleanup listeners by subscription.
    subscriptions: RefCell<HashMap<SubscriptionId, (usize, Listener)>>,
    /// Listeners removed from the page but possibly still on the call stack.
    retired: RefCell<Vec<Listener>>,
}

impl Mounted {
    /// Run `f` against the navigator, then apply whatever it produced.
    fn with_nav<R>(self: &Rc<Self>, f: impl FnOnce(&mut Navigator) -> R) -> R {
        self.retired.borrow_mut().clear();
        let (result, outputs) = {
            let mut nav = self.nav.borrow_mut();
            let result = f(&mut nav);
            (result, nav.take_outputs())
        };
        self.apply(&outputs);
        result
    }

    fn apply(self: &Rc<Self>, outputs: &Outputs) {
        for change in &outputs.changes {
            if let Err(err) = self.apply_change(change) {
                warn!(?change, error = %err, "failed to apply change");
            }
        }
        for event in &outputs.events {
            if let NavEvent::TransitionStarted {
                unblock_after_ms, ..
            } = event
            {
                self.schedule_unblock(*unblock_after_ms);
            }
        }
    }

    fn apply_change(self: &Rc<Self>, change: &Change) -> Result<(), MountError> {
        let dom = &self.dom;
        match change {
            Change::ReplaceAddress { href } => dom.window.location().replace(href)?,
            Change::Controls(visibility) => {
                dom.prev.set_hidden(visibility.prev_hidden);
                dom.next.set_hidden(visibility.next_hidden);
            }
            Change::CurrentColor { scheme } => {
                dom.container.set_attribute("data-currentcolor", scheme.name())?
            }
            Change::CardState { card, state } => {
                let element = dom.card(*card)?;
                match state.attr_value() {
                    Some(value) => element.set_attribute("data-state", value)?,
                    None => element.remove_attribute("data-state")?,
                }
            }
            Change::StackTransform { property, value } => {
                dom.stack.style().set_property(property.css_name(), value)?
            }
            Change::Subscribe { card, subscription } => self.subscribe(*card, *subscription)?,
            Change::Unsubscribe { card, subscription } => {
                self.unsubscribe(*card, *subscription)?
            }
            Change::EnableAnimation => dom.container.class_list().add_1("animate")?,
        }
        Ok(())
    }

    fn subscribe(self: &Rc<Self>, card: usize, subscription: SubscriptionId) -> Result<(), MountError> {
        let element = self.dom.card(card)?;
        let weak: Weak<Self> = Rc::downgrade(self);
        let listener = Listener::new(move |_event: Event| {
            if let Some(mounted) = weak.upgrade() {
                mounted.with_nav(|nav| nav.handle_transition_end(card));
            }
        });
        for name in TRANSITION_END_EVENTS {
            element.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        }
        debug!(card, subscription = subscription.0, "transition end listener added");
        self.subscriptions
            .borrow_mut()
            .insert(subscription, (card, listener));
        Ok(())
    }

    fn unsubscribe(&self, card: usize, subscription: SubscriptionId) -> Result<(), MountError> {
        let Some((_, listener)) = self.subscriptions.borrow_mut().remove(&subscription) else {
            return Ok(());
        };
        let element = self.dom.card(card)?;
        for name in TRANSITION_END_EVENTS {
            element.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        }
        debug!(card, subscription = subscription.0, "transition end listener removed");
        // Dropping now could free the closure that is currently running.
        self.retired.borrow_mut().push(listener);
        Ok(())
    }

    fn schedule_unblock(self: &Rc<Self>, delay_ms: f64) {
        let weak = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(mounted) = weak.upgrade() {
                mounted.with_nav(|nav| nav.advance(delay_ms));
            }
        });
        let timeout = delay_ms.round().clamp(0.0, f64::from(i32::MAX)) as i32;
        if let Err(err) = self
            .dom
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
        {
            warn!(error = ?err, "failed to schedule unblock timer");
        }
    }

    /// Page-lifetime listeners. They keep the mount alive.
    fn wire(self: &Rc<Self>) -> Result<(), MountError> {
        let body = self
            .dom
            .document
            .body()
            .ok_or(MountError::MissingElement("body"))?;

        let mounted = Rc::clone(self);
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let key = key_event(&event);
            mounted.with_nav(|nav| nav.handle_key(&key));
        });
        body.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        on_key.forget();

        let mounted = Rc::clone(self);
        let on_hash = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            match mounted.dom.window.location().href() {
                Ok(href) => {
                    mounted.with_nav(|nav| nav.handle_address_change(&href));
                }
                Err(err) => warn!(error = ?err, "could not read location"),
            }
        });
        self.dom
            .window
            .add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref())?;
        on_hash.forget();

        for (button, control) in [(&self.dom.prev, Direction::Prev), (&self.dom.next, Direction::Next)] {
            let mounted = Rc::clone(self);
            let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                mounted.with_nav(|nav| nav.handle_click(control));
            });
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
        }
        Ok(())
    }
}

/// Handle to a stack mounted on the page.
#[wasm_bindgen]
pub struct MountedStack {
    inner: Rc<Mounted>,
}

#[wasm_bindgen]
impl MountedStack {
    #[wasm_bindgen(getter)]
    pub fn current(&self) -> u32 {
        crate::to_u32(self.inner.nav.borrow().current())
    }

    #[wasm_bindgen(getter)]
    pub fn total(&self) -> u32 {
        crate::to_u32(self.inner.nav.borrow().total())
    }

    #[wasm_bindgen(getter)]
    pub fn blocking(&self) -> bool {
        self.inner.nav.borrow().is_blocking()
    }

    /// Show card `index` (1-based), as a deep link would.
    pub fn goto(&self, index: u32) -> bool {
        self.inner
            .with_nav(|nav| nav.request_card(index as usize, false))
    }

    pub fn prev(&self) -> bool {
        self.inner.with_nav(|nav| nav.handle_click(Direction::Prev))
    }

    pub fn next(&self) -> bool {
        self.inner.with_nav(|nav| nav.handle_click(Direction::Next))
    }
}

/// Mount the first element matching `selector`.
pub fn mount(selector: &str) -> Result<MountedStack, MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let document = window.document().ok_or(MountError::NoDocument)?;
    let container = document
        .query_selector(selector)?
        .ok_or(MountError::MissingElement(CONTAINER_SELECTOR))?;
    let container = html(container, CONTAINER_SELECTOR)?;
    let href = window.location().href()?;

    let dom = Elements::collect(window, document, container)?;
    let setup = resolve(&dom.read_markup(), &dom.probe());
    dom.apply_setup(&setup.changes)?;
    info!(
        cards = setup.config.total(),
        mode = setup.config.mode.name(),
        prefix = %setup.config.prefix,
        "card stack mounted"
    );

    let mounted = Rc::new(Mounted {
        nav: RefCell::new(Navigator::new(setup.config, &href)),
        dom,
        subscriptions: RefCell::new(HashMap::new()),
        retired: RefCell::new(Vec::new()),
    });
    mounted.with_nav(|nav| nav.start());
    mounted.wire()?;
    Ok(MountedStack { inner: mounted })
}
