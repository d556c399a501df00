//! Navigator: the card navigation and transition state machine.
//!
//! The navigator is `Idle` or `Transitioning`. [`Navigator::request_card`] is
//! the only way `current` changes; every input source (keys, clicks, address
//! changes, programmatic requests) funnels into it. A request that arrives
//! while a transition is in flight is dropped, not queued.
//!
//! The blocking window is a timer ([`crate::Timing`]) advanced by the host,
//! not a wait for the renderer to finish. In fade mode the end of the leaving
//! card's CSS transition is observed only to clear its `closing` state.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::capability::{AnimationMode, TransformProperty};
use crate::config::StackConfig;
use crate::error::Rejection;
use crate::ids::{IdAllocator, SubscriptionId};
use crate::inputs::{click_target, key_target, Direction, HostEvent, Inputs, KeyEvent};
use crate::link::{AddressSync, LinkInfo, LinkPattern};
use crate::outputs::{Change, NavEvent, Outputs};
use crate::reflect::{current_color, CardState, ControlVisibility};

/// Read-only view of the navigation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    pub current: usize,
    pub total: usize,
    pub blocking: bool,
}

#[derive(Clone, Copy, Debug)]
struct NavigationState {
    current: usize,
    blocking: bool,
}

#[derive(Clone, Copy, Debug)]
struct UnblockTimer {
    remaining_ms: f64,
    initial: bool,
}

/// Percentage the strip moves left to show card `target`.
#[inline]
pub fn slide_offset_percent(target: usize) -> usize {
    target.saturating_sub(1) * 100
}

/// Transform value placing card `target` in view.
pub fn slide_transform(target: usize) -> String {
    format!("translateX(-{}%)", slide_offset_percent(target))
}

#[derive(Debug)]
pub struct Navigator {
    cfg: StackConfig,
    state: NavigationState,
    cards: Vec<CardState>,
    controls: ControlVisibility,
    address: AddressSync,
    timer: Option<UnblockTimer>,
    /// Live fade cleanup subscriptions, at most one per card.
    fade_subs: HashMap<usize, SubscriptionId>,
    ids: IdAllocator,
    animation_enabled: bool,
    outputs: Outputs,
}

impl Navigator {
    /// Build a navigator for the page at `href`. `current` is seeded from the
    /// address; nothing is shown until [`Navigator::start`].
    pub fn new(cfg: StackConfig, href: &str) -> Self {
        let cfg = cfg.normalized();
        let total = cfg.total();
        let address = AddressSync::new(LinkPattern::new(cfg.prefix.clone()), href);
        let current = address.link(total).requested;
        debug!(total, current, mode = cfg.mode.name(), "navigator created");
        Self {
            state: NavigationState {
                current,
                blocking: false,
            },
            cards: vec![CardState::Hidden; total],
            controls: ControlVisibility::default(),
            address,
            timer: None,
            fade_subs: HashMap::new(),
            ids: IdAllocator::new(),
            animation_enabled: false,
            outputs: Outputs::default(),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &StackConfig {
        &self.cfg
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.state.current
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.state.blocking
    }

    #[inline]
    pub fn mode(&self) -> AnimationMode {
        self.cfg.mode
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            current: self.state.current,
            total: self.total(),
            blocking: self.state.blocking,
        }
    }

    #[inline]
    pub fn controls(&self) -> ControlVisibility {
        self.controls
    }

    /// Rendering state of card `index` (1-based).
    pub fn card_state(&self, index: usize) -> Option<CardState> {
        self.cards.get(index.checked_sub(1)?).copied()
    }

    /// Whether card `index` still has a fade cleanup listener.
    pub fn has_subscription(&self, index: usize) -> bool {
        self.fade_subs.contains_key(&index)
    }

    #[inline]
    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    /// Parse the current address against the card-link pattern.
    pub fn link(&self) -> LinkInfo {
        self.address.link(self.total())
    }

    #[inline]
    pub fn href(&self) -> &str {
        self.address.href()
    }

    /// Outputs accumulated since the last `update` or `take_outputs`.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    /// Show the card seeded from the address, without rewriting the address.
    pub fn start(&mut self) -> bool {
        self.request_card(self.state.current, true)
    }

    /// Step by `dt_ms`, then apply `inputs` in order. Outputs are cleared
    /// first and hold only what this call produced.
    pub fn update(&mut self, dt_ms: f64, inputs: Inputs) -> &Outputs {
        self.outputs.clear();
        self.advance(dt_ms);
        for event in inputs.events {
            self.dispatch(event);
        }
        &self.outputs
    }

    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Start => {
                self.start();
            }
            HostEvent::Key(key) => {
                self.handle_key(&key);
            }
            HostEvent::Click { control } => {
                self.handle_click(control);
            }
            HostEvent::AddressChanged { href } => {
                self.handle_address_change(&href);
            }
            HostEvent::TransitionEnd { card } => self.handle_transition_end(card),
            HostEvent::Goto { index } => {
                self.request_card(index, false);
            }
        }
    }

    /// Request card `target`. Returns whether the transition started; drops
    /// are logged and reported as [`NavEvent::RequestDropped`].
    pub fn request_card(&mut self, target: usize, initial: bool) -> bool {
        match self.try_request(target, initial) {
            Ok(()) => true,
            Err(reason) => {
                debug!(target, initial, %reason, "navigation request dropped");
                self.outputs
                    .push_event(NavEvent::RequestDropped { target, reason });
                false
            }
        }
    }

    /// Like [`Navigator::request_card`] but returns the rejection instead of
    /// reporting it.
    pub fn try_request(&mut self, target: usize, initial: bool) -> Result<(), Rejection> {
        if self.state.blocking {
            return Err(Rejection::Busy);
        }
        if self.card_state(target).is_none() {
            return Err(Rejection::MissingTarget { index: target });
        }
        let previous = self.state.current;
        if !initial && self.card_state(previous).is_none() {
            return Err(Rejection::MissingCurrent { index: previous });
        }

        self.state.blocking = true;
        self.state.current = target;
        if !initial {
            self.reflect_address(target);
        }
        self.reflect_controls();
        self.reflect_color();

        // Re-requesting the shown card must not clear or close it.
        let leaving = (!initial && previous != target).then_some(previous);
        let mode = self.cfg.mode;
        match mode {
            AnimationMode::None => {
                self.cancel_fade(target);
                self.set_card_state(target, CardState::Open);
                if let Some(prev) = leaving {
                    self.set_card_state(prev, CardState::Hidden);
                }
            }
            AnimationMode::Fade => {
                if let Some(prev) = leaving {
                    self.set_card_state(prev, CardState::Closing);
                    self.subscribe_fade(prev);
                }
                self.cancel_fade(target);
                self.set_card_state(target, CardState::Open);
            }
            AnimationMode::Slide => {
                let property = self.cfg.transform.unwrap_or(TransformProperty::Standard);
                self.outputs.push_change(Change::StackTransform {
                    property,
                    value: slide_transform(target),
                });
            }
        }

        let delay = self.cfg.timing.delay_for(mode);
        self.timer = Some(UnblockTimer {
            remaining_ms: delay,
            initial,
        });
        debug!(from = ?leaving, to = target, initial, mode = mode.name(), "transition started");
        self.outputs.push_event(NavEvent::TransitionStarted {
            from: leaving,
            to: target,
            mode,
            initial,
            unblock_after_ms: delay,
        });
        Ok(())
    }

    /// Let `dt_ms` of host time pass. Closes the blocking window once the
    /// transition's delay has fully elapsed.
    pub fn advance(&mut self, dt_ms: f64) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        timer.remaining_ms -= dt_ms.max(0.0);
        if timer.remaining_ms > 0.0 {
            trace!(remaining_ms = timer.remaining_ms, "transition still blocking");
            return;
        }
        let initial = timer.initial;
        self.timer = None;
        self.state.blocking = false;
        if initial && self.cfg.mode != AnimationMode::None && !self.animation_enabled {
            self.animation_enabled = true;
            self.outputs.push_change(Change::EnableAnimation);
        }
        debug!(current = self.state.current, "transition settled");
        self.outputs.push_event(NavEvent::TransitionSettled {
            current: self.state.current,
        });
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match key_target(event, &self.snapshot()) {
            Some(target) => self.request_card(target, false),
            None => false,
        }
    }

    pub fn handle_click(&mut self, control: Direction) -> bool {
        match click_target(control, &self.controls, &self.snapshot()) {
            Some(target) => self.request_card(target, false),
            None => false,
        }
    }

    /// External address change. Self-inflicted changes are swallowed once;
    /// addresses that are not card links are ignored.
    pub fn handle_address_change(&mut self, href: &str) -> bool {
        let total = self.total();
        match self.address.on_external_change(href, total) {
            Some(target) => self.request_card(target, false),
            None => false,
        }
    }

    /// End of a card's CSS transition. Only cards with a live fade
    /// subscription react; the subscription is consumed.
    pub fn handle_transition_end(&mut self, card: usize) {
        let Some(subscription) = self.fade_subs.remove(&card) else {
            return;
        };
        self.outputs
            .push_change(Change::Unsubscribe { card, subscription });
        if self.card_state(card) == Some(CardState::Closing) {
            self.set_card_state(card, CardState::Hidden);
        }
    }

    fn reflect_address(&mut self, index: usize) {
        if let Some(href) = self.address.write(index) {
            self.outputs.push_change(Change::ReplaceAddress { href });
        }
    }

    fn reflect_controls(&mut self) {
        self.controls = ControlVisibility::for_index(self.state.current, self.total());
        self.outputs.push_change(Change::Controls(self.controls));
    }

    fn reflect_color(&mut self) {
        if let Some(scheme) = current_color(&self.cfg.card_colors, self.state.current) {
            self.outputs.push_change(Change::CurrentColor { scheme });
        }
    }

    fn set_card_state(&mut self, card: usize, state: CardState) {
        if let Some(slot) = card.checked_sub(1).and_then(|i| self.cards.get_mut(i)) {
            *slot = state;
            self.outputs.push_change(Change::CardState { card, state });
        }
    }

    fn subscribe_fade(&mut self, card: usize) {
        self.cancel_fade(card);
        let subscription = self.ids.alloc_subscription();
        self.fade_subs.insert(card, subscription);
        self.outputs
            .push_change(Change::Subscribe { card, subscription });
    }

    fn cancel_fade(&mut self, card: usize) {
        if let Some(subscription) = self.fade_subs.remove(&card) {
            trace!(card, subscription = subscription.0, "fade cleanup cancelled");
            self.outputs
                .push_change(Change::Unsubscribe { card, subscription });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_offsets() {
        assert_eq!(slide_offset_percent(1), 0);
        assert_eq!(slide_offset_percent(3), 200);
        assert_eq!(slide_transform(3), "translateX(-200%)");
    }

    #[test]
    fn empty_stack_is_inert() {
        let mut nav = Navigator::new(StackConfig::with_cards(0), "/p#card2");
        assert!(!nav.start());
        assert!(!nav.is_blocking());
        assert!(nav.outputs().changes.is_empty());
        assert_eq!(
            nav.outputs().events,
            vec![NavEvent::RequestDropped {
                target: 1,
                reason: Rejection::MissingTarget { index: 1 }
            }]
        );
    }
}
