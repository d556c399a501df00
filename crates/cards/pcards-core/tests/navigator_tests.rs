use pcards_core::{
    AnimationMode, CardState, Change, ControlVisibility, Direction, HostEvent, Inputs, Key,
    KeyEvent, NavEvent, Navigator, Rejection, StackConfig, SubscriptionId, TransformProperty,
};

fn init_tracing() {
    let default_filter = "pcards_core=debug";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn config(total: usize, mode: AnimationMode) -> StackConfig {
    let transform = (mode == AnimationMode::Slide).then_some(TransformProperty::Standard);
    StackConfig::with_cards(total).with_mode(mode, transform)
}

/// Navigator showing its initial card, idle, with outputs drained.
fn started(total: usize, mode: AnimationMode) -> Navigator {
    let mut nav = Navigator::new(config(total, mode), "https://example.test/gallery");
    assert!(nav.start());
    nav.advance(1_000.0);
    nav.take_outputs();
    nav
}

fn delay_for(mode: AnimationMode) -> f64 {
    match mode {
        AnimationMode::Slide => 250.0,
        _ => 150.0,
    }
}

const MODES: [AnimationMode; 3] = [AnimationMode::None, AnimationMode::Fade, AnimationMode::Slide];

#[test]
fn request_moves_once_and_unblocks_after_mode_delay() {
    init_tracing();
    for mode in MODES {
        for total in 1..=6 {
            for target in 1..=total {
                let mut nav = started(total, mode);
                assert!(nav.request_card(target, false), "{mode:?} {target}/{total}");
                assert_eq!(nav.current(), target);
                assert!(nav.is_blocking());

                nav.advance(delay_for(mode) - 1.0);
                assert!(nav.is_blocking(), "{mode:?} unblocked early");
                nav.advance(1.0);
                assert!(!nav.is_blocking());
                assert_eq!(nav.current(), target);

                let started_count = nav
                    .outputs()
                    .events
                    .iter()
                    .filter(|e| matches!(e, NavEvent::TransitionStarted { .. }))
                    .count();
                assert_eq!(started_count, 1);
            }
        }
    }
}

#[test]
fn requests_during_transition_are_dropped() {
    for mode in MODES {
        let mut nav = started(5, mode);
        assert!(nav.request_card(2, false));
        assert!(!nav.request_card(4, false));
        assert!(!nav.handle_key(&KeyEvent::plain(Key::ArrowRight)));
        assert_eq!(nav.current(), 2);
        assert!(nav.outputs().events.contains(&NavEvent::RequestDropped {
            target: 4,
            reason: Rejection::Busy,
        }));

        nav.advance(delay_for(mode));
        assert!(nav.request_card(4, false));
        assert_eq!(nav.current(), 4);
    }
}

#[test]
fn out_of_range_targets_change_nothing() {
    let mut nav = started(5, AnimationMode::Fade);
    for target in [0, 6] {
        assert_eq!(
            nav.try_request(target, false),
            Err(Rejection::MissingTarget { index: target })
        );
        assert!(!nav.request_card(target, false));
        assert_eq!(nav.current(), 1);
        assert!(!nav.is_blocking());
    }
    assert!(nav.outputs().changes.is_empty());
}

#[test]
fn initial_request_leaves_address_alone() {
    let mut nav = Navigator::new(config(5, AnimationMode::None), "/p#card3");
    assert!(nav.start());
    assert_eq!(nav.current(), 3);
    let changes = &nav.outputs().changes;
    assert!(!changes
        .iter()
        .any(|c| matches!(c, Change::ReplaceAddress { .. })));
    assert!(changes.contains(&Change::Controls(ControlVisibility {
        prev_hidden: false,
        next_hidden: false,
    })));
    assert!(changes.contains(&Change::CardState {
        card: 3,
        state: CardState::Open,
    }));
}

#[test]
fn navigation_replaces_address_and_swallows_echo() {
    let mut nav = started(5, AnimationMode::None);
    assert!(nav.request_card(2, false));
    assert_eq!(
        nav.outputs().changes[0],
        Change::ReplaceAddress {
            href: "https://example.test/gallery#card2".into()
        }
    );
    nav.advance(150.0);

    // the replace we asked for comes back once as an external change
    assert!(!nav.handle_address_change("https://example.test/gallery#card2"));
    assert_eq!(nav.current(), 2);

    // a manual edit afterwards is honored
    assert!(nav.handle_address_change("https://example.test/gallery#card4"));
    assert_eq!(nav.current(), 4);
    nav.advance(150.0);

    // non-card fragments are ignored
    assert!(!nav.handle_address_change("https://example.test/gallery#comments"));
    assert_eq!(nav.current(), 4);
}

#[test]
fn none_mode_swaps_card_states_immediately() {
    let mut nav = started(4, AnimationMode::None);
    assert!(nav.request_card(3, false));
    assert_eq!(nav.card_state(1), Some(CardState::Hidden));
    assert_eq!(nav.card_state(3), Some(CardState::Open));
    let states: Vec<_> = nav
        .outputs()
        .changes
        .iter()
        .filter(|c| matches!(c, Change::CardState { .. }))
        .cloned()
        .collect();
    assert_eq!(
        states,
        vec![
            Change::CardState {
                card: 3,
                state: CardState::Open
            },
            Change::CardState {
                card: 1,
                state: CardState::Hidden
            },
        ]
    );
}

#[test]
fn rerequesting_current_card_keeps_it_open() {
    for mode in [AnimationMode::None, AnimationMode::Fade] {
        let mut nav = started(3, mode);
        assert!(nav.request_card(1, false));
        assert_eq!(nav.card_state(1), Some(CardState::Open));
        assert!(!nav.has_subscription(1));
    }
}

#[test]
fn fade_closes_previous_and_cleans_up_on_transition_end() {
    let mut nav = started(3, AnimationMode::Fade);
    assert!(nav.request_card(2, false));
    assert_eq!(nav.card_state(1), Some(CardState::Closing));
    assert_eq!(nav.card_state(2), Some(CardState::Open));
    assert!(nav.has_subscription(1));
    let subscription = nav
        .outputs()
        .changes
        .iter()
        .find_map(|c| match c {
            Change::Subscribe { card: 1, subscription } => Some(*subscription),
            _ => None,
        })
        .expect("fade registers a cleanup listener");

    // unblocking does not depend on the transition end
    nav.advance(150.0);
    assert!(!nav.is_blocking());
    assert_eq!(nav.card_state(1), Some(CardState::Closing));

    nav.take_outputs();
    nav.handle_transition_end(1);
    assert_eq!(nav.card_state(1), Some(CardState::Hidden));
    assert!(!nav.has_subscription(1));
    assert_eq!(
        nav.outputs().changes,
        vec![
            Change::Unsubscribe {
                card: 1,
                subscription
            },
            Change::CardState {
                card: 1,
                state: CardState::Hidden
            },
        ]
    );

    // a second notification, or one for a card without a listener, is inert
    nav.take_outputs();
    nav.handle_transition_end(1);
    nav.handle_transition_end(2);
    assert!(nav.outputs().is_empty());
}

#[test]
fn reopening_a_closing_card_cancels_its_cleanup() {
    let mut nav = started(3, AnimationMode::Fade);
    assert!(nav.request_card(2, false));
    nav.advance(150.0);
    nav.take_outputs();

    assert!(nav.request_card(1, false));
    assert!(!nav.has_subscription(1));
    assert!(nav.has_subscription(2));
    assert!(nav.outputs().changes.contains(&Change::Unsubscribe {
        card: 1,
        subscription: SubscriptionId(0),
    }));
    assert_eq!(nav.card_state(1), Some(CardState::Open));
    assert_eq!(nav.card_state(2), Some(CardState::Closing));

    // the fade-in of card 1 ending must not touch it
    nav.handle_transition_end(1);
    assert_eq!(nav.card_state(1), Some(CardState::Open));
}

#[test]
fn repeated_fades_hold_one_listener_per_card() {
    let mut nav = started(2, AnimationMode::Fade);
    for _ in 0..5 {
        let next = if nav.current() == 1 { 2 } else { 1 };
        assert!(nav.request_card(next, false));
        nav.advance(150.0);
    }
    let changes = nav.take_outputs().changes;
    let count = |pred: fn(&Change) -> bool| changes.iter().filter(|c| pred(c)).count();
    assert_eq!(count(|c| matches!(c, Change::Subscribe { .. })), 5);
    // each re-opened card had its pending cleanup cancelled
    assert_eq!(count(|c| matches!(c, Change::Unsubscribe { .. })), 4);
    assert!(nav.has_subscription(1) ^ nav.has_subscription(2));
}

#[test]
fn animation_is_enabled_once_after_first_paint() {
    let mut fade = Navigator::new(config(3, AnimationMode::Fade), "/p");
    assert!(fade.start());
    assert!(!fade.animation_enabled());
    fade.advance(150.0);
    assert!(fade.animation_enabled());
    assert!(fade.outputs().changes.contains(&Change::EnableAnimation));

    fade.take_outputs();
    assert!(fade.request_card(2, false));
    fade.advance(150.0);
    assert!(!fade.outputs().changes.contains(&Change::EnableAnimation));

    let mut plain = Navigator::new(config(3, AnimationMode::None), "/p");
    assert!(plain.start());
    plain.advance(150.0);
    assert!(!plain.animation_enabled());
    assert!(!plain.outputs().changes.contains(&Change::EnableAnimation));
}

#[test]
fn slide_moves_the_strip_without_card_states() {
    let mut nav = started(5, AnimationMode::Slide);
    assert!(nav.request_card(3, false));
    assert!(nav.outputs().changes.contains(&Change::StackTransform {
        property: TransformProperty::Standard,
        value: "translateX(-200%)".into(),
    }));
    assert_eq!(nav.card_state(3), Some(CardState::Hidden));
    nav.advance(150.0);
    assert!(nav.is_blocking());
    nav.advance(100.0);
    assert!(!nav.is_blocking());
}

#[test]
fn hidden_controls_ignore_clicks() {
    let mut nav = started(3, AnimationMode::None);
    assert!(nav.controls().prev_hidden);
    assert!(!nav.handle_click(Direction::Prev));
    assert!(nav.outputs().is_empty());
    assert!(nav.handle_click(Direction::Next));
    assert_eq!(nav.current(), 2);
}

#[test]
fn update_advances_then_dispatches() {
    init_tracing();
    let mut nav = Navigator::new(config(3, AnimationMode::None), "/p");

    let out = nav.update(0.0, Inputs::single(HostEvent::Start));
    assert!(matches!(
        out.events[0],
        NavEvent::TransitionStarted {
            to: 1,
            initial: true,
            ..
        }
    ));
    assert_eq!(out.unblock_after_ms(), Some(150.0));

    let out = nav.update(
        150.0,
        Inputs {
            events: vec![
                HostEvent::Key(KeyEvent::plain(Key::ArrowDown)),
                HostEvent::Key(KeyEvent::plain(Key::ArrowDown)),
            ],
        },
    );
    assert_eq!(out.events[0], NavEvent::TransitionSettled { current: 1 });
    assert!(out.events.contains(&NavEvent::RequestDropped {
        target: 3,
        reason: Rejection::Busy,
    }));
    assert_eq!(nav.current(), 2);

    // outputs only hold what the latest update produced
    let out = nav.update(10.0, Inputs::default());
    assert!(out.is_empty());

    let out = nav.update(
        140.0,
        Inputs::single(HostEvent::Goto { index: 3 }),
    );
    assert!(out
        .changes
        .contains(&Change::ReplaceAddress { href: "/p#card3".into() }));
    assert_eq!(nav.snapshot().current, 3);
    assert!(nav.snapshot().blocking);
}
