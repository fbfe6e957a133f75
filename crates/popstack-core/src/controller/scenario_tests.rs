//! Controller scenarios
//!
//! These tests verify that:
//! - Each queue operation mutates, shows and emits per its contract
//! - The transition controller always shows the queue front
//! - Self-dismiss, input-channel and engine routing reach the controller
//! - Unknown hide targets are reported without side effects

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::popup::{Overlay, Popup};
use crate::transition::StepKind;

/// Observable output of a controller under test
struct Harness {
    controller: PopupController,
    transition: HeadlessTransition,
    engine: Engine,
    events: Rc<RefCell<Vec<PopupEvent>>>,
    errors: Rc<RefCell<Vec<ErrorReport>>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_options(PopupOptions::default())
    }

    fn with_options(options: PopupOptions) -> Self {
        let transition = HeadlessTransition::new();
        let engine = Engine::new();
        let controller = PopupController::builder()
            .options(options)
            .transition(transition.clone())
            .engine(engine.clone())
            .build()
            .expect("controller builds");

        let events = Rc::new(RefCell::new(Vec::new()));
        for topic in [topics::POPUP, topics::HIDE] {
            let sink = Rc::clone(&events);
            controller.on(topic, move |event| sink.borrow_mut().push(event.clone()));
        }

        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        engine.on_error(move |report| sink.borrow_mut().push(report.clone()));

        Self {
            controller,
            transition,
            engine,
            events,
            errors,
        }
    }

    /// Drain recorded events
    fn take_events(&self) -> Vec<PopupEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn assert_shown_is_front(&self) {
        assert_eq!(self.controller.shown(), self.controller.front());
        assert_eq!(self.transition.shown(), self.controller.front());
    }
}

fn popup(label: &str) -> PopupRef {
    PopupRef::new(Overlay::new(label))
}

fn shown(p: &PopupRef) -> PopupEvent {
    PopupEvent::Popup(p.clone())
}

fn hidden(p: &PopupRef) -> PopupEvent {
    PopupEvent::Hide(Some(p.clone()))
}

// =============================================================================
// push
// =============================================================================

#[test]
fn test_push_on_empty_shows_and_emits_once() {
    let h = Harness::new();
    let a = popup("a");

    h.controller.push(a.clone());

    assert_eq!(h.take_events(), vec![shown(&a)]);
    assert_eq!(h.controller.len(), 1);
    h.assert_shown_is_front();
}

#[test]
fn test_push_on_non_empty_appends_silently() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");
    h.controller.push(a.clone());
    h.take_events();

    h.controller.push(b.clone());

    assert!(h.take_events().is_empty());
    assert_eq!(h.controller.popups(), vec![a.clone(), b]);
    assert_eq!(h.controller.front(), Some(a));
    h.assert_shown_is_front();
}

#[test]
fn test_push_same_popup_twice_keeps_both() {
    let h = Harness::new();
    let a = popup("a");
    h.controller.push(a.clone());
    h.controller.push(a.clone());

    assert_eq!(h.controller.len(), 2);
    assert_eq!(h.take_events(), vec![shown(&a)]);
}

// =============================================================================
// unshift
// =============================================================================

#[test]
fn test_unshift_always_shows_new_front() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");

    h.controller.unshift(a.clone());
    h.controller.unshift(b.clone());

    assert_eq!(h.take_events(), vec![shown(&a), shown(&b)]);
    assert_eq!(h.controller.popups(), vec![b, a]);
    h.assert_shown_is_front();
}

#[test]
fn test_unshift_current_front_is_not_suppressed() {
    let h = Harness::new();
    let a = popup("a");
    h.controller.push(a.clone());
    h.controller.unshift(a.clone());

    assert_eq!(h.take_events(), vec![shown(&a), shown(&a)]);
    assert_eq!(h.controller.len(), 2);
}

// =============================================================================
// swap
// =============================================================================

#[test]
fn test_swap_replaces_front_keeping_length() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");
    let c = popup("c");
    h.controller.push(a.clone());
    h.controller.push(b.clone());
    h.take_events();

    h.controller.swap(c.clone());

    assert_eq!(h.controller.popups(), vec![c.clone(), b]);
    assert!(!h.controller.contains(&a));
    h.assert_shown_is_front();

    // The replaced popup leaves the queue without a hide event. This mirrors
    // long-standing behavior; listeners that track membership must treat a
    // popup event as implying the previous front is gone.
    assert_eq!(h.take_events(), vec![shown(&c)]);
}

#[test]
fn test_swap_on_empty_behaves_like_push() {
    let h = Harness::new();
    let a = popup("a");

    h.controller.swap(a.clone());

    assert_eq!(h.controller.len(), 1);
    assert_eq!(h.take_events(), vec![shown(&a)]);
    h.assert_shown_is_front();
}

// =============================================================================
// hide
// =============================================================================

#[test]
fn test_hide_front_promotes_next() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");
    h.controller.push(a.clone());
    h.controller.push(b.clone());
    h.take_events();

    assert_eq!(h.controller.hide(None), Some(a.clone()));

    assert_eq!(h.take_events(), vec![hidden(&a), shown(&b)]);
    assert_eq!(h.controller.popups(), vec![b]);
    h.assert_shown_is_front();
}

#[test]
fn test_hide_last_popup_hides_transition() {
    let h = Harness::new();
    let a = popup("a");
    h.controller.push(a.clone());
    h.take_events();

    h.controller.hide(None);

    assert_eq!(h.take_events(), vec![hidden(&a)]);
    assert!(h.controller.is_empty());
    assert!(h.controller.shown().is_none());
    assert_eq!(
        h.transition.steps().last().map(|s| s.kind),
        Some(StepKind::Exit)
    );
}

#[test]
fn test_hide_unknown_target_reports_error_only() {
    let h = Harness::new();
    let a = popup("a");
    let stranger = popup("stranger");
    h.controller.push(a.clone());
    h.take_events();

    assert_eq!(h.controller.hide(Some(&stranger)), None);

    assert!(h.take_events().is_empty());
    assert_eq!(h.controller.popups(), vec![a]);
    let errors = h.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].target, ERROR_TARGET);
    assert_eq!(errors[0].data, Some(stranger));
    assert!(errors[0].message.contains("couldn't find popup"));
}

#[test]
fn test_try_hide_unknown_target_returns_error() {
    let h = Harness::new();
    h.controller.push(popup("a"));

    let result = h.controller.try_hide(Some(&popup("ghost")));

    assert!(matches!(result, Err(PopupError::TargetNotFound(label)) if label == "ghost"));
    assert!(h.errors.borrow().is_empty());
}

#[test]
fn test_hide_non_front_target_keeps_front() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");
    let c = popup("c");
    for p in [&a, &b, &c] {
        h.controller.push(p.clone());
    }
    h.take_events();
    let steps_before = h.transition.steps().len();

    h.controller.hide(Some(&b));

    assert_eq!(h.take_events(), vec![hidden(&b)]);
    assert_eq!(h.controller.popups(), vec![a, c]);
    assert_eq!(h.transition.steps().len(), steps_before);
    h.assert_shown_is_front();
}

#[test]
fn test_hide_target_removes_first_occurrence() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");
    h.controller.push(a.clone());
    h.controller.push(b.clone());
    h.controller.push(a.clone());
    h.take_events();

    h.controller.hide(Some(&a));

    assert_eq!(h.controller.popups(), vec![b.clone(), a.clone()]);
    assert_eq!(h.take_events(), vec![hidden(&a), shown(&b)]);
}

#[test]
fn test_hide_on_empty_is_silent_noop() {
    let h = Harness::new();

    assert_eq!(h.controller.hide(None), None);
    assert_eq!(h.controller.hide(Some(&popup("a"))), None);

    assert!(h.take_events().is_empty());
    assert!(h.errors.borrow().is_empty());
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn test_clear_emits_single_bare_hide() {
    let h = Harness::new();
    h.controller.push(popup("a"));
    h.controller.push(popup("b"));
    h.take_events();

    h.controller.clear();

    assert!(h.controller.is_empty());
    assert_eq!(h.take_events(), vec![PopupEvent::Hide(None)]);
    assert!(h.controller.shown().is_none());
}

#[test]
fn test_clear_on_empty_still_emits_hide() {
    let h = Harness::new();

    h.controller.clear();

    assert_eq!(h.take_events(), vec![PopupEvent::Hide(None)]);
}

// =============================================================================
// Wiring
// =============================================================================

#[test]
fn test_end_to_end_sequence() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");

    h.controller.push(a.clone());
    assert_eq!(h.controller.popups(), vec![a.clone()]);
    assert_eq!(h.take_events(), vec![shown(&a)]);

    h.controller.push(b.clone());
    assert_eq!(h.controller.popups(), vec![a.clone(), b.clone()]);
    assert!(h.take_events().is_empty());

    h.controller.hide(None);
    assert_eq!(h.controller.popups(), vec![b.clone()]);
    assert_eq!(h.take_events(), vec![hidden(&a), shown(&b)]);

    h.controller.hide(None);
    assert!(h.controller.is_empty());
    assert_eq!(h.take_events(), vec![hidden(&b)]);
    h.assert_shown_is_front();
}

#[test]
fn test_self_dismiss_hides_popup() {
    let h = Harness::new();
    let overlay = Rc::new(Overlay::new("toast"));
    let toast = PopupRef::from(Rc::clone(&overlay));
    let other = popup("other");
    h.controller.push(toast.clone());
    h.controller.push(other.clone());
    h.take_events();

    assert_eq!(overlay.dismiss(), 1);

    assert_eq!(h.take_events(), vec![hidden(&toast), shown(&other)]);
    // One-shot: a second dismiss has nobody listening
    assert_eq!(overlay.dismiss(), 0);
}

#[test]
fn test_self_dismiss_subscribes_once_per_show() {
    let h = Harness::new();
    let overlay = Rc::new(Overlay::new("modal"));
    let modal = PopupRef::from(Rc::clone(&overlay));

    h.controller.push(modal.clone());
    h.controller.unshift(modal.clone());
    let signals = overlay.signals().expect("dismissable");
    assert_eq!(signals.listener_count(topics::HIDE), 2);

    overlay.dismiss();

    // Both subscriptions fire: the first removes the front entry and
    // re-shows the second, which subscribes again
    assert!(h.controller.is_empty());
    assert!(h.errors.borrow().is_empty());
}

#[test]
fn test_input_channel_dispatches_commands() {
    let h = Harness::new();
    let a = popup("a");
    let b = popup("b");

    h.controller.input().emit(&PopupCommand::Push(a.clone()));
    h.controller.input().emit(&PopupCommand::Unshift(b.clone()));
    h.controller.input().emit(&PopupCommand::Hide(Some(a.clone())));

    assert_eq!(h.controller.popups(), vec![b.clone()]);
    h.controller.input().emit(&PopupCommand::Clear);
    assert!(h.controller.is_empty());
    assert_eq!(
        h.take_events(),
        vec![shown(&a), shown(&b), hidden(&a), PopupEvent::Hide(None)]
    );
}

#[test]
fn test_engine_commands_route_when_global() {
    let options = PopupOptions {
        global: true,
        ..PopupOptions::default()
    };
    let h = Harness::with_options(options);
    let a = popup("a");

    assert_eq!(h.engine.send("popup", PopupCommand::Push(a.clone())), 1);
    assert_eq!(h.controller.popups(), vec![a.clone()]);

    h.engine.send("popup", PopupCommand::Swap(popup("b")));
    h.engine.send("popup", PopupCommand::Hide(None));
    assert!(h.controller.is_empty());
}

#[test]
fn test_engine_commands_ignored_when_not_global() {
    let h = Harness::new();

    assert_eq!(h.engine.send("popup", PopupCommand::Push(popup("a"))), 0);
    assert!(h.controller.is_empty());
}

#[test]
fn test_engine_namespace_is_configurable() {
    let options = PopupOptions {
        global: true,
        namespace: "dialog".into(),
        ..PopupOptions::default()
    };
    let h = Harness::with_options(options);

    assert_eq!(h.engine.send("popup", PopupCommand::Push(popup("a"))), 0);
    assert_eq!(h.engine.send("dialog", PopupCommand::Push(popup("b"))), 1);
    assert_eq!(h.controller.len(), 1);
}

#[test]
fn test_global_without_engine_fails_to_build() {
    let options = PopupOptions {
        global: true,
        ..PopupOptions::default()
    };
    let result = PopupController::builder().options(options).build();
    assert!(matches!(result, Err(PopupError::MissingEngine)));
}

#[test]
fn test_dropping_controller_unsubscribes_from_engine() {
    let engine = Engine::new();
    let options = PopupOptions {
        global: true,
        ..PopupOptions::default()
    };
    let controller = PopupController::builder()
        .options(options)
        .engine(engine.clone())
        .build()
        .expect("controller builds");
    assert_eq!(engine.listener_count("popup-push"), 1);

    drop(controller);
    assert_eq!(engine.listener_count("popup-push"), 0);
}

#[test]
fn test_transition_receives_configured_options() {
    let mut options = PopupOptions::default();
    options.overlap = true;
    options.in_transition.duration_ms = 75;
    let h = Harness::with_options(options);

    let received = h.transition.options();
    assert!(received.overlap);
    assert_eq!(received.in_transition.duration_ms, 75);
}

#[test]
fn test_handlers_may_reenter_controller() {
    let h = Harness::new();
    let follow_up = popup("follow-up");
    let weak = h.controller.downgrade();
    let next = follow_up.clone();
    h.controller.once(topics::HIDE, move |_| {
        if let Some(controller) = weak.upgrade() {
            controller.push(next.clone());
        }
    });

    h.controller.push(popup("first"));
    h.controller.hide(None);

    assert_eq!(h.controller.popups(), vec![follow_up]);
    h.assert_shown_is_front();
}
