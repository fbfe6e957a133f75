//! Transition controller that renders nothing and records a timeline

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use super::{TransitionController, TransitionOptions};
use crate::config::{Curve, PopupOptions, TransitionSpec};
use crate::popup::PopupRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Enter,
    Exit,
}

/// One animation the controller would have run
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionStep {
    pub kind: StepKind,
    pub popup: PopupRef,
    pub curve: Curve,
    pub duration: Duration,
    /// Start time relative to the show/hide call that produced the step
    pub offset: Duration,
}

#[derive(Debug)]
struct TimelineState {
    options: TransitionOptions,
    shown: Option<PopupRef>,
    steps: Vec<TransitionStep>,
}

/// Headless [`TransitionController`]. Clones share the same timeline, so a
/// caller can keep one handle while the popup controller owns another.
#[derive(Debug, Clone)]
pub struct HeadlessTransition {
    state: Rc<RefCell<TimelineState>>,
}

impl Default for HeadlessTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessTransition {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(TimelineState {
                options: PopupOptions::default().transition_options(),
                shown: None,
                steps: Vec::new(),
            })),
        }
    }

    /// Every step recorded so far
    pub fn steps(&self) -> Ref<'_, [TransitionStep]> {
        Ref::map(self.state.borrow(), |s| s.steps.as_slice())
    }

    /// Options received through [`TransitionController::configure`]
    pub fn options(&self) -> TransitionOptions {
        self.state.borrow().options.clone()
    }

    fn record(state: &mut TimelineState, kind: StepKind, popup: PopupRef, offset: Duration) {
        let TransitionSpec { curve, duration_ms } = match kind {
            StepKind::Enter => state.options.in_transition,
            StepKind::Exit => state.options.out_transition,
        };
        state.steps.push(TransitionStep {
            kind,
            popup,
            curve,
            duration: Duration::from_millis(duration_ms),
            offset,
        });
    }
}

impl TransitionController for HeadlessTransition {
    fn configure(&mut self, options: &TransitionOptions) {
        self.state.borrow_mut().options = options.clone();
    }

    fn show(&mut self, popup: &PopupRef) {
        let mut state = self.state.borrow_mut();
        let mut offset = Duration::ZERO;

        if let Some(outgoing) = state.shown.take() {
            Self::record(&mut state, StepKind::Exit, outgoing, Duration::ZERO);
            if !state.options.overlap {
                offset = state.options.out_transition.duration();
            }
        }

        debug!(popup = %popup, offset_ms = offset.as_millis() as u64, "transition in");
        Self::record(&mut state, StepKind::Enter, popup.clone(), offset);
        state.shown = Some(popup.clone());
    }

    fn hide(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(outgoing) = state.shown.take() {
            debug!(popup = %outgoing, "transition out");
            Self::record(&mut state, StepKind::Exit, outgoing, Duration::ZERO);
        }
    }

    fn shown(&self) -> Option<PopupRef> {
        self.state.borrow().shown.clone()
    }
}
