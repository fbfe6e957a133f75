//! Transition controller capability
//!
//! The popup controller never renders. It tells a transition controller to
//! show one popup or to hide whatever is shown, and the transition
//! controller guarantees at most one visible element.

mod headless;

use crate::config::TransitionSpec;
use crate::popup::PopupRef;

pub use headless::{HeadlessTransition, StepKind, TransitionStep};

/// Options passed through from [`PopupOptions`](crate::config::PopupOptions)
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOptions {
    pub in_transition: TransitionSpec,
    pub out_transition: TransitionSpec,
    /// Run the outgoing and incoming animations concurrently
    pub overlap: bool,
}

/// Shows exactly one element at a time, animating between them
pub trait TransitionController {
    /// Receive animation options once, when the popup controller is built
    fn configure(&mut self, options: &TransitionOptions) {
        let _ = options;
    }

    /// Animate `popup` in, animating out whatever was shown before
    fn show(&mut self, popup: &PopupRef);

    /// Animate out whatever is shown
    fn hide(&mut self);

    /// The element currently shown, if any
    fn shown(&self) -> Option<PopupRef>;
}
