//! Popup controller
//!
//! Owns the popup queue and a transition controller. Every operation is
//! synchronous: mutate the queue, release the borrow, drive the transition,
//! then emit. Handlers therefore see the post-operation queue and may call
//! back into the controller.
//!
//! ## Outbound events
//! - `popup(node)` - `node` just became the shown popup
//! - `hide(node?)` - `node` left the queue (`None` after `clear`)
//!
//! ## Inbound commands
//! `push`, `swap`, `hide`, `unshift`, `clear` on [`PopupController::input`],
//! and on the engine as `<namespace>-<command>` when `global` is set.

mod queue;
#[cfg(test)]
mod scenario_tests;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::config::PopupOptions;
use crate::constants::topics;
use crate::error::{PopupError, PopupResult};
use crate::events::engine::command_topic;
use crate::events::{
    Engine, EngineEvent, ErrorReport, EventChannel, PopupCommand, PopupEvent, SubscriptionId,
};
use crate::popup::PopupRef;
use crate::transition::{HeadlessTransition, TransitionController};

pub use queue::PopupQueue;

/// Name used as the `target` of error reports
pub const ERROR_TARGET: &str = "PopupController";

struct ControllerInner {
    options: PopupOptions,
    queue: RefCell<PopupQueue>,
    transition: RefCell<Box<dyn TransitionController>>,
    input: EventChannel<PopupCommand>,
    output: EventChannel<PopupEvent>,
    engine: Option<Engine>,
    engine_subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        if let Some(engine) = &self.engine {
            for id in self.engine_subscriptions.get_mut().drain(..) {
                engine.off(id);
            }
        }
    }
}

/// Builder for [`PopupController`]
pub struct PopupControllerBuilder {
    options: PopupOptions,
    transition: Option<Box<dyn TransitionController>>,
    engine: Option<Engine>,
}

impl PopupControllerBuilder {
    pub fn options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }

    /// Transition controller to drive. Defaults to a [`HeadlessTransition`].
    pub fn transition(mut self, transition: impl TransitionController + 'static) -> Self {
        self.transition = Some(Box::new(transition));
        self
    }

    /// Process-wide channel for error reports and, when `global`, commands
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> PopupResult<PopupController> {
        if self.options.global && self.engine.is_none() {
            return Err(PopupError::MissingEngine);
        }

        let mut transition = self
            .transition
            .unwrap_or_else(|| Box::new(HeadlessTransition::new()));
        transition.configure(&self.options.transition_options());

        let controller = PopupController {
            inner: Rc::new(ControllerInner {
                options: self.options,
                queue: RefCell::new(PopupQueue::new()),
                transition: RefCell::new(transition),
                input: EventChannel::new(),
                output: EventChannel::new(),
                engine: self.engine,
                engine_subscriptions: RefCell::new(Vec::new()),
            }),
        };
        controller.wire();
        Ok(controller)
    }
}

/// Handle to a popup controller. Clones share the same queue.
#[derive(Clone)]
pub struct PopupController {
    inner: Rc<ControllerInner>,
}

impl std::fmt::Debug for PopupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupController")
            .field("popups", &self.popups())
            .field("global", &self.inner.options.global)
            .finish()
    }
}

/// Non-owning controller handle, used by subscriptions that outlive calls
#[derive(Clone)]
pub struct WeakPopupController {
    inner: Weak<ControllerInner>,
}

impl WeakPopupController {
    pub fn upgrade(&self) -> Option<PopupController> {
        self.inner.upgrade().map(|inner| PopupController { inner })
    }
}

impl PopupController {
    pub fn builder() -> PopupControllerBuilder {
        PopupControllerBuilder {
            options: PopupOptions::default(),
            transition: None,
            engine: None,
        }
    }

    /// Controller with the given options and transition, no engine
    pub fn new(
        options: PopupOptions,
        transition: impl TransitionController + 'static,
    ) -> PopupResult<Self> {
        Self::builder().options(options).transition(transition).build()
    }

    pub fn downgrade(&self) -> WeakPopupController {
        WeakPopupController {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn wire(&self) {
        for name in PopupCommand::NAMES {
            let weak = self.downgrade();
            self.inner.input.on(name, move |command: &PopupCommand| {
                if let Some(controller) = weak.upgrade() {
                    controller.dispatch(command.clone());
                }
            });
        }

        if let (true, Some(engine)) = (self.inner.options.global, &self.inner.engine) {
            let mut ids = self.inner.engine_subscriptions.borrow_mut();
            for name in PopupCommand::NAMES {
                let weak = self.downgrade();
                let topic = command_topic(&self.inner.options.namespace, name);
                debug!(topic = %topic, "subscribing on engine");
                ids.push(engine.on(topic, move |event: &EngineEvent| {
                    if let (EngineEvent::Command { command, .. }, Some(controller)) =
                        (event, weak.upgrade())
                    {
                        controller.dispatch(command.clone());
                    }
                }));
            }
        }

        let weak = self.downgrade();
        self.inner.output.on(topics::POPUP, move |event: &PopupEvent| {
            if let (PopupEvent::Popup(node), Some(controller)) = (event, weak.upgrade()) {
                controller.watch_dismiss(node);
            }
        });
    }

    /// Subscribe once to the popup's own dismiss signal, forwarding it to
    /// `hide(node)`. Called for every show, so repeated shows stack
    /// subscriptions.
    fn watch_dismiss(&self, node: &PopupRef) {
        let Some(signals) = node.signals() else {
            return;
        };
        let controller = self.downgrade();
        let popup = node.downgrade();
        signals.once(topics::HIDE, move |_| {
            if let (Some(controller), Some(popup)) = (controller.upgrade(), popup.upgrade()) {
                debug!(popup = %popup, "popup dismissed itself");
                controller.hide(Some(&popup));
            }
        });
    }

    // =========================================================================
    // Queue operations
    // =========================================================================

    /// Add a popup to the end of the queue. Shown only if the queue was empty.
    pub fn push(&self, popup: PopupRef) {
        let became_front = self.inner.queue.borrow_mut().push(popup.clone());
        debug!(popup = %popup, len = self.len(), "push");
        if became_front {
            self.show(&popup);
        }
    }

    /// Put a popup in front of the queue and show it
    pub fn unshift(&self, popup: PopupRef) {
        self.inner.queue.borrow_mut().unshift(popup.clone());
        debug!(popup = %popup, len = self.len(), "unshift");
        self.show(&popup);
    }

    /// Replace the shown popup in place (or push onto an empty queue).
    ///
    /// The replaced popup leaves the queue without a `hide` event.
    pub fn swap(&self, popup: PopupRef) {
        let replaced = self.inner.queue.borrow_mut().swap(popup.clone());
        debug!(popup = %popup, replaced = ?replaced, "swap");
        self.show(&popup);
    }

    /// Remove `target` (or the front popup when `None`). Unknown targets are
    /// reported on the engine's `error` topic and otherwise ignored.
    ///
    /// Returns the removed popup.
    pub fn hide(&self, target: Option<&PopupRef>) -> Option<PopupRef> {
        match self.try_hide(target) {
            Ok(removed) => removed,
            Err(err) => {
                self.report(&err, target);
                None
            }
        }
    }

    /// [`hide`](Self::hide) without the error report
    pub fn try_hide(&self, target: Option<&PopupRef>) -> PopupResult<Option<PopupRef>> {
        let (index, removed) = {
            let mut queue = self.inner.queue.borrow_mut();
            if queue.is_empty() {
                return Ok(None);
            }
            let index = match target {
                None => 0,
                Some(target) => queue
                    .position(target)
                    .ok_or_else(|| PopupError::TargetNotFound(target.to_string()))?,
            };
            match queue.remove(index) {
                Some(removed) => (index, removed),
                None => return Ok(None),
            }
        };

        debug!(popup = %removed, index, len = self.len(), "hide");
        self.emit(PopupEvent::Hide(Some(removed.clone())));

        if index == 0 {
            match self.front() {
                Some(front) => self.show(&front),
                None => self.inner.transition.borrow_mut().hide(),
            }
        }
        Ok(Some(removed))
    }

    /// Remove every popup. Always emits exactly one `hide` with no payload.
    pub fn clear(&self) {
        self.inner.transition.borrow_mut().hide();
        let removed = self.inner.queue.borrow_mut().clear();
        debug!(removed, "clear");
        self.emit(PopupEvent::Hide(None));
    }

    /// Run a command as if it had arrived on the input channel
    pub fn dispatch(&self, command: PopupCommand) {
        match command {
            PopupCommand::Push(popup) => self.push(popup),
            PopupCommand::Swap(popup) => self.swap(popup),
            PopupCommand::Hide(target) => {
                self.hide(target.as_ref());
            }
            PopupCommand::Unshift(popup) => self.unshift(popup),
            PopupCommand::Clear => self.clear(),
        }
    }

    fn show(&self, popup: &PopupRef) {
        self.inner.transition.borrow_mut().show(popup);
        self.emit(PopupEvent::Popup(popup.clone()));
    }

    fn emit(&self, event: PopupEvent) {
        self.inner.output.emit(&event);
    }

    fn report(&self, err: &PopupError, target: Option<&PopupRef>) {
        warn!(error = %err, "{} operation ignored", ERROR_TARGET);
        if let Some(engine) = &self.inner.engine {
            engine.report(ErrorReport {
                target: ERROR_TARGET.to_string(),
                message: err.to_string(),
                data: target.cloned(),
            });
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Channel the controller listens on for commands
    pub fn input(&self) -> &EventChannel<PopupCommand> {
        &self.inner.input
    }

    /// Subscribe to `popup` or `hide`
    pub fn on<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&PopupEvent) + 'static,
    {
        self.inner.output.on(topic, handler)
    }

    pub fn once<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&PopupEvent) + 'static,
    {
        self.inner.output.once(topic, handler)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.output.off(id)
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn len(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.queue.borrow().is_empty()
    }

    /// The popup that should be on screen
    pub fn front(&self) -> Option<PopupRef> {
        self.inner.queue.borrow().front().cloned()
    }

    /// Snapshot of the queue, front first
    pub fn popups(&self) -> Vec<PopupRef> {
        self.inner.queue.borrow().iter().cloned().collect()
    }

    pub fn contains(&self, popup: &PopupRef) -> bool {
        self.inner.queue.borrow().position(popup).is_some()
    }

    /// What the transition controller reports as shown
    pub fn shown(&self) -> Option<PopupRef> {
        self.inner.transition.borrow().shown()
    }

    pub fn options(&self) -> &PopupOptions {
        &self.inner.options
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.inner.engine.as_ref()
    }
}
