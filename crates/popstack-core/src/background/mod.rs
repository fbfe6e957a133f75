//! Background (dimmer) binding
//!
//! Shows a dimmer behind the popups while the controller's queue is
//! non-empty. Hiding is debounced: a `hide` event schedules a check, and a
//! `popup` event that finds the queue non-empty cancels it. The check itself
//! re-reads the queue, so the dimmer never blinks when one popup replaces
//! another.

mod modifier;

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{Curve, TransitionSpec};
use crate::constants;
use crate::constants::topics;
use crate::controller::{PopupController, WeakPopupController};
use crate::events::SubscriptionId;
use crate::scheduler::{Scheduler, TaskHandle};

pub use modifier::{Completion, Modifier, ModifierChange, StateModifier, Transform};

/// Callback applied to the background modifier
pub type StyleFn = Rc<dyn Fn(&mut dyn Modifier)>;

/// `init`, `show` and `hide` callbacks for the background element
#[derive(Clone)]
pub struct BackgroundStyle {
    init: StyleFn,
    show: StyleFn,
    hide: StyleFn,
}

impl BackgroundStyle {
    pub fn new(
        init: impl Fn(&mut dyn Modifier) + 'static,
        show: impl Fn(&mut dyn Modifier) + 'static,
        hide: impl Fn(&mut dyn Modifier) + 'static,
    ) -> Self {
        Self {
            init: Rc::new(init),
            show: Rc::new(show),
            hide: Rc::new(hide),
        }
    }

    pub fn with_init(mut self, init: impl Fn(&mut dyn Modifier) + 'static) -> Self {
        self.init = Rc::new(init);
        self
    }

    pub fn with_show(mut self, show: impl Fn(&mut dyn Modifier) + 'static) -> Self {
        self.show = Rc::new(show);
        self
    }

    pub fn with_hide(mut self, hide: impl Fn(&mut dyn Modifier) + 'static) -> Self {
        self.hide = Rc::new(hide);
        self
    }

    /// Linear opacity crossfade; parked off-screen while hidden
    pub fn crossfade() -> Self {
        let fade = TransitionSpec::new(Curve::Linear, constants::background::FADE_DURATION_MS);
        Self::new(
            |m| {
                m.set_opacity(0.0, None, None);
                m.set_transform(Transform::HIDDEN, None, None);
            },
            move |m| {
                m.set_transform(Transform::VISIBLE, None, None);
                m.set_opacity(1.0, Some(fade), None);
            },
            move |m| {
                m.set_opacity(
                    0.0,
                    Some(fade),
                    Some(Box::new(|m: &mut dyn Modifier| {
                        m.set_transform(Transform::HIDDEN, None, None)
                    })),
                );
            },
        )
    }
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self::crossfade()
    }
}

impl fmt::Debug for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundStyle").finish_non_exhaustive()
    }
}

struct BindingState<M> {
    modifier: RefCell<M>,
    style: BackgroundStyle,
    visible: Cell<bool>,
    pending: RefCell<Option<TaskHandle>>,
    scheduler: Rc<dyn Scheduler>,
    debounce: Duration,
    controller: WeakPopupController,
}

impl<M: Modifier + 'static> BindingState<M> {
    fn apply(&self, callback: &StyleFn) {
        let mut modifier = self.modifier.borrow_mut();
        callback(&mut *modifier);
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            trace!(task = handle.id(), "background hide check cancelled");
            handle.cancel();
        }
    }

    fn queue_is_empty(&self) -> bool {
        self.controller
            .upgrade()
            .map_or(true, |controller| controller.is_empty())
    }

    // An earlier `popup` listener may already have emptied the queue again;
    // the check it scheduled must survive.
    fn on_popup(&self) {
        if self.queue_is_empty() {
            return;
        }
        self.cancel_pending();
        if !self.visible.get() {
            debug!("background show");
            self.apply(&self.style.show);
            self.visible.set(true);
        }
    }

    fn on_hide(self: &Rc<Self>) {
        self.cancel_pending();
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.schedule(
            self.debounce,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.check_hide();
                }
            }),
        );
        trace!(
            task = handle.id(),
            delay_ms = self.debounce.as_millis() as u64,
            "background hide check scheduled"
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    fn check_hide(&self) {
        self.pending.borrow_mut().take();
        if self.queue_is_empty() && self.visible.get() {
            debug!("background hide");
            self.apply(&self.style.hide);
            self.visible.set(false);
        }
    }
}

/// Ties a background modifier to a controller's `popup` and `hide` events.
///
/// Dropping the binding detaches it.
pub struct BackgroundBinding<M: Modifier + 'static> {
    state: Rc<BindingState<M>>,
    subscriptions: Vec<SubscriptionId>,
}

impl<M: Modifier + 'static> BackgroundBinding<M> {
    /// Run `style.init` on `modifier` and start following `controller`.
    /// The hide check waits `options.background.debounce_ms`.
    pub fn attach(
        controller: &PopupController,
        modifier: M,
        style: BackgroundStyle,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let state = Rc::new(BindingState {
            modifier: RefCell::new(modifier),
            style,
            visible: Cell::new(false),
            pending: RefCell::new(None),
            scheduler,
            debounce: controller.options().background.debounce(),
            controller: controller.downgrade(),
        });
        state.apply(&state.style.init);

        let weak = Rc::downgrade(&state);
        let on_popup = controller.on(topics::POPUP, move |_| {
            if let Some(state) = weak.upgrade() {
                state.on_popup();
            }
        });
        let weak = Rc::downgrade(&state);
        let on_hide = controller.on(topics::HIDE, move |_| {
            if let Some(state) = weak.upgrade() {
                state.on_hide();
            }
        });

        Self {
            state,
            subscriptions: vec![on_popup, on_hide],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible.get()
    }

    /// Whether a hide check is waiting to fire
    pub fn has_pending_check(&self) -> bool {
        self.state
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    pub fn modifier(&self) -> Ref<'_, M> {
        self.state.modifier.borrow()
    }

    /// Stop following the controller and cancel any pending check. The
    /// background is left as it is.
    pub fn detach(&mut self) {
        self.state.cancel_pending();
        if let Some(controller) = self.state.controller.upgrade() {
            for id in self.subscriptions.drain(..) {
                controller.off(id);
            }
        }
        self.subscriptions.clear();
    }
}

impl<M: Modifier + 'static> Drop for BackgroundBinding<M> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<M: Modifier + 'static> fmt::Debug for BackgroundBinding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundBinding")
            .field("visible", &self.is_visible())
            .field("pending", &self.has_pending_check())
            .finish()
    }
}

impl PopupController {
    /// Attach a background with the default crossfade style
    pub fn background<M: Modifier + 'static>(
        &self,
        modifier: M,
        scheduler: Rc<dyn Scheduler>,
    ) -> BackgroundBinding<M> {
        BackgroundBinding::attach(self, modifier, BackgroundStyle::default(), scheduler)
    }
}
