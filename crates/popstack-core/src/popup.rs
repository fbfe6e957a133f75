//! Popup references
//!
//! A popup is opaque to the controller. The only things it may ask of one
//! are a label for logs and, optionally, a signal channel whose `hide` topic
//! means "dismiss me".

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::constants::topics;
use crate::events::{EventChannel, Topic};

/// Signals a popup can raise about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupSignal {
    /// The popup asks to be removed (close button, timeout, ...)
    Dismiss,
}

impl Topic for PopupSignal {
    fn topic(&self) -> Cow<'_, str> {
        match self {
            PopupSignal::Dismiss => Cow::Borrowed(topics::HIDE),
        }
    }
}

/// Anything that can be queued on a popup controller
pub trait Popup {
    /// Human-readable name, used in logs and error reports
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed("popup")
    }

    /// Self-dismiss capability. Popups without one are never auto-hidden.
    fn signals(&self) -> Option<&EventChannel<PopupSignal>> {
        None
    }
}

/// Shared handle to a popup. Two handles are equal when they point at the
/// same popup, regardless of content.
#[derive(Clone)]
pub struct PopupRef(Rc<dyn Popup>);

impl PopupRef {
    pub fn new<P: Popup + 'static>(popup: P) -> Self {
        Self(Rc::new(popup))
    }

    /// Reference identity
    pub fn same(&self, other: &PopupRef) -> bool {
        self.addr() == other.addr()
    }

    pub fn downgrade(&self) -> WeakPopupRef {
        WeakPopupRef(Rc::downgrade(&self.0))
    }

    // Thin pointer: vtable addresses are not stable across codegen units
    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl<P: Popup + 'static> From<Rc<P>> for PopupRef {
    fn from(popup: Rc<P>) -> Self {
        Self(popup)
    }
}

impl Deref for PopupRef {
    type Target = dyn Popup;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for PopupRef {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for PopupRef {}

impl fmt::Debug for PopupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PopupRef({} @ {:p})", self.label(), self.addr())
    }
}

impl fmt::Display for PopupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Non-owning popup handle, held by subscriptions stored on the popup itself
#[derive(Clone)]
pub struct WeakPopupRef(Weak<dyn Popup>);

impl WeakPopupRef {
    pub fn upgrade(&self) -> Option<PopupRef> {
        self.0.upgrade().map(PopupRef)
    }
}

/// Ready-made popup: a label plus an optional dismiss signal
pub struct Overlay {
    label: String,
    signals: Option<EventChannel<PopupSignal>>,
}

impl Overlay {
    /// Popup that can dismiss itself via [`Overlay::dismiss`]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            signals: Some(EventChannel::new()),
        }
    }

    /// Popup without a dismiss capability
    pub fn inert(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            signals: None,
        }
    }

    /// Raise the dismiss signal. Returns how many listeners heard it.
    pub fn dismiss(&self) -> usize {
        self.signals
            .as_ref()
            .map_or(0, |signals| signals.emit(&PopupSignal::Dismiss))
    }
}

impl Popup for Overlay {
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label.as_str())
    }

    fn signals(&self) -> Option<&EventChannel<PopupSignal>> {
        self.signals.as_ref()
    }
}
