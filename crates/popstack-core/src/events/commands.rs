//! Controller inbound commands and outbound events

use std::borrow::Cow;

use crate::constants::topics;
use crate::events::Topic;
use crate::popup::PopupRef;

/// Operation requests a controller accepts on its input channel and,
/// when global, on the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupCommand {
    Push(PopupRef),
    Swap(PopupRef),
    /// Hide a specific popup, or the front one when `None`
    Hide(Option<PopupRef>),
    Unshift(PopupRef),
    Clear,
}

impl PopupCommand {
    /// Every command name, in the order controllers subscribe them
    pub const NAMES: [&'static str; 5] = ["push", "swap", "hide", "unshift", "clear"];

    pub fn name(&self) -> &'static str {
        match self {
            PopupCommand::Push(_) => "push",
            PopupCommand::Swap(_) => "swap",
            PopupCommand::Hide(_) => "hide",
            PopupCommand::Unshift(_) => "unshift",
            PopupCommand::Clear => "clear",
        }
    }

    /// Build a command from its name and optional popup argument.
    /// Returns `None` for unknown names or a missing required popup.
    pub fn parse(name: &str, popup: Option<PopupRef>) -> Option<Self> {
        match name {
            "push" => popup.map(PopupCommand::Push),
            "swap" => popup.map(PopupCommand::Swap),
            "unshift" => popup.map(PopupCommand::Unshift),
            "hide" => Some(PopupCommand::Hide(popup)),
            "clear" => Some(PopupCommand::Clear),
            _ => None,
        }
    }
}

impl Topic for PopupCommand {
    fn topic(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name())
    }
}

/// Observable controller output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    /// A popup became the shown element
    Popup(PopupRef),
    /// A popup left the queue; `None` when the whole queue was cleared
    Hide(Option<PopupRef>),
}

impl PopupEvent {
    pub fn popup(&self) -> Option<&PopupRef> {
        match self {
            PopupEvent::Popup(popup) => Some(popup),
            PopupEvent::Hide(popup) => popup.as_ref(),
        }
    }
}

impl Topic for PopupEvent {
    fn topic(&self) -> Cow<'_, str> {
        match self {
            PopupEvent::Popup(_) => Cow::Borrowed(topics::POPUP),
            PopupEvent::Hide(_) => Cow::Borrowed(topics::HIDE),
        }
    }
}
