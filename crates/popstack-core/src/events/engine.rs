//! Process-wide event channel
//!
//! Controllers never reach for a global; whoever builds them hands over an
//! `Engine` handle. Command topics are namespaced (`popup-push`, ...) so one
//! engine can serve several controller families.

use std::borrow::Cow;

use tracing::warn;

use crate::constants::topics;
use crate::events::{EventChannel, PopupCommand, SubscriptionId, Topic};
use crate::popup::PopupRef;

/// Structured, non-fatal error signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Component that raised the report (e.g. `PopupController`)
    pub target: String,
    pub message: String,
    /// The popup the failed operation was about
    pub data: Option<PopupRef>,
}

/// Everything published on the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A controller command addressed by namespace
    Command {
        namespace: String,
        command: PopupCommand,
    },
    Error(ErrorReport),
}

impl EngineEvent {
    pub fn command(namespace: impl Into<String>, command: PopupCommand) -> Self {
        EngineEvent::Command {
            namespace: namespace.into(),
            command,
        }
    }
}

/// Topic a namespaced command is published under
pub fn command_topic(namespace: &str, name: &str) -> String {
    format!("{}-{}", namespace, name)
}

impl Topic for EngineEvent {
    fn topic(&self) -> Cow<'_, str> {
        match self {
            EngineEvent::Command { namespace, command } => {
                Cow::Owned(command_topic(namespace, command.name()))
            }
            EngineEvent::Error(_) => Cow::Borrowed(topics::ERROR),
        }
    }
}

/// Handle to the process-wide channel. Clones share subscribers.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    channel: EventChannel<EngineEvent>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, topic: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&EngineEvent) + 'static,
    {
        self.channel.on(topic, handler)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.channel.off(id)
    }

    pub fn emit(&self, event: &EngineEvent) -> usize {
        self.channel.emit(event)
    }

    /// Publish a command to every controller listening on `namespace`
    pub fn send(&self, namespace: &str, command: PopupCommand) -> usize {
        let delivered = self.emit(&EngineEvent::command(namespace, command));
        if delivered == 0 {
            warn!(namespace, "engine command had no listeners");
        }
        delivered
    }

    /// Publish an error report on the `error` topic
    pub fn report(&self, report: ErrorReport) -> usize {
        self.emit(&EngineEvent::Error(report))
    }

    /// Subscribe to error reports only
    pub fn on_error<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ErrorReport) + 'static,
    {
        self.channel.on(topics::ERROR, move |event| {
            if let EngineEvent::Error(report) = event {
                handler(report);
            }
        })
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.channel.listener_count(topic)
    }
}
