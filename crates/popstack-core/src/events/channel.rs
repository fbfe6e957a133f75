//! Topic-keyed publish/subscribe channel
//!
//! Single-threaded: handlers are `Rc<dyn Fn>` and the registry lives in a
//! `RefCell`. The registry borrow is released before any handler runs, so a
//! handler may subscribe, unsubscribe or emit on the same channel. A
//! subscription removed with `off` mid-emit does not run for that event.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Events carried by an [`EventChannel`] name the topic they are published on
pub trait Topic {
    fn topic(&self) -> Cow<'_, str>;
}

/// Identifies a subscription so it can be removed with [`EventChannel::off`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Subscription<E> {
    id: SubscriptionId,
    topic: String,
    handler: Handler<E>,
    once: bool,
    /// Cleared by `off`; checked again right before dispatch
    live: Rc<Cell<bool>>,
}

struct Registry<E> {
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription<E>>>,
}

/// Per-instance event channel
///
/// Cloning yields another handle to the same registry.
pub struct EventChannel<E> {
    registry: Rc<Registry<E>>,
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscriptions", &self.registry.subscriptions.borrow().len())
            .finish()
    }
}

impl<E> EventChannel<E> {
    /// Create an empty channel
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Subscribe to every event published on `topic`
    pub fn on<F>(&self, topic: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        self.subscribe(topic.into(), Rc::new(handler), false)
    }

    /// Subscribe to the next event on `topic` only; the subscription removes
    /// itself before the handler runs
    pub fn once<F>(&self, topic: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        self.subscribe(topic.into(), Rc::new(handler), true)
    }

    fn subscribe(&self, topic: String, handler: Handler<E>, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.registry.next_id.get());
        self.registry.next_id.set(id.0 + 1);
        trace!(topic = %topic, id = id.0, once, "subscribe");
        self.registry.subscriptions.borrow_mut().push(Subscription {
            id,
            topic,
            handler,
            once,
            live: Rc::new(Cell::new(true)),
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.registry.subscriptions.borrow_mut();
        let Some(index) = subscriptions.iter().position(|s| s.id == id) else {
            return false;
        };
        subscriptions.remove(index).live.set(false);
        true
    }

    /// Number of live subscriptions on `topic`
    pub fn listener_count(&self, topic: &str) -> usize {
        self.registry
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }
}

impl<E: Topic> EventChannel<E> {
    /// Publish `event` to the subscribers of its topic, in subscription order.
    /// Returns how many handlers ran.
    pub fn emit(&self, event: &E) -> usize {
        let topic = event.topic();
        let handlers: Vec<(Rc<Cell<bool>>, Handler<E>)> = {
            let mut subscriptions = self.registry.subscriptions.borrow_mut();
            let handlers = subscriptions
                .iter()
                .filter(|s| s.topic == topic)
                .map(|s| (Rc::clone(&s.live), Rc::clone(&s.handler)))
                .collect();
            subscriptions.retain(|s| !(s.once && s.topic == topic));
            handlers
        };

        trace!(topic = %topic, listeners = handlers.len(), "emit");
        let mut ran = 0;
        for (live, handler) in &handlers {
            if live.get() {
                handler(event);
                ran += 1;
            }
        }
        ran
    }
}
