//! Event plumbing
//!
//! - `EventChannel` - per-instance topic pub/sub with `once` subscriptions
//! - `PopupCommand` / `PopupEvent` - controller inbound and outbound events
//! - `Engine` - the process-wide channel, passed explicitly to controllers

pub mod channel;
pub mod commands;
pub mod engine;

pub use channel::{EventChannel, SubscriptionId, Topic};
pub use commands::{PopupCommand, PopupEvent};
pub use engine::{Engine, EngineEvent, ErrorReport};
