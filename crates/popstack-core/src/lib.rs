//! Popstack Core - Popup queue controller and its event plumbing
//!
//! This crate provides:
//! - An ordered popup queue driving a single-element transition controller
//! - Per-controller event channels plus a process-wide engine channel
//! - A debounced background (dimmer) binding
//! - Deferred task schedulers (virtual clock and tokio)

pub mod background;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod events;
pub mod paths;
pub mod popup;
pub mod scheduler;
pub mod transition;

// Re-exports for convenience
pub use background::{BackgroundBinding, BackgroundStyle, Modifier, StateModifier, Transform};
pub use config::{Curve, PopupOptions, TransitionSpec};
pub use controller::{PopupController, PopupControllerBuilder};
pub use error::{PopupError, PopupResult};
pub use events::{Engine, ErrorReport, EventChannel, PopupCommand, PopupEvent};
pub use popup::{Overlay, Popup, PopupRef};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
pub use transition::{HeadlessTransition, TransitionController};
