//! Script session: one controller, its background and a popup registry

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use popstack_core::background::BackgroundBinding;
use popstack_core::constants::topics;
use popstack_core::events::engine::command_topic;
use popstack_core::{
    Engine, HeadlessTransition, ManualScheduler, Overlay, PopupCommand, PopupController,
    PopupEvent, PopupOptions, PopupRef, Scheduler, StateModifier, TokioScheduler,
};
use tracing::{debug, info};

use crate::script::Step;

/// Where the background's hide check is scheduled
#[derive(Clone)]
pub enum Clock {
    /// Virtual time; `wait` advances it instantly
    Manual(ManualScheduler),
    /// Tokio timers; `wait` sleeps. Needs a `LocalSet`.
    Realtime,
}

impl Clock {
    fn scheduler(&self) -> Rc<dyn Scheduler> {
        match self {
            Clock::Manual(scheduler) => Rc::new(scheduler.clone()),
            Clock::Realtime => Rc::new(TokioScheduler::new()),
        }
    }

    async fn wait(&self, duration: Duration) {
        match self {
            Clock::Manual(scheduler) => {
                let ran = scheduler.advance(duration);
                debug!(ran, now_ms = scheduler.now().as_millis() as u64, "clock advanced");
            }
            Clock::Realtime => tokio::time::sleep(duration).await,
        }
    }
}

pub struct Session {
    controller: PopupController,
    engine: Engine,
    transition: HeadlessTransition,
    background: BackgroundBinding<StateModifier>,
    popups: HashMap<String, Rc<Overlay>>,
    clock: Clock,
    output: Rc<RefCell<Vec<String>>>,
}

impl Session {
    pub fn new(options: PopupOptions, clock: Clock) -> Result<Self> {
        let engine = Engine::new();
        let transition = HeadlessTransition::new();
        let controller = PopupController::builder()
            .options(options)
            .transition(transition.clone())
            .engine(engine.clone())
            .build()
            .context("Failed to build popup controller")?;

        let output = Rc::new(RefCell::new(Vec::new()));
        for topic in [topics::POPUP, topics::HIDE] {
            let sink = Rc::clone(&output);
            controller.on(topic, move |event: &PopupEvent| {
                let line = match event {
                    PopupEvent::Popup(popup) => format!("popup {}", popup),
                    PopupEvent::Hide(Some(popup)) => format!("hide {}", popup),
                    PopupEvent::Hide(None) => "hide".to_string(),
                };
                sink.borrow_mut().push(line);
            });
        }
        let sink = Rc::clone(&output);
        engine.on_error(move |report| {
            sink.borrow_mut()
                .push(format!("error {}: {}", report.target, report.message));
        });

        let background = controller.background(StateModifier::new(), clock.scheduler());
        info!(global = controller.options().global, "session started");

        Ok(Self {
            controller,
            engine,
            transition,
            background,
            popups: HashMap::new(),
            clock,
            output,
        })
    }

    /// Popup registered under `name`, created on first use
    fn popup(&mut self, name: &str) -> PopupRef {
        let overlay = self
            .popups
            .entry(name.to_string())
            .or_insert_with(|| Rc::new(Overlay::new(name)));
        PopupRef::from(Rc::clone(overlay))
    }

    /// Run one step and return what it printed
    pub async fn execute(&mut self, step: &Step) -> Vec<String> {
        let was_visible = self.background.is_visible();

        match step {
            Step::Push(name) => {
                let popup = self.popup(name);
                self.controller.push(popup);
            }
            Step::Unshift(name) => {
                let popup = self.popup(name);
                self.controller.unshift(popup);
            }
            Step::Swap(name) => {
                let popup = self.popup(name);
                self.controller.swap(popup);
            }
            Step::Hide(target) => {
                let target = target.as_deref().map(|name| self.popup(name));
                self.controller.hide(target.as_ref());
            }
            Step::Clear => self.controller.clear(),
            Step::Dismiss(name) => {
                let heard = self.popups.get(name).map_or(0, |overlay| overlay.dismiss());
                if heard == 0 {
                    self.say(format!("dismiss {}: nobody listening", name));
                }
            }
            Step::Emit { command, target } => {
                let target = target.as_deref().map(|name| self.popup(name));
                if let Some(command) = PopupCommand::parse(command, target) {
                    let namespace = self.controller.options().namespace.clone();
                    let topic = command_topic(&namespace, command.name());
                    if self.engine.send(&namespace, command) == 0 {
                        self.say(format!("emit {}: no listeners", topic));
                    }
                }
            }
            Step::Wait(duration) => self.clock.wait(*duration).await,
            Step::Status => {
                let status = self.status();
                self.say(status);
            }
        }

        match (was_visible, self.background.is_visible()) {
            (false, true) => self.say("background shown".to_string()),
            (true, false) => self.say("background hidden".to_string()),
            _ => {}
        }
        std::mem::take(&mut *self.output.borrow_mut())
    }

    fn say(&self, line: String) {
        self.output.borrow_mut().push(line);
    }

    /// One-line summary of queue, shown popup and background
    pub fn status(&self) -> String {
        let queue: Vec<String> = self
            .controller
            .popups()
            .iter()
            .map(|popup| popup.to_string())
            .collect();
        let shown = self
            .controller
            .shown()
            .map_or_else(|| "-".to_string(), |popup| popup.to_string());
        format!(
            "queue [{}] shown {} background {} steps {}",
            queue.join(", "),
            shown,
            if self.background.is_visible() { "visible" } else { "hidden" },
            self.transition.steps().len()
        )
    }
}
