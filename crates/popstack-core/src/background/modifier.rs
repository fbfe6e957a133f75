//! Modifier capability for the background element
//!
//! A modifier owns the opacity and transform of one element. Changes may be
//! animated, and may carry a completion that runs once the change settles.

use crate::config::TransitionSpec;
use crate::constants::background::{HIDDEN_OFFSET, VISIBLE_OFFSET};

/// Runs when an opacity or transform change completes
pub type Completion = Box<dyn FnOnce(&mut dyn Modifier)>;

/// Column-major 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [f32; 16]);

impl Transform {
    pub const IDENTITY: Transform = Transform::translate(0.0, 0.0, 0.0);

    /// Parks the element off-screen
    pub const HIDDEN: Transform =
        Transform::translate(HIDDEN_OFFSET.0, HIDDEN_OFFSET.1, HIDDEN_OFFSET.2);

    /// Brings the element in front of the scene
    pub const VISIBLE: Transform =
        Transform::translate(VISIBLE_OFFSET.0, VISIBLE_OFFSET.1, VISIBLE_OFFSET.2);

    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    /// Translation component
    pub fn offset(&self) -> (f32, f32, f32) {
        (self.0[12], self.0[13], self.0[14])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Opacity and transform setter for one element
pub trait Modifier {
    fn set_opacity(
        &mut self,
        value: f32,
        transition: Option<TransitionSpec>,
        on_complete: Option<Completion>,
    );

    fn set_transform(
        &mut self,
        transform: Transform,
        transition: Option<TransitionSpec>,
        on_complete: Option<Completion>,
    );
}

/// One recorded modifier change
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierChange {
    Opacity {
        value: f32,
        transition: Option<TransitionSpec>,
    },
    Transform {
        transform: Transform,
        transition: Option<TransitionSpec>,
    },
}

/// Headless modifier. Applies changes instantly, runs completions inline
/// and keeps a history of every change.
#[derive(Debug, Clone, PartialEq)]
pub struct StateModifier {
    opacity: f32,
    transform: Transform,
    history: Vec<ModifierChange>,
}

impl Default for StateModifier {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::IDENTITY,
            history: Vec::new(),
        }
    }
}

impl StateModifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn history(&self) -> &[ModifierChange] {
        &self.history
    }
}

impl Modifier for StateModifier {
    fn set_opacity(
        &mut self,
        value: f32,
        transition: Option<TransitionSpec>,
        on_complete: Option<Completion>,
    ) {
        self.opacity = value;
        self.history.push(ModifierChange::Opacity { value, transition });
        if let Some(done) = on_complete {
            done(self);
        }
    }

    fn set_transform(
        &mut self,
        transform: Transform,
        transition: Option<TransitionSpec>,
        on_complete: Option<Completion>,
    ) {
        self.transform = transform;
        self.history.push(ModifierChange::Transform {
            transform,
            transition,
        });
        if let Some(done) = on_complete {
            done(self);
        }
    }
}
