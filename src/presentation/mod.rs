//! Presentation-intent messages consumed by the hosting style layer.
//!
//! Widgets in this crate never touch styling directly. They describe what the
//! style layer should do (class-list edits, layout display changes, fill-bar
//! geometry) and the host applies it. Intents are the downstream output of
//! behavior systems and must never be read back as behavior truth.
use bevy::prelude::*;

/// Request to add or remove a style class on a tree node.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassIntent {
    /// Tree node the class applies to.
    pub target: Entity,
    /// Style class name, matching the host stylesheet.
    pub class: &'static str,
    /// `true` to add the class, `false` to remove it.
    pub applied: bool,
}

impl ClassIntent {
    pub const fn added(target: Entity, class: &'static str) -> Self {
        Self {
            target,
            class,
            applied: true,
        }
    }

    pub const fn removed(target: Entity, class: &'static str) -> Self {
        Self {
            target,
            class,
            applied: false,
        }
    }
}

/// Request to include or exclude a tree node from layout flow.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayIntent {
    pub target: Entity,
    /// `true` keeps the node in layout, `false` removes it.
    pub shown: bool,
}

/// Request to resize the left/right fill bars of a slider track.
///
/// Fractions are normalized to `0.0..=1.0` of the half-track each bar covers.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct FillIntent {
    pub target: Entity,
    pub left_fraction: f32,
    pub right_fraction: f32,
}

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ClassIntent>()
            .add_message::<DisplayIntent>()
            .add_message::<FillIntent>();
    }
}
