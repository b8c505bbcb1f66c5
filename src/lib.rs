//! Interactive UI widgets for a game-hosted retained-mode tree.
//!
//! Widgets are plain components on host tree entities. The host delivers
//! pointer events and per-frame time; the widgets answer with domain
//! messages (`ValueChanged`, `SelectionChanged`, state changes) and
//! presentation intents the host's styling layer applies. No rendering,
//! layout, or asset loading happens here.
use bevy::prelude::*;

pub mod control;
pub mod interaction;
pub mod motion;
pub mod presentation;
pub mod selection;
pub mod widgets;

pub use widgets::{widget_kind_for_tag, WidgetKind};

/// Everything at once: the interaction/motion/selection primitives plus all
/// widgets.
pub struct SwitchboardPlugin;

impl Plugin for SwitchboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            presentation::PresentationPlugin,
            interaction::PointerPlugin,
            control::ControlPlugin,
            motion::MotionPlugin,
            selection::SelectionPlugin,
            widgets::WidgetsPlugin,
        ));
    }
}
