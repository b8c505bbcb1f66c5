//! Enumerated-state buttons.
//!
//! `StateButton` is the four-state feedback button (default, working,
//! active, error); `AccentButton` is the simpler primary/secondary pair
//! that only toggles between default and active. State changes are the only
//! mutation entry point and are idempotent: re-setting the current state
//! emits nothing.
use bevy::prelude::*;
use enum_map::{enum_map, Enum, EnumMap};
use once_cell::sync::Lazy;

use crate::{
    interaction::Clickable,
    presentation::ClassIntent,
};

pub const STATE_BUTTON_CLASS: &str = "single_button_base_state";
pub const STATE_BUTTON_IMAGE_CLASS: &str = "single_button_image";

pub const ACCENT_CONTAINER_CLASS: &str = "primary-button-container";
pub const ACCENT_BUTTON_CLASS: &str = "primary-button-main";
pub const ACCENT_SHADOW_CLASS: &str = "primary-button-shadow";
pub const ACCENT_ACTIVE_CLASS: &str = "primary-button-active";
pub const ACCENT_SHADOW_ACTIVE_CLASS: &str = "primary-button-shadow-active";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Enum)]
pub enum ButtonState {
    #[default]
    Default,
    Working,
    Active,
    Error,
}

/// Style class applied per state; the default state carries none beyond the
/// base class.
static STATE_CLASSES: Lazy<EnumMap<ButtonState, Option<&'static str>>> = Lazy::new(|| {
    enum_map! {
        ButtonState::Default => None,
        ButtonState::Working => Some("single-button-working"),
        ButtonState::Active => Some("single-button-active"),
        ButtonState::Error => Some("single-button-error"),
    }
});

/// Four-state feedback button.
#[derive(Component, Clone, Debug, Default)]
#[require(Clickable)]
pub struct StateButton {
    state: ButtonState,
    pub label: String,
}

impl StateButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: ButtonState::Default,
            label: label.into(),
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Applies a state change; returns the new state only when it differs
    /// from the current one.
    fn set_state(&mut self, new_state: ButtonState) -> Option<ButtonState> {
        if self.state == new_state {
            return None;
        }
        self.state = new_state;
        Some(new_state)
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetButtonState {
    pub button: Entity,
    pub state: ButtonState,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonStateChanged {
    pub button: Entity,
    pub state: ButtonState,
}

pub fn apply_button_state_requests(
    mut requests: MessageReader<SetButtonState>,
    mut button_query: Query<&mut StateButton>,
    mut changed: MessageWriter<ButtonStateChanged>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for request in requests.read() {
        let Ok(mut button) = button_query.get_mut(request.button) else {
            continue;
        };

        let previous = button.state();
        let Some(next) = button.set_state(request.state) else {
            continue;
        };

        if let Some(class) = STATE_CLASSES[previous] {
            classes.write(ClassIntent::removed(request.button, class));
        }
        if let Some(class) = STATE_CLASSES[next] {
            classes.write(ClassIntent::added(request.button, class));
        }
        changed.write(ButtonStateChanged {
            button: request.button,
            state: next,
        });
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccentState {
    #[default]
    Default,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccentButtonKind {
    /// Raised button with a drop shadow that activates with it.
    Primary,
    /// Flat variant sharing the primary class set, minus the shadow.
    Secondary,
}

/// Two-state call-to-action button.
///
/// The label is plain text; resolving localized strings is the host's job
/// and happens before the label is assigned.
#[derive(Component, Clone, Debug)]
#[require(Clickable)]
pub struct AccentButton {
    pub kind: AccentButtonKind,
    state: AccentState,
    pub label: String,
}

impl AccentButton {
    pub fn new(kind: AccentButtonKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            state: AccentState::Default,
            label: label.into(),
        }
    }

    pub fn state(&self) -> AccentState {
        self.state
    }

    fn set_state(&mut self, new_state: AccentState) -> Option<AccentState> {
        if self.state == new_state {
            return None;
        }
        self.state = new_state;
        Some(new_state)
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetAccentState {
    pub button: Entity,
    pub state: AccentState,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccentStateChanged {
    pub button: Entity,
    pub state: AccentState,
}

pub fn apply_accent_state_requests(
    mut requests: MessageReader<SetAccentState>,
    mut button_query: Query<&mut AccentButton>,
    mut changed: MessageWriter<AccentStateChanged>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for request in requests.read() {
        let Ok(mut button) = button_query.get_mut(request.button) else {
            continue;
        };
        let Some(next) = button.set_state(request.state) else {
            continue;
        };

        let applied = next == AccentState::Active;
        let write_class = |classes: &mut MessageWriter<ClassIntent>, class| {
            classes.write(ClassIntent {
                target: request.button,
                class,
                applied,
            });
        };
        write_class(&mut classes, ACCENT_ACTIVE_CLASS);
        if button.kind == AccentButtonKind::Primary {
            write_class(&mut classes, ACCENT_SHADOW_ACTIVE_CLASS);
        }
        changed.write(AccentStateChanged {
            button: request.button,
            state: next,
        });
    }
}

pub struct StateButtonPlugin;

impl Plugin for StateButtonPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        app.add_message::<SetButtonState>()
            .add_message::<ButtonStateChanged>()
            .add_message::<SetAccentState>()
            .add_message::<AccentStateChanged>()
            .add_systems(
                Update,
                (apply_button_state_requests, apply_accent_state_requests),
            );
    }
}
