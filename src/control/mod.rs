//! Shared numeric-value plumbing for slider-like controls.
//!
//! `ControlValue` is the single behavioral truth for a control's number.
//! Exactly one authority writes it at a time: direct input while a drag is in
//! progress, or an animation controller afterwards. Assignments always clamp
//! into the control's `ControlRange`.
use bevy::prelude::*;
use thiserror::Error;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ControlSystems {
    ApplyValues,
}

/// Invalid range configuration, rejected at the point of assignment.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RangeError {
    #[error("minimum {min} exceeds maximum {max}")]
    Inverted { min: f32, max: f32 },
    #[error("bound {0} must not be negative")]
    NegativeBound(f32),
}

/// Current numeric value of a control.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlValue(pub f32);

/// Inclusive value bounds of a control.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ControlRange {
    min: f32,
    max: f32,
}

impl Default for ControlRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ControlRange {
    pub fn new(min: f32, max: f32) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> f32 {
        self.min
    }

    pub const fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Host-side request to assign a control's value (the drag-input write path).
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SetControlValue {
    pub control: Entity,
    pub value: f32,
}

/// Emitted once per observable change of a control's value.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ValueChanged {
    pub control: Entity,
    pub value: f32,
}

/// Applies queued value assignments, clamped into the control's range.
///
/// Assigning the current value again is a no-op and emits nothing.
pub fn apply_value_requests(
    mut requests: MessageReader<SetControlValue>,
    mut control_query: Query<(&mut ControlValue, Option<&ControlRange>)>,
    mut changed: MessageWriter<ValueChanged>,
) {
    for request in requests.read() {
        let Ok((mut value, range)) = control_query.get_mut(request.control) else {
            debug!("value request for non-control entity {:?}", request.control);
            continue;
        };

        let next = range.map_or(request.value, |range| range.clamp(request.value));
        if value.0 != next {
            value.0 = next;
            changed.write(ValueChanged {
                control: request.control,
                value: next,
            });
        }
    }
}

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SetControlValue>()
            .add_message::<ValueChanged>()
            .add_systems(
                Update,
                apply_value_requests.in_set(ControlSystems::ApplyValues),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            ControlRange::new(2.0, 1.0),
            Err(RangeError::Inverted { min: 2.0, max: 1.0 })
        );
        assert!(ControlRange::new(-2.0, 2.0).is_ok());
    }

    #[test]
    fn value_requests_clamp_and_emit_once() {
        let mut app = App::new();
        app.add_plugins(ControlPlugin);

        let control = app
            .world_mut()
            .spawn((ControlValue(0.0), ControlRange::new(0.0, 1.0).unwrap()))
            .id();

        app.world_mut()
            .resource_mut::<Messages<SetControlValue>>()
            .write(SetControlValue {
                control,
                value: 4.0,
            });
        app.update();

        assert_eq!(
            app.world().get::<ControlValue>(control),
            Some(&ControlValue(1.0))
        );

        let mut reader = app
            .world_mut()
            .resource_mut::<Messages<ValueChanged>>()
            .get_cursor();
        let changes: Vec<ValueChanged> = reader
            .read(app.world().resource::<Messages<ValueChanged>>())
            .copied()
            .collect();
        assert_eq!(
            changes,
            vec![ValueChanged {
                control,
                value: 1.0
            }]
        );
    }

    #[test]
    fn reassigning_the_same_value_is_silent() {
        let mut app = App::new();
        app.add_plugins(ControlPlugin);

        let control = app.world_mut().spawn(ControlValue(0.5)).id();
        app.world_mut()
            .resource_mut::<Messages<SetControlValue>>()
            .write(SetControlValue {
                control,
                value: 0.5,
            });
        app.update();

        let mut reader = app
            .world_mut()
            .resource_mut::<Messages<ValueChanged>>()
            .get_cursor();
        let count = reader
            .read(app.world().resource::<Messages<ValueChanged>>())
            .count();
        assert_eq!(count, 0);
    }
}
