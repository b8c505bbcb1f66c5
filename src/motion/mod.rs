//! Time-driven value animation.
//!
//! `LerpClock` is the restartable interpolation primitive; `BounceBack`
//! composes it with the drag state machine to return a released control to
//! its rest value. The scheduling loop stays with the owning system: the
//! clock itself never cancels or re-arms anything.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    control::{ControlRange, ControlSystems, ControlValue, SetControlValue, ValueChanged},
    interaction::{DragEnded, DragStarted, PointerSystems},
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum MotionSystems {
    Cancel,
    Start,
    Advance,
}

/// One tick's worth of interpolation output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LerpSample {
    pub value: f32,
    pub done: bool,
}

/// A single timed run from a start value toward an end value.
///
/// Restarting is done by constructing a replacement; a run is never merged
/// with its predecessor. Once `done` is reported the caller must stop
/// ticking.
#[derive(Clone, Debug)]
pub struct LerpClock {
    start_value: f32,
    end_value: f32,
    timer: Timer,
}

impl LerpClock {
    pub fn start(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            start_value: from,
            end_value: to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub fn end_value(&self) -> f32 {
        self.end_value
    }

    /// Advances the run and samples it. An instantaneous run (zero duration)
    /// completes on its first tick at exactly the end value.
    pub fn tick(&mut self, delta: Duration) -> LerpSample {
        if self.timer.duration().is_zero() {
            return LerpSample {
                value: self.end_value,
                done: true,
            };
        }

        self.timer.tick(delta);
        if self.timer.finished() {
            // The end value is written verbatim so accumulated floating-point
            // drift cannot leave the run short of its target.
            return LerpSample {
                value: self.end_value,
                done: true,
            };
        }

        let fraction = self.timer.fraction();
        let difference = self.end_value - self.start_value;
        LerpSample {
            value: self.start_value + difference * fraction,
            done: false,
        }
    }
}

/// Animates a control's value back to a rest point after each drag ends.
#[derive(Component, Clone, Debug)]
pub struct BounceBack {
    pub rest_value: f32,
    pub duration: Duration,
    run: Option<LerpClock>,
}

impl Default for BounceBack {
    fn default() -> Self {
        Self::new(0.0, Duration::from_secs_f32(0.1))
    }
}

impl BounceBack {
    pub fn new(rest_value: f32, duration: Duration) -> Self {
        Self {
            rest_value,
            duration,
            run: None,
        }
    }

    /// Begins a run from `from` toward the rest value, replacing any run
    /// already in flight. A replacement mid-flight therefore resumes from
    /// the partially animated value its caller read, never from the value
    /// the previous run started at.
    pub fn begin(&mut self, from: f32) {
        self.run = Some(LerpClock::start(from, self.rest_value, self.duration));
    }

    pub fn cancel(&mut self) {
        self.run = None;
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }
}

/// Hands write authority to the animation when a drag gesture completes.
pub fn start_bounce_on_drag_end(
    mut ended: MessageReader<DragEnded>,
    mut bounce_query: Query<(&mut BounceBack, &ControlValue)>,
) {
    for end in ended.read() {
        if let Ok((mut bounce, value)) = bounce_query.get_mut(end.target) {
            bounce.begin(value.0);
        }
    }
}

/// Returns write authority to direct input the moment a new gesture starts.
pub fn cancel_bounce_on_drag_start(
    mut started: MessageReader<DragStarted>,
    mut bounce_query: Query<&mut BounceBack>,
) {
    for start in started.read() {
        if let Ok(mut bounce) = bounce_query.get_mut(start.target) {
            if bounce.is_running() {
                bounce.cancel();
            }
        }
    }
}

/// An explicit assignment also takes over write authority.
pub fn cancel_bounce_on_assignment(
    mut requests: MessageReader<SetControlValue>,
    mut bounce_query: Query<&mut BounceBack>,
) {
    for request in requests.read() {
        if let Ok(mut bounce) = bounce_query.get_mut(request.control) {
            if bounce.is_running() {
                bounce.cancel();
            }
        }
    }
}

/// Advances in-flight bounce runs once per frame and writes the sampled
/// value onto the control. The final write is the exact rest value.
pub fn advance_bounce(
    time: Res<Time>,
    mut bounce_query: Query<(Entity, &mut BounceBack, &mut ControlValue, Option<&ControlRange>)>,
    mut changed: MessageWriter<ValueChanged>,
) {
    for (entity, mut bounce, mut value, range) in bounce_query.iter_mut() {
        let Some(run) = bounce.run.as_mut() else {
            continue;
        };

        let sample = run.tick(time.delta());
        let next = range.map_or(sample.value, |range| range.clamp(sample.value));
        if value.0 != next {
            value.0 = next;
            changed.write(ValueChanged {
                control: entity,
                value: next,
            });
        }
        if sample.done {
            bounce.run = None;
        }
    }
}

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::interaction::PointerPlugin>() {
            app.add_plugins(crate::interaction::PointerPlugin);
        }
        if !app.is_plugin_added::<crate::control::ControlPlugin>() {
            app.add_plugins(crate::control::ControlPlugin);
        }
        app.configure_sets(
            Update,
            (
                MotionSystems::Cancel
                    .after(PointerSystems::Drag)
                    .before(ControlSystems::ApplyValues),
                MotionSystems::Start.after(ControlSystems::ApplyValues),
                MotionSystems::Advance.after(MotionSystems::Start),
            ),
        )
        .add_systems(
            Update,
            (
                (cancel_bounce_on_drag_start, cancel_bounce_on_assignment)
                    .in_set(MotionSystems::Cancel),
                start_bounce_on_drag_end.in_set(MotionSystems::Start),
                advance_bounce.in_set(MotionSystems::Advance),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_reaches_the_end_value_exactly() {
        let mut clock = LerpClock::start(1.5, 0.0, Duration::from_millis(100));

        let early = clock.tick(Duration::from_millis(40));
        assert!(!early.done);
        assert!(early.value > 0.0 && early.value < 1.5);

        let mid = clock.tick(Duration::from_millis(40));
        assert!(!mid.done);
        assert!(mid.value < early.value);

        let last = clock.tick(Duration::from_millis(40));
        assert!(last.done);
        assert_eq!(last.value, 0.0);
    }

    #[test]
    fn zero_duration_completes_on_the_first_tick() {
        let mut clock = LerpClock::start(3.0, 7.0, Duration::ZERO);
        assert_eq!(
            clock.tick(Duration::ZERO),
            LerpSample {
                value: 7.0,
                done: true
            }
        );
    }

    #[test]
    fn restart_replaces_the_run_from_the_midpoint_value() {
        let mut bounce = BounceBack::new(0.0, Duration::from_millis(100));
        bounce.begin(2.0);

        let halfway = bounce
            .run
            .as_mut()
            .expect("run in flight")
            .tick(Duration::from_millis(50));
        assert_eq!(halfway.value, 1.0);

        // A new gesture released at the halfway point restarts from 1.0,
        // not from the original 2.0.
        bounce.begin(halfway.value);
        let quarter = bounce
            .run
            .as_mut()
            .expect("replacement run")
            .tick(Duration::from_millis(50));
        assert_eq!(quarter.value, 0.5);
    }

    #[test]
    fn bounce_converges_monotonically_after_drag_end() {
        use crate::interaction::{DragCapture, PointerPlugin, PointerPressed, PointerReleased};

        let mut app = App::new();
        app.add_plugins((PointerPlugin, crate::control::ControlPlugin, MotionPlugin));
        app.init_resource::<Time>();

        let slider = app
            .world_mut()
            .spawn((
                DragCapture::default(),
                ControlValue(0.0),
                ControlRange::new(-2.0, 2.0).unwrap(),
                BounceBack::new(0.0, Duration::from_secs_f32(0.1)),
            ))
            .id();

        // Drag to 1.5, then release.
        app.world_mut()
            .resource_mut::<Messages<PointerPressed>>()
            .write(PointerPressed {
                target: slider,
                pointer_id: 1,
                position: Vec2::ZERO,
            });
        app.world_mut()
            .resource_mut::<Messages<SetControlValue>>()
            .write(SetControlValue {
                control: slider,
                value: 1.5,
            });
        app.update();
        assert_eq!(
            app.world().get::<ControlValue>(slider),
            Some(&ControlValue(1.5))
        );

        app.world_mut()
            .resource_mut::<Messages<PointerReleased>>()
            .write(PointerReleased {
                target: slider,
                pointer_id: 1,
            });
        app.update();

        let mut previous = 1.5f32;
        for _ in 0..5 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(25));
            app.update();
            let current = app.world().get::<ControlValue>(slider).unwrap().0;
            assert!(current.abs() <= previous.abs());
            previous = current;
        }

        assert_eq!(
            app.world().get::<ControlValue>(slider),
            Some(&ControlValue(0.0))
        );
        assert!(!app.world().get::<BounceBack>(slider).unwrap().is_running());
    }

    #[test]
    fn new_gesture_cancels_the_running_bounce() {
        use crate::interaction::{DragCapture, PointerPlugin, PointerPressed, PointerReleased};

        let mut app = App::new();
        app.add_plugins((PointerPlugin, crate::control::ControlPlugin, MotionPlugin));
        app.init_resource::<Time>();

        let slider = app
            .world_mut()
            .spawn((
                DragCapture::default(),
                ControlValue(1.0),
                BounceBack::default(),
            ))
            .id();

        app.world_mut()
            .resource_mut::<Messages<PointerPressed>>()
            .write(PointerPressed {
                target: slider,
                pointer_id: 1,
                position: Vec2::ZERO,
            });
        app.world_mut()
            .resource_mut::<Messages<PointerReleased>>()
            .write(PointerReleased {
                target: slider,
                pointer_id: 1,
            });
        app.update();
        assert!(app.world().get::<BounceBack>(slider).unwrap().is_running());

        app.world_mut()
            .resource_mut::<Messages<PointerPressed>>()
            .write(PointerPressed {
                target: slider,
                pointer_id: 2,
                position: Vec2::ZERO,
            });
        app.update();
        assert!(!app.world().get::<BounceBack>(slider).unwrap().is_running());
    }
}
