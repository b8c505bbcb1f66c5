//! Centered slider that springs back to rest when released.
//!
//! The value is clamped to a symmetric range (−2..2 by default) and returns
//! to the rest point through `BounceBack` whenever the drag gesture ends.
//! The thumb icon and the center-out fill bars are pure functions of the
//! value, reported as presentation intents.
use std::time::Duration;

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    control::{ControlRange, ControlValue, RangeError, ValueChanged},
    interaction::DragCapture,
    motion::{BounceBack, MotionSystems},
    presentation::{ClassIntent, FillIntent},
};

pub const SLIDER_CLASS: &str = "bouncy-slider";
pub const SLIDER_CONTAINER_CLASS: &str = "bouncy-slider-container";
pub const SLIDER_DETAIL_LEFT_CLASS: &str = "bouncy-slider-detail-left";
pub const SLIDER_DETAIL_RIGHT_CLASS: &str = "bouncy-slider-detail-right";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum BouncySliderSystems {
    Present,
}

/// Thumb icon bucket for the current value. The changepoint between the
/// slow and fast buckets sits at half the maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThumbZone {
    #[default]
    Center,
    LeftSlow,
    LeftFast,
    RightSlow,
    RightFast,
}

impl ThumbZone {
    pub const fn class(self) -> &'static str {
        match self {
            ThumbZone::Center => "bouncy-slider-thumb-center",
            ThumbZone::LeftSlow => "bouncy-slider-thumb-left-slow",
            ThumbZone::LeftFast => "bouncy-slider-thumb-left-fast",
            ThumbZone::RightSlow => "bouncy-slider-thumb-right-slow",
            ThumbZone::RightFast => "bouncy-slider-thumb-right-fast",
        }
    }
}

pub fn thumb_zone(value: f32, max: f32) -> ThumbZone {
    let changepoint = max * 0.5;
    if value == 0.0 {
        ThumbZone::Center
    } else if value > 0.0 && value < changepoint {
        ThumbZone::RightSlow
    } else if value >= changepoint {
        ThumbZone::RightFast
    } else if value > -changepoint {
        ThumbZone::LeftSlow
    } else {
        ThumbZone::LeftFast
    }
}

/// Normalized half-track fill for the side the value points at; the other
/// side collapses to zero.
pub fn fill_fractions(value: f32, max: f32) -> (f32, f32) {
    if max <= 0.0 {
        return (0.0, 0.0);
    }
    let fraction = (value.abs() / max).clamp(0.0, 1.0);
    if value > 0.0 {
        (0.0, fraction)
    } else if value < 0.0 {
        (fraction, 0.0)
    } else {
        (0.0, 0.0)
    }
}

/// Tracks the thumb bucket last presented, so class intents only go out on
/// bucket changes.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ThumbZoneState(ThumbZone);

impl ThumbZoneState {
    pub fn zone(&self) -> ThumbZone {
        self.0
    }
}

#[derive(Component, Clone, Copy, Debug)]
#[require(ControlValue, ControlRange, DragCapture, BounceBack, ThumbZoneState)]
#[component(on_insert = BouncySlider::on_insert)]
pub struct BouncySlider {
    pub min: f32,
    pub max: f32,
}

impl Default for BouncySlider {
    fn default() -> Self {
        Self {
            min: -2.0,
            max: 2.0,
        }
    }
}

impl BouncySlider {
    pub fn from_config(
        config: &BouncySliderConfig,
    ) -> Result<(Self, ControlValue, ControlRange, BounceBack), RangeError> {
        let range = ControlRange::new(config.min, config.max)?;
        Ok((
            Self {
                min: config.min,
                max: config.max,
            },
            ControlValue(range.clamp(config.value)),
            range,
            BounceBack::new(0.0, Duration::from_secs_f32(config.bounce_duration)),
        ))
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(slider) = world.entity(entity).get::<BouncySlider>().copied() else {
            return;
        };
        match ControlRange::new(slider.min, slider.max) {
            Ok(range) => {
                world.commands().entity(entity).insert(range);
            }
            Err(error) => {
                warn!("bouncy slider {:?} keeps its previous range: {}", entity, error);
            }
        }
    }
}

/// Markup-facing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BouncySliderConfig {
    pub min: f32,
    pub max: f32,
    pub value: f32,
    pub bounce_duration: f32,
}

impl Default for BouncySliderConfig {
    fn default() -> Self {
        Self {
            min: -2.0,
            max: 2.0,
            value: 0.0,
            bounce_duration: 0.1,
        }
    }
}

/// Translates value changes into thumb and fill presentation intents.
pub fn present_slider_value(
    mut changes: MessageReader<ValueChanged>,
    mut slider_query: Query<(&ControlRange, &mut ThumbZoneState), With<BouncySlider>>,
    mut classes: MessageWriter<ClassIntent>,
    mut fills: MessageWriter<FillIntent>,
) {
    for change in changes.read() {
        let Ok((range, mut zone_state)) = slider_query.get_mut(change.control) else {
            continue;
        };

        let zone = thumb_zone(change.value, range.max());
        if zone != zone_state.0 {
            classes.write(ClassIntent::removed(change.control, zone_state.0.class()));
            classes.write(ClassIntent::added(change.control, zone.class()));
            zone_state.0 = zone;
        }

        let (left_fraction, right_fraction) = fill_fractions(change.value, range.max());
        fills.write(FillIntent {
            target: change.control,
            left_fraction,
            right_fraction,
        });
    }
}

pub struct BouncySliderPlugin;

impl Plugin for BouncySliderPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        if !app.is_plugin_added::<crate::motion::MotionPlugin>() {
            app.add_plugins(crate::motion::MotionPlugin);
        }
        app.configure_sets(
            Update,
            BouncySliderSystems::Present.after(MotionSystems::Advance),
        )
        .add_systems(
            Update,
            present_slider_value.in_set(BouncySliderSystems::Present),
        );
    }
}
