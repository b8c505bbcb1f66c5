//! Bounded brightness slider.
//!
//! Unlike the centered slider, this control lives on a non-negative range
//! and keeps its value wherever the user leaves it. Range assignment fails
//! fast on negative bounds; value assignment clamps.
use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    control::{ControlRange, ControlSystems, ControlValue, RangeError, ValueChanged},
    presentation::FillIntent,
};

pub const SLIDER_CLASS: &str = "brightness-slider";
pub const SLIDER_CONTAINER_CLASS: &str = "brightness-slider-container";
pub const ICON_LOW_CLASS: &str = "brightness-slider-icon-low";
pub const ICON_HIGH_CLASS: &str = "brightness-slider-icon-high";
pub const FILL_BAR_CLASS: &str = "brightness-slider-progress-bar";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum BrightnessSliderSystems {
    Present,
}

#[derive(Component, Clone, Copy, Debug)]
#[require(ControlValue, ControlRange)]
#[component(on_insert = BrightnessSlider::on_insert)]
pub struct BrightnessSlider {
    min: f32,
    max: f32,
}

impl Default for BrightnessSlider {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl BrightnessSlider {
    /// Builds a validated brightness range: bounds must be non-negative and
    /// ordered. Rejection happens here, at the point of assignment, rather
    /// than by silently clamping the configuration.
    pub fn new(min: f32, max: f32) -> Result<Self, RangeError> {
        Self::validated_range(min, max)?;
        Ok(Self { min, max })
    }

    pub fn from_config(
        config: &BrightnessSliderConfig,
    ) -> Result<(Self, ControlValue, ControlRange), RangeError> {
        let range = Self::validated_range(config.min_value, config.max_value)?;
        Ok((
            Self {
                min: config.min_value,
                max: config.max_value,
            },
            ControlValue(range.clamp(config.value)),
            range,
        ))
    }

    pub fn validated_range(min: f32, max: f32) -> Result<ControlRange, RangeError> {
        if min < 0.0 {
            return Err(RangeError::NegativeBound(min));
        }
        if max < 0.0 {
            return Err(RangeError::NegativeBound(max));
        }
        ControlRange::new(min, max)
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(slider) = world.entity(entity).get::<BrightnessSlider>().copied() else {
            return;
        };
        match Self::validated_range(slider.min, slider.max) {
            Ok(range) => {
                world.commands().entity(entity).insert(range);
            }
            Err(error) => {
                warn!(
                    "brightness slider {:?} keeps its previous range: {}",
                    entity, error
                );
            }
        }
    }
}

/// Markup-facing configuration, attribute names matching the host markup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrightnessSliderConfig {
    pub min_value: f32,
    pub max_value: f32,
    pub value: f32,
}

impl Default for BrightnessSliderConfig {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 1.0,
            value: 0.0,
        }
    }
}

/// Fraction of the track covered at `value`; degenerate ranges fill nothing.
pub fn progress_fraction(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

pub fn present_brightness_value(
    mut changes: MessageReader<ValueChanged>,
    slider_query: Query<&ControlRange, With<BrightnessSlider>>,
    mut fills: MessageWriter<FillIntent>,
) {
    for change in changes.read() {
        let Ok(range) = slider_query.get(change.control) else {
            continue;
        };
        fills.write(FillIntent {
            target: change.control,
            left_fraction: progress_fraction(change.value, range.min(), range.max()),
            right_fraction: 0.0,
        });
    }
}

pub struct BrightnessSliderPlugin;

impl Plugin for BrightnessSliderPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        if !app.is_plugin_added::<crate::control::ControlPlugin>() {
            app.add_plugins(crate::control::ControlPlugin);
        }
        app.configure_sets(
            Update,
            BrightnessSliderSystems::Present.after(ControlSystems::ApplyValues),
        )
        .add_systems(
            Update,
            present_brightness_value.in_set(BrightnessSliderSystems::Present),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_bounds_fail_fast() {
        assert_eq!(
            BrightnessSlider::new(-0.5, 1.0).map(|_| ()),
            Err(RangeError::NegativeBound(-0.5))
        );
        assert_eq!(
            BrightnessSlider::new(0.0, -1.0).map(|_| ()),
            Err(RangeError::NegativeBound(-1.0))
        );
        assert!(BrightnessSlider::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn config_values_clamp_into_the_range() {
        let config: BrightnessSliderConfig =
            serde_json::from_str(r#"{"min-value":0.2,"max-value":0.8,"value":2.0}"#)
                .expect("valid brightness markup");
        let (_, value, _) = BrightnessSlider::from_config(&config).expect("valid range");
        assert_eq!(value, ControlValue(0.8));
    }

    #[test]
    fn progress_fraction_normalizes_within_the_range() {
        assert_eq!(progress_fraction(0.5, 0.0, 1.0), 0.5);
        assert_eq!(progress_fraction(0.2, 0.2, 0.8), 0.0);
        assert_eq!(progress_fraction(0.8, 0.2, 0.8), 1.0);
        assert_eq!(progress_fraction(0.5, 0.5, 0.5), 0.0);
    }

    #[test]
    fn value_changes_report_track_fill() {
        use crate::{
            control::{ControlPlugin, SetControlValue},
            presentation::PresentationPlugin,
        };

        let mut app = App::new();
        app.add_plugins((PresentationPlugin, ControlPlugin, BrightnessSliderPlugin));

        let (slider, value, range) =
            BrightnessSlider::from_config(&BrightnessSliderConfig::default()).unwrap();
        let entity = app.world_mut().spawn((slider, value, range)).id();

        app.world_mut()
            .resource_mut::<Messages<SetControlValue>>()
            .write(SetControlValue {
                control: entity,
                value: 0.25,
            });
        app.update();

        let mut cursor = app.world().resource::<Messages<FillIntent>>().get_cursor();
        let fills: Vec<FillIntent> = cursor
            .read(app.world().resource::<Messages<FillIntent>>())
            .copied()
            .collect();
        assert_eq!(
            fills,
            vec![FillIntent {
                target: entity,
                left_fraction: 0.25,
                right_fraction: 0.0
            }]
        );
    }
}
