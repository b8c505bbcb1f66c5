//! Widget implementations built on the interaction, motion, and selection
//! primitives.
use bevy::prelude::*;

pub mod bouncy_slider;
pub mod brightness_slider;
pub mod collapsible;
pub mod color_selector;
pub mod segmented;
pub mod state_button;
pub mod step_counter;

/// Widget kinds addressable from host markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    SingleButton,
    PrimaryButton,
    SecondaryButton,
    CollapsableButton,
    BouncySlider,
    BrightnessControl,
    ColorSelector,
    CarrouselStepCounter,
    MultiDependantButtonFour,
}

/// Markup element tags, as the host declares them.
static WIDGET_TAGS: phf::Map<&'static str, WidgetKind> = phf::phf_map! {
    "single-button" => WidgetKind::SingleButton,
    "primary-button" => WidgetKind::PrimaryButton,
    "secondary-button" => WidgetKind::SecondaryButton,
    "collapsable-button" => WidgetKind::CollapsableButton,
    "bouncy-slider" => WidgetKind::BouncySlider,
    "brightness-control" => WidgetKind::BrightnessControl,
    "color-selector" => WidgetKind::ColorSelector,
    "carrousel-step-counter" => WidgetKind::CarrouselStepCounter,
    "multi-dependant-button-four" => WidgetKind::MultiDependantButtonFour,
};

/// Looks a markup element tag up in the widget registry.
pub fn widget_kind_for_tag(tag: &str) -> Option<WidgetKind> {
    WIDGET_TAGS.get(tag).copied()
}

pub struct WidgetsPlugin;

impl Plugin for WidgetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            state_button::StateButtonPlugin,
            collapsible::CollapsiblePlugin,
            bouncy_slider::BouncySliderPlugin,
            brightness_slider::BrightnessSliderPlugin,
            color_selector::ColorSelectorPlugin,
            step_counter::StepCounterPlugin,
            segmented::SegmentedPlugin,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_markup_tag_resolves_to_its_widget() {
        assert_eq!(
            widget_kind_for_tag("bouncy-slider"),
            Some(WidgetKind::BouncySlider)
        );
        assert_eq!(
            widget_kind_for_tag("color-selector"),
            Some(WidgetKind::ColorSelector)
        );
        assert_eq!(widget_kind_for_tag("unknown-widget"), None);
    }
}
