//! Horizontal selector of color swatches, numbered options, and a disable
//! sentinel.
//!
//! The selector owns a `SelectionGroup` and rebuilds its item set whenever
//! its configuration changes. Selections are reported as a discriminated
//! kind rather than a raw item reference, so hosts never have to inspect
//! item entities.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    interaction::{Clickable, Clicked, PointerSystems},
    presentation::ClassIntent,
    selection::{
        GroupItem, ItemDeselected, ItemSelected, SelectRequest, SelectionChanged, SelectionGroup,
        SelectionSystems,
    },
};

pub const SCROLL_CONTAINER_CLASS: &str = "color-selector-scroll-container";
pub const DISABLE_EXTERNAL_CLASS: &str = "color-selector-ext-disable-button";
pub const DISABLE_INTERNAL_CLASS: &str = "color-selector-int-disable-button";
pub const ITEM_BASE_CLASS: &str = "color-selector-base-background";
pub const ITEM_SELECTED_CLASS: &str = "color-selector-ext-color-button";
pub const COLOR_INTERNAL_CLASS: &str = "color-selector-int-color-button";
pub const NUMBER_INTERNAL_CLASS: &str = "color-selector-int-number-button";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ColorSelectorSystems {
    Rebuild,
    Route,
    Report,
}

/// What an item in the selector stands for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSelection {
    /// The sentinel that switches the selected effect off.
    Disable,
    Color(Color),
    /// 1-based numbered option.
    Index(usize),
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct SelectorItem(pub ColorSelection);

#[derive(Component, Clone, Debug, Default)]
#[require(SelectionGroup)]
pub struct ColorSelector {
    pub colors: Vec<Color>,
    pub animations: usize,
}

impl ColorSelector {
    pub fn from_config(config: &ColorSelectorConfig) -> Self {
        Self {
            colors: config
                .colors
                .iter()
                .map(|&[r, g, b, a]| Color::srgba(r, g, b, a))
                .collect(),
            animations: config.animations,
        }
    }
}

/// Markup-facing configuration; colors cross the boundary as RGBA arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorSelectorConfig {
    pub colors: Vec<[f32; 4]>,
    pub animations: usize,
}

/// The active item changed, reported by kind.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ColorSelected {
    pub selector: Entity,
    pub selection: ColorSelection,
}

/// Rebuilds the item set whenever the selector configuration changes and
/// activates the disable sentinel as the initial selection.
pub fn rebuild_selector_items(
    mut commands: Commands,
    mut selector_query: Query<
        (Entity, &ColorSelector, Option<&Children>, &mut SelectionGroup),
        Changed<ColorSelector>,
    >,
    item_query: Query<(), With<SelectorItem>>,
    mut requests: MessageWriter<SelectRequest>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for (selector_entity, selector, children, mut group) in selector_query.iter_mut() {
        if let Some(children) = children {
            for child in children.iter() {
                if item_query.get(child).is_ok() {
                    commands.entity(child).despawn();
                }
            }
        }
        group.reset();

        let mut spawn_item = |kind: ColorSelection, name: String| -> Entity {
            let item = commands
                .spawn((
                    Name::new(name),
                    SelectorItem(kind),
                    GroupItem::new(selector_entity),
                    Clickable::default(),
                ))
                .id();
            commands.entity(selector_entity).add_child(item);
            item
        };

        let sentinel = spawn_item(ColorSelection::Disable, "disable_button".to_owned());
        classes.write(ClassIntent::added(sentinel, DISABLE_EXTERNAL_CLASS));
        classes.write(ClassIntent::added(sentinel, DISABLE_INTERNAL_CLASS));
        group.add_item(sentinel);

        for (index, &color) in selector.colors.iter().enumerate() {
            let item = spawn_item(
                ColorSelection::Color(color),
                format!("color_button_{index}"),
            );
            classes.write(ClassIntent::added(item, ITEM_BASE_CLASS));
            classes.write(ClassIntent::added(item, COLOR_INTERNAL_CLASS));
            group.add_item(item);
        }
        for number in 1..=selector.animations {
            let item = spawn_item(
                ColorSelection::Index(number),
                format!("number_button_{number}"),
            );
            classes.write(ClassIntent::added(item, ITEM_BASE_CLASS));
            classes.write(ClassIntent::added(item, NUMBER_INTERNAL_CLASS));
            group.add_item(item);
        }

        requests.write(SelectRequest {
            group: selector_entity,
            item: Some(sentinel),
        });
    }
}

/// Routes clicks on items to their owning group.
pub fn route_selector_clicks(
    mut clicks: MessageReader<Clicked>,
    item_query: Query<&GroupItem, With<SelectorItem>>,
    mut requests: MessageWriter<SelectRequest>,
) {
    for click in clicks.read() {
        if let Ok(item) = item_query.get(click.target) {
            requests.write(SelectRequest {
                group: item.group,
                item: Some(click.target),
            });
        }
    }
}

/// Reports selection transitions by item kind.
pub fn report_color_selection(
    mut changes: MessageReader<SelectionChanged>,
    selector_query: Query<(), With<ColorSelector>>,
    item_query: Query<&SelectorItem>,
    mut selected: MessageWriter<ColorSelected>,
) {
    for change in changes.read() {
        if selector_query.get(change.group).is_err() {
            continue;
        }
        let Some(item) = change.item else {
            continue;
        };
        let Ok(kind) = item_query.get(item) else {
            continue;
        };
        selected.write(ColorSelected {
            selector: change.group,
            selection: kind.0,
        });
    }
}

/// Mirrors selection transitions into item border classes, outgoing item
/// first.
pub fn style_selector_items(
    mut deselections: MessageReader<ItemDeselected>,
    mut selections: MessageReader<ItemSelected>,
    item_query: Query<(), With<SelectorItem>>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for deselection in deselections.read() {
        if item_query.get(deselection.item).is_ok() {
            classes.write(ClassIntent::removed(deselection.item, ITEM_SELECTED_CLASS));
        }
    }
    for selection in selections.read() {
        if item_query.get(selection.item).is_ok() {
            classes.write(ClassIntent::added(selection.item, ITEM_SELECTED_CLASS));
        }
    }
}

pub struct ColorSelectorPlugin;

impl Plugin for ColorSelectorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        if !app.is_plugin_added::<crate::interaction::PointerPlugin>() {
            app.add_plugins(crate::interaction::PointerPlugin);
        }
        if !app.is_plugin_added::<crate::selection::SelectionPlugin>() {
            app.add_plugins(crate::selection::SelectionPlugin);
        }
        app.add_message::<ColorSelected>()
            .configure_sets(
                Update,
                (
                    ColorSelectorSystems::Rebuild.before(SelectionSystems::Apply),
                    ColorSelectorSystems::Route
                        .after(PointerSystems::Click)
                        .before(SelectionSystems::Apply),
                    ColorSelectorSystems::Report.after(SelectionSystems::Apply),
                ),
            )
            .add_systems(
                Update,
                (
                    rebuild_selector_items.in_set(ColorSelectorSystems::Rebuild),
                    route_selector_clicks.in_set(ColorSelectorSystems::Route),
                    (report_color_selection, style_selector_items)
                        .in_set(ColorSelectorSystems::Report),
                ),
            );
    }
}
