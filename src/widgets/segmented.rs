//! Four-segment mutually-exclusive button row.
//!
//! The outer segments are rounded, the inner pair stretched; at most one
//! segment is active and the row can be cleared back to no selection.
//! Class names keep the spellings the shipped stylesheets use, typos
//! included, so existing markup keeps working.
use bevy::prelude::*;
use enum_map::{Enum, EnumMap};

use crate::{
    interaction::{Clickable, Clicked, PointerSystems},
    presentation::ClassIntent,
    selection::{
        GroupItem, ItemDeselected, ItemSelected, SelectRequest, SelectionChanged, SelectionGroup,
        SelectionSystems,
    },
};

pub const CONTAINER_CLASS: &str = "multi-dependant-button-container";
pub const ROUNDED_CLASS: &str = "multi-dependant-rounded-button";
pub const STRETCHED_CLASS: &str = "multi-dependant-streched-button";
pub const ACTIVE_CLASS: &str = "multi-depentdant-button-active";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SegmentedSystems {
    Ensure,
    Route,
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum SegmentRole {
    OuterLeft,
    InnerLeft,
    InnerRight,
    OuterRight,
}

impl SegmentRole {
    pub const fn base_class(self) -> &'static str {
        match self {
            SegmentRole::OuterLeft | SegmentRole::OuterRight => ROUNDED_CLASS,
            SegmentRole::InnerLeft | SegmentRole::InnerRight => STRETCHED_CLASS,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            SegmentRole::OuterLeft => "segment_outer_left",
            SegmentRole::InnerLeft => "segment_inner_left",
            SegmentRole::InnerRight => "segment_inner_right",
            SegmentRole::OuterRight => "segment_outer_right",
        }
    }
}

/// The row marker; segments are spawned as children on first sight.
#[derive(Component, Clone, Copy, Debug, Default)]
#[require(SelectionGroup)]
pub struct SegmentedButtons;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub role: SegmentRole,
}

/// Role-addressed lookup of the spawned segment entities.
#[derive(Component, Clone, Copy, Debug)]
pub struct SegmentMap(pub EnumMap<SegmentRole, Entity>);

/// Activates a segment by role, or clears the row with `None`.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectSegment {
    pub row: Entity,
    pub role: Option<SegmentRole>,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSelected {
    pub row: Entity,
    pub role: Option<SegmentRole>,
}

/// Spawns the four segments for each new row.
pub fn ensure_segments(
    mut commands: Commands,
    mut row_query: Query<
        (Entity, &mut SelectionGroup),
        (With<SegmentedButtons>, Without<SegmentMap>),
    >,
    mut classes: MessageWriter<ClassIntent>,
) {
    for (row_entity, mut group) in row_query.iter_mut() {
        let map = EnumMap::from_fn(|role: SegmentRole| {
            let segment = commands
                .spawn((
                    Name::new(role.name()),
                    Segment { role },
                    GroupItem::new(row_entity),
                    Clickable::default(),
                ))
                .id();
            commands.entity(row_entity).add_child(segment);
            classes.write(ClassIntent::added(segment, role.base_class()));
            group.add_item(segment);
            segment
        });
        commands.entity(row_entity).insert(SegmentMap(map));
    }
}

/// Resolves role-addressed activation requests onto the selection group.
pub fn route_segment_requests(
    mut requests: MessageReader<SelectSegment>,
    row_query: Query<&SegmentMap, With<SegmentedButtons>>,
    mut selections: MessageWriter<SelectRequest>,
) {
    for request in requests.read() {
        let Ok(map) = row_query.get(request.row) else {
            warn!("segment request for non-row entity {:?}", request.row);
            continue;
        };
        selections.write(SelectRequest {
            group: request.row,
            item: request.role.map(|role| map.0[role]),
        });
    }
}

pub fn route_segment_clicks(
    mut clicks: MessageReader<Clicked>,
    segment_query: Query<&GroupItem, With<Segment>>,
    mut selections: MessageWriter<SelectRequest>,
) {
    for click in clicks.read() {
        if let Ok(item) = segment_query.get(click.target) {
            selections.write(SelectRequest {
                group: item.group,
                item: Some(click.target),
            });
        }
    }
}

/// Reports transitions by role and mirrors them into active classes.
pub fn report_segment_selection(
    mut deselections: MessageReader<ItemDeselected>,
    mut selections: MessageReader<ItemSelected>,
    mut changes: MessageReader<SelectionChanged>,
    row_query: Query<(), With<SegmentedButtons>>,
    segment_query: Query<&Segment>,
    mut reported: MessageWriter<SegmentSelected>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for deselection in deselections.read() {
        if segment_query.get(deselection.item).is_ok() {
            classes.write(ClassIntent::removed(deselection.item, ACTIVE_CLASS));
        }
    }
    for selection in selections.read() {
        if segment_query.get(selection.item).is_ok() {
            classes.write(ClassIntent::added(selection.item, ACTIVE_CLASS));
        }
    }
    for change in changes.read() {
        if row_query.get(change.group).is_err() {
            continue;
        }
        let role = change
            .item
            .and_then(|item| segment_query.get(item).ok())
            .map(|segment| segment.role);
        reported.write(SegmentSelected {
            row: change.group,
            role,
        });
    }
}

pub struct SegmentedPlugin;

impl Plugin for SegmentedPlugin {
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
        app.add_message::<SelectSegment>()
            .add_message::<SegmentSelected>()
            .configure_sets(
                Update,
                (
                    SegmentedSystems::Ensure.before(SegmentedSystems::Route),
                    SegmentedSystems::Route
                        .after(PointerSystems::Click)
                        .before(SelectionSystems::Apply),
                    SegmentedSystems::Report.after(SelectionSystems::Apply),
                ),
            )
            .add_systems(
                Update,
                (
                    ensure_segments.in_set(SegmentedSystems::Ensure),
                    (route_segment_requests, route_segment_clicks)
                        .in_set(SegmentedSystems::Route),
                    report_segment_selection.in_set(SegmentedSystems::Report),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{presentation::PresentationPlugin, selection::SelectionPlugin};

    fn row_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            PresentationPlugin,
            crate::interaction::PointerPlugin,
            SelectionPlugin,
            SegmentedPlugin,
        ));
        app
    }

    fn reported(app: &mut App) -> Vec<SegmentSelected> {
        let mut reader = app
            .world_mut()
            .resource_mut::<Messages<SegmentSelected>>()
            .get_cursor();
        reader
            .read(app.world().resource::<Messages<SegmentSelected>>())
            .copied()
            .collect()
    }

    #[test]
    fn a_row_grows_its_four_segments() {
        let mut app = row_app();
        let row = app.world_mut().spawn(SegmentedButtons).id();
        app.update();

        let map = app.world().get::<SegmentMap>(row).expect("segment map");
        for (role, &segment) in map.0.iter() {
            assert_eq!(
                app.world().get::<Segment>(segment),
                Some(&Segment { role })
            );
        }
        assert_eq!(
            app.world()
                .get::<SelectionGroup>(row)
                .unwrap()
                .items()
                .len(),
            4
        );
    }

    #[test]
    fn role_requests_activate_exactly_one_segment() {
        let mut app = row_app();
        let row = app.world_mut().spawn(SegmentedButtons).id();
        app.update();

        app.world_mut()
            .resource_mut::<Messages<SelectSegment>>()
            .write(SelectSegment {
                row,
                role: Some(SegmentRole::InnerLeft),
            });
        app.update();
        assert_eq!(
            reported(&mut app),
            vec![SegmentSelected {
                row,
                role: Some(SegmentRole::InnerLeft)
            }]
        );

        // Re-selecting the active role is a no-op.
        app.world_mut()
            .resource_mut::<Messages<SelectSegment>>()
            .write(SelectSegment {
                row,
                role: Some(SegmentRole::InnerLeft),
            });
        app.update();
        app.update();
        assert!(reported(&mut app).is_empty());
    }

    #[test]
    fn clearing_the_row_deactivates_the_active_segment() {
        let mut app = row_app();
        let row = app.world_mut().spawn(SegmentedButtons).id();
        app.update();

        app.world_mut()
            .resource_mut::<Messages<SelectSegment>>()
            .write(SelectSegment {
                row,
                role: Some(SegmentRole::OuterRight),
            });
        app.update();
        let map = *app.world().get::<SegmentMap>(row).unwrap();
        let active = map.0[SegmentRole::OuterRight];

        let mut cursor = app.world().resource::<Messages<ClassIntent>>().get_cursor();
        let _ = cursor
            .read(app.world().resource::<Messages<ClassIntent>>())
            .count();

        app.world_mut()
            .resource_mut::<Messages<SelectSegment>>()
            .write(SelectSegment { row, role: None });
        app.update();

        assert_eq!(
            reported(&mut app),
            vec![
                SegmentSelected {
                    row,
                    role: Some(SegmentRole::OuterRight)
                },
                SegmentSelected { row, role: None },
            ]
        );
        let intents: Vec<ClassIntent> = cursor
            .read(app.world().resource::<Messages<ClassIntent>>())
            .copied()
            .collect();
        assert_eq!(
            intents,
            vec![ClassIntent::removed(active, ACTIVE_CLASS)]
        );
        assert_eq!(app.world().get::<SelectionGroup>(row).unwrap().active(), None);
    }
}
