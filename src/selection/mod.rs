//! Single-active selection over dynamic groups of controls.
//!
//! Behavioral truth for "which item is active" lives on the group component.
//! `GroupItem::selected` on the item entities is a downstream presentation
//! mirror and must never be used as authoritative state by reducers.
//!
//! Groups are append-only: the widgets built on this manager create their
//! items once (or rebuild the whole set) and never remove individual items.
use bevy::prelude::*;
use smallvec::SmallVec;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SelectionSystems {
    Apply,
}

/// Ordered steps of one atomic selection transition.
///
/// The order is the contract: the outgoing item is always reported
/// deselected before the incoming item is reported selected, and the single
/// `Changed` step is always last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStep {
    Deselect(Entity),
    Select(Entity),
    Changed(Option<Entity>),
}

pub type SelectionTransition = SmallVec<[SelectionStep; 3]>;

/// A group of mutually exclusive items with at most one active at a time.
#[derive(Component, Clone, Debug, Default)]
pub struct SelectionGroup {
    items: Vec<Entity>,
    active: Option<Entity>,
}

impl SelectionGroup {
    /// Appends an item. Appending never changes the active item; initial
    /// selection is an explicit `set_active` by the owner.
    pub fn add_item(&mut self, item: Entity) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn active(&self) -> Option<Entity> {
        self.active
    }

    pub fn contains(&self, item: Entity) -> bool {
        self.items.contains(&item)
    }

    /// Clears all items and the active reference. Used by owners that
    /// rebuild their item set wholesale; no transition is reported.
    pub fn reset(&mut self) {
        self.items.clear();
        self.active = None;
    }

    /// Computes the atomic transition to `item` (or to no selection).
    ///
    /// Re-activating the current item yields an empty transition: no step,
    /// no event. Unknown items are rejected by the caller before this point.
    pub fn set_active(&mut self, item: Option<Entity>) -> SelectionTransition {
        let mut steps = SelectionTransition::new();
        if self.active == item {
            return steps;
        }

        if let Some(previous) = self.active {
            steps.push(SelectionStep::Deselect(previous));
        }
        if let Some(next) = item {
            steps.push(SelectionStep::Select(next));
        }
        steps.push(SelectionStep::Changed(item));
        self.active = item;
        steps
    }
}

/// Membership marker for item entities. `selected` mirrors the group's
/// active reference for presentation reads only.
#[derive(Component, Clone, Copy, Debug)]
pub struct GroupItem {
    pub group: Entity,
    pub selected: bool,
}

impl GroupItem {
    pub const fn new(group: Entity) -> Self {
        Self {
            group,
            selected: false,
        }
    }
}

/// Request to activate an item (or clear the selection with `None`).
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectRequest {
    pub group: Entity,
    pub item: Option<Entity>,
}

/// The previously active item left the selection.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemDeselected {
    pub group: Entity,
    pub item: Entity,
}

/// An item became the active one.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSelected {
    pub group: Entity,
    pub item: Entity,
}

/// The group's selection changed. Emitted exactly once per transition,
/// after the deselect/select pair.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChanged {
    pub group: Entity,
    pub item: Option<Entity>,
}

/// Applies queued selection requests and reports each transition step in
/// order. Item mirrors are updated in the same pass.
pub fn apply_select_requests(
    mut requests: MessageReader<SelectRequest>,
    mut group_query: Query<&mut SelectionGroup>,
    mut item_query: Query<&mut GroupItem>,
    mut deselected: MessageWriter<ItemDeselected>,
    mut selected: MessageWriter<ItemSelected>,
    mut changed: MessageWriter<SelectionChanged>,
) {
    for request in requests.read() {
        let Ok(mut group) = group_query.get_mut(request.group) else {
            warn!("selection request for unknown group {:?}", request.group);
            continue;
        };
        if let Some(item) = request.item {
            if !group.contains(item) {
                warn!(
                    "selection request for {:?} ignored: not an item of group {:?}",
                    item, request.group
                );
                continue;
            }
        }

        for step in group.set_active(request.item) {
            match step {
                SelectionStep::Deselect(item) => {
                    if let Ok(mut mirror) = item_query.get_mut(item) {
                        mirror.selected = false;
                    }
                    deselected.write(ItemDeselected {
                        group: request.group,
                        item,
                    });
                }
                SelectionStep::Select(item) => {
                    if let Ok(mut mirror) = item_query.get_mut(item) {
                        mirror.selected = true;
                    }
                    selected.write(ItemSelected {
                        group: request.group,
                        item,
                    });
                }
                SelectionStep::Changed(item) => {
                    changed.write(SelectionChanged {
                        group: request.group,
                        item,
                    });
                }
            }
        }
    }
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectRequest>()
            .add_message::<ItemDeselected>()
            .add_message::<ItemSelected>()
            .add_message::<SelectionChanged>()
            .add_systems(
                Update,
                apply_select_requests.in_set(SelectionSystems::Apply),
            );
    }
}
