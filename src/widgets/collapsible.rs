//! Collapsible button with an associated content panel.
//!
//! The button has three independent state axes (activation, icon switch,
//! expansion); clicking inverts expansion and activation and toggles the
//! linked content panel. Hidden content stays in layout for a fixed delay so
//! a style transition can finish, then a `DisplayIntent` removes it. Any
//! visibility change cancels the pending removal first, so a fast
//! show-hide-show burst can never fire a stale removal.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    interaction::{Clickable, Clicked, PointerSystems},
    presentation::{ClassIntent, DisplayIntent},
};

pub const BUTTON_CLASS: &str = "collapsable-button";
pub const BUTTON_COMPACT_CLASS: &str = "collapsable-button-compact";
pub const BUTTON_ACTIVE_CLASS: &str = "collapsable-button-active";
pub const IMAGE_ACTIVE_CLASS: &str = "collapsable-button-image-container-compact";
pub const ICON_ALTERNATIVE_CLASS: &str = "collapsable-button-icon-alternative";
pub const ELEMENT_SHOWN_BASE_CLASS: &str = "element-shown-base";
pub const ELEMENT_HIDDEN_CLASS: &str = "element-hidden";

/// Time the hide transition is given before content leaves layout flow.
pub const CONTENT_DISPLAY_DELAY: Duration = Duration::from_millis(400);

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum CollapsibleSystems {
    Resolve,
    Toggle,
    TickPending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    #[default]
    Inactive,
    Active,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IconSwitch {
    #[default]
    Off,
    On,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expansion {
    #[default]
    Expanded,
    Collapsed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentVisibility {
    #[default]
    Shown,
    Hidden,
}

/// The collapsible button itself. `content_name` names a sibling tree node
/// to drive; it is resolved once, right after the widget joins the tree.
#[derive(Component, Clone, Debug, Default)]
#[require(Clickable)]
pub struct CollapsibleButton {
    pub content_name: Option<String>,
    activation: Activation,
    icon: IconSwitch,
    expansion: Expansion,
}

impl CollapsibleButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content_name: impl Into<String>) -> Self {
        Self {
            content_name: Some(content_name.into()),
            ..Self::default()
        }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn icon(&self) -> IconSwitch {
        self.icon
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }
}

/// Result of the one-time content association. Present means the lookup ran;
/// `None` inside means no content was configured or found.
#[derive(Component, Clone, Copy, Debug)]
pub struct ContentLink(pub Option<Entity>);

#[derive(Clone, Debug)]
struct PendingDisplay {
    timer: Timer,
    shown: bool,
}

/// Visibility state machine of the associated content panel.
#[derive(Component, Clone, Debug, Default)]
pub struct CollapsibleContent {
    state: ContentVisibility,
    pending: Option<PendingDisplay>,
}

impl CollapsibleContent {
    pub fn state(&self) -> ContentVisibility {
        self.state
    }

    pub fn has_pending_display_change(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetExpansion {
    pub button: Entity,
    pub state: Expansion,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetIconSwitch {
    pub button: Entity,
    pub state: IconSwitch,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollapsibleToggled {
    pub button: Entity,
    pub expansion: Expansion,
    pub activation: Activation,
}

/// Resolves `content_name` to a sibling entity by `Name`, exactly once per
/// widget. The attempt happens on the first frame the widget exists and is
/// never repeated, matching a one-shot attach callback.
pub fn resolve_content_links(
    mut commands: Commands,
    button_query: Query<(Entity, &CollapsibleButton), Without<ContentLink>>,
    parent_query: Query<&ChildOf>,
    children_query: Query<&Children>,
    name_query: Query<&Name>,
    mut classes: MessageWriter<ClassIntent>,
    mut displays: MessageWriter<DisplayIntent>,
) {
    for (button_entity, button) in button_query.iter() {
        let Some(content_name) = button.content_name.as_deref() else {
            commands.entity(button_entity).insert(ContentLink(None));
            continue;
        };

        let content = parent_query
            .get(button_entity)
            .ok()
            .and_then(|child_of| children_query.get(child_of.parent()).ok())
            .and_then(|siblings| {
                siblings.iter().find(|&sibling| {
                    sibling != button_entity
                        && name_query
                            .get(sibling)
                            .is_ok_and(|name| name.as_str() == content_name)
                })
            });

        match content {
            Some(content) => {
                // Content starts hidden and out of layout; the first click
                // reveals it.
                commands.entity(content).insert(CollapsibleContent {
                    state: ContentVisibility::Hidden,
                    pending: None,
                });
                classes.write(ClassIntent::added(content, ELEMENT_SHOWN_BASE_CLASS));
                classes.write(ClassIntent::added(content, ELEMENT_HIDDEN_CLASS));
                displays.write(DisplayIntent {
                    target: content,
                    shown: false,
                });
                commands
                    .entity(button_entity)
                    .insert(ContentLink(Some(content)));
            }
            None => {
                warn!(
                    "collapsible button {:?} found no sibling named {:?}",
                    button_entity, content_name
                );
                commands.entity(button_entity).insert(ContentLink(None));
            }
        }
    }
}

fn set_content_visibility(
    content_entity: Entity,
    content: &mut CollapsibleContent,
    next: ContentVisibility,
    classes: &mut MessageWriter<ClassIntent>,
    displays: &mut MessageWriter<DisplayIntent>,
) {
    if content.state == next {
        return;
    }
    content.state = next;

    match next {
        ContentVisibility::Shown => {
            // Cancel any pending removal before re-entering layout, then let
            // the reveal transition play.
            content.pending = None;
            displays.write(DisplayIntent {
                target: content_entity,
                shown: true,
            });
            classes.write(ClassIntent::removed(content_entity, ELEMENT_HIDDEN_CLASS));
        }
        ContentVisibility::Hidden => {
            classes.write(ClassIntent::added(content_entity, ELEMENT_HIDDEN_CLASS));
            content.pending = Some(PendingDisplay {
                timer: Timer::new(CONTENT_DISPLAY_DELAY, TimerMode::Once),
                shown: false,
            });
        }
    }
}

/// Click entry point: inverts expansion and activation, then toggles the
/// linked content panel.
pub fn handle_collapsible_clicks(
    mut clicks: MessageReader<Clicked>,
    mut button_query: Query<(&mut CollapsibleButton, &ContentLink)>,
    mut content_query: Query<&mut CollapsibleContent>,
    mut toggled: MessageWriter<CollapsibleToggled>,
    mut classes: MessageWriter<ClassIntent>,
    mut displays: MessageWriter<DisplayIntent>,
) {
    for click in clicks.read() {
        let Ok((mut button, link)) = button_query.get_mut(click.target) else {
            continue;
        };

        button.expansion = match button.expansion {
            Expansion::Expanded => Expansion::Collapsed,
            Expansion::Collapsed => Expansion::Expanded,
        };
        let compact = button.expansion == Expansion::Collapsed;
        classes.write(ClassIntent {
            target: click.target,
            class: BUTTON_COMPACT_CLASS,
            applied: compact,
        });
        classes.write(ClassIntent {
            target: click.target,
            class: IMAGE_ACTIVE_CLASS,
            applied: compact,
        });

        button.activation = match button.activation {
            Activation::Inactive => Activation::Active,
            Activation::Active => Activation::Inactive,
        };
        classes.write(ClassIntent {
            target: click.target,
            class: BUTTON_ACTIVE_CLASS,
            applied: button.activation == Activation::Active,
        });

        if let Some(content_entity) = link.0 {
            if let Ok(mut content) = content_query.get_mut(content_entity) {
                let next = match content.state {
                    ContentVisibility::Shown => ContentVisibility::Hidden,
                    ContentVisibility::Hidden => ContentVisibility::Shown,
                };
                set_content_visibility(
                    content_entity,
                    &mut content,
                    next,
                    &mut classes,
                    &mut displays,
                );
            }
        }

        toggled.write(CollapsibleToggled {
            button: click.target,
            expansion: button.expansion,
            activation: button.activation,
        });
    }
}

/// Direct expansion assignment (markup attribute path); idempotent.
pub fn apply_expansion_requests(
    mut requests: MessageReader<SetExpansion>,
    mut button_query: Query<&mut CollapsibleButton>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for request in requests.read() {
        let Ok(mut button) = button_query.get_mut(request.button) else {
            continue;
        };
        if button.expansion == request.state {
            continue;
        }
        button.expansion = request.state;
        classes.write(ClassIntent {
            target: request.button,
            class: BUTTON_COMPACT_CLASS,
            applied: request.state == Expansion::Collapsed,
        });
    }
}

/// Direct icon-switch assignment (markup attribute path); idempotent.
pub fn apply_icon_switch_requests(
    mut requests: MessageReader<SetIconSwitch>,
    mut button_query: Query<&mut CollapsibleButton>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for request in requests.read() {
        let Ok(mut button) = button_query.get_mut(request.button) else {
            continue;
        };
        if button.icon == request.state {
            continue;
        }
        button.icon = request.state;
        classes.write(ClassIntent {
            target: request.button,
            class: ICON_ALTERNATIVE_CLASS,
            applied: request.state == IconSwitch::On,
        });
    }
}

/// Fires deferred display changes once their delay elapses.
pub fn tick_pending_display_changes(
    time: Res<Time>,
    mut content_query: Query<(Entity, &mut CollapsibleContent)>,
    mut displays: MessageWriter<DisplayIntent>,
) {
    for (entity, mut content) in content_query.iter_mut() {
        let Some(pending) = content.pending.as_mut() else {
            continue;
        };
        pending.timer.tick(time.delta());
        if pending.timer.finished() {
            let shown = pending.shown;
            content.pending = None;
            displays.write(DisplayIntent {
                target: entity,
                shown,
            });
        }
    }
}

pub struct CollapsiblePlugin;

impl Plugin for CollapsiblePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        if !app.is_plugin_added::<crate::interaction::PointerPlugin>() {
            app.add_plugins(crate::interaction::PointerPlugin);
        }
        app.add_message::<SetExpansion>()
            .add_message::<SetIconSwitch>()
            .add_message::<CollapsibleToggled>()
            .configure_sets(
                Update,
                (
                    CollapsibleSystems::Resolve,
                    CollapsibleSystems::Toggle
                        .after(CollapsibleSystems::Resolve)
                        .after(PointerSystems::Click),
                    CollapsibleSystems::TickPending.after(CollapsibleSystems::Toggle),
                ),
            )
            .add_systems(
                Update,
                (
                    resolve_content_links.in_set(CollapsibleSystems::Resolve),
                    (
                        handle_collapsible_clicks,
                        apply_expansion_requests,
                        apply_icon_switch_requests,
                    )
                        .in_set(CollapsibleSystems::Toggle),
                    tick_pending_display_changes.in_set(CollapsibleSystems::TickPending),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interaction::{PointerPlugin, PointerPressed, PointerReleased},
        presentation::PresentationPlugin,
    };

    fn widget_app() -> App {
        let mut app = App::new();
        app.add_plugins((PresentationPlugin, PointerPlugin, CollapsiblePlugin));
        app.init_resource::<Time>();
        app
    }

    fn spawn_linked_pair(app: &mut App) -> (Entity, Entity) {
        let parent = app.world_mut().spawn_empty().id();
        let button = app
            .world_mut()
            .spawn((CollapsibleButton::with_content("settings_panel"), ChildOf(parent)))
            .id();
        let content = app
            .world_mut()
            .spawn((Name::new("settings_panel"), ChildOf(parent)))
            .id();
        app.update();
        (button, content)
    }

    fn click(app: &mut App, target: Entity) {
        app.world_mut()
            .resource_mut::<Messages<PointerPressed>>()
            .write(PointerPressed {
                target,
                pointer_id: 1,
                position: Vec2::ZERO,
            });
        app.world_mut()
            .resource_mut::<Messages<PointerReleased>>()
            .write(PointerReleased {
                target,
                pointer_id: 1,
            });
    }

    #[test]
    fn association_resolves_once_to_the_named_sibling() {
        let mut app = widget_app();
        let (button, content) = spawn_linked_pair(&mut app);

        let link = app.world().get::<ContentLink>(button).expect("link");
        assert_eq!(link.0, Some(content));
        assert_eq!(
            app.world().get::<CollapsibleContent>(content).unwrap().state(),
            ContentVisibility::Hidden
        );
    }

    #[test]
    fn click_inverts_expansion_and_activation_and_shows_content() {
        let mut app = widget_app();
        let (button, content) = spawn_linked_pair(&mut app);

        click(&mut app, button);
        app.update();

        let state = app.world().get::<CollapsibleButton>(button).unwrap();
        assert_eq!(state.expansion(), Expansion::Collapsed);
        assert_eq!(state.activation(), Activation::Active);
        assert_eq!(
            app.world().get::<CollapsibleContent>(content).unwrap().state(),
            ContentVisibility::Shown
        );
    }

    #[test]
    fn hide_defers_layout_removal_by_the_fixed_delay() {
        let mut app = widget_app();
        let (button, content) = spawn_linked_pair(&mut app);

        click(&mut app, button); // show
        app.update();
        click(&mut app, button); // hide
        app.update();

        let mut cursor = app
            .world()
            .resource::<Messages<DisplayIntent>>()
            .get_cursor();
        let _ = cursor
            .read(app.world().resource::<Messages<DisplayIntent>>())
            .count();

        // Not yet out of layout...
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(200));
        app.update();
        let early: Vec<DisplayIntent> = cursor
            .read(app.world().resource::<Messages<DisplayIntent>>())
            .copied()
            .collect();
        assert!(early.is_empty());

        // ...until the delay elapses.
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(250));
        app.update();
        let fired: Vec<DisplayIntent> = cursor
            .read(app.world().resource::<Messages<DisplayIntent>>())
            .copied()
            .collect();
        assert_eq!(
            fired,
            vec![DisplayIntent {
                target: content,
                shown: false
            }]
        );
    }

    #[test]
    fn rapid_reshow_cancels_the_pending_removal() {
        let mut app = widget_app();
        let (button, content) = spawn_linked_pair(&mut app);

        click(&mut app, button); // show
        app.update();
        click(&mut app, button); // hide, removal pending
        app.update();
        click(&mut app, button); // show again before the delay elapses
        app.update();

        let mut cursor = app
            .world()
            .resource::<Messages<DisplayIntent>>()
            .get_cursor();
        let _ = cursor
            .read(app.world().resource::<Messages<DisplayIntent>>())
            .count();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();

        // The stale removal never fires; the content is still shown.
        let late: Vec<DisplayIntent> = cursor
            .read(app.world().resource::<Messages<DisplayIntent>>())
            .copied()
            .collect();
        assert!(late.is_empty());
        let state = app.world().get::<CollapsibleContent>(content).unwrap();
        assert_eq!(state.state(), ContentVisibility::Shown);
        assert!(!state.has_pending_display_change());
    }

    #[test]
    fn direct_expansion_assignment_is_idempotent() {
        let mut app = widget_app();
        let (button, _) = spawn_linked_pair(&mut app);

        app.world_mut()
            .resource_mut::<Messages<SetExpansion>>()
            .write(SetExpansion {
                button,
                state: Expansion::Expanded,
            });
        app.update();

        let mut reader = app
            .world_mut()
            .resource_mut::<Messages<ClassIntent>>()
            .get_cursor();
        let compact_intents = reader
            .read(app.world().resource::<Messages<ClassIntent>>())
            .filter(|intent| intent.class == BUTTON_COMPACT_CLASS)
            .count();
        assert_eq!(compact_intents, 0);
    }
}
