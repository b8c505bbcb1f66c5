//! Carousel step indicator.
//!
//! A row of numbered bullets joined by connector lines; every bullet below
//! the selected step is filled. The step count is validated at assignment,
//! while out-of-range step selections are ignored the way stray input is.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presentation::ClassIntent;

pub const CONTAINER_CLASS: &str = "carrousel-counter-container";
pub const BULLET_CLASS: &str = "carrousel-counter-bullet";
pub const BULLET_ACTIVE_CLASS: &str = "carrousel-counter-bullet-active";
pub const LINE_CLASS: &str = "carrousel-counter-line";

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum StepCounterSystems {
    ApplyRequests,
    EnsureChildren,
    SyncFill,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCountError {
    #[error("step count must be at least 1")]
    Zero,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct StepCounter {
    steps: usize,
    selected: usize,
}

impl Default for StepCounter {
    fn default() -> Self {
        Self {
            steps: 3,
            selected: 0,
        }
    }
}

impl StepCounter {
    pub fn new(steps: usize) -> Result<Self, StepCountError> {
        if steps == 0 {
            return Err(StepCountError::Zero);
        }
        Ok(Self { steps, selected: 0 })
    }

    pub fn from_config(config: &StepCounterConfig) -> Result<Self, StepCountError> {
        let mut counter = Self::new(config.step_count)?;
        counter.set_selected(config.selected_step);
        Ok(counter)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Changes the number of steps. A zero count is rejected at the point
    /// of assignment; shrinking below the selected step pulls the selection
    /// down with it.
    pub fn set_steps(&mut self, steps: usize) -> Result<(), StepCountError> {
        if steps == 0 {
            return Err(StepCountError::Zero);
        }
        self.steps = steps;
        self.selected = self.selected.min(steps);
        Ok(())
    }

    /// Selects how many steps are completed. `selected == steps` fills every
    /// bullet; anything beyond that is ignored. Returns whether the value
    /// changed.
    pub fn set_selected(&mut self, step: usize) -> bool {
        if step > self.steps || step == self.selected {
            return false;
        }
        self.selected = step;
        true
    }
}

/// Markup-facing configuration, attribute names matching the host markup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StepCounterConfig {
    pub step_count: usize,
    pub selected_step: usize,
}

impl Default for StepCounterConfig {
    fn default() -> Self {
        Self {
            step_count: 3,
            selected_step: 0,
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct StepBullet {
    pub index: usize,
}

/// Connector line between bullet `index` and `index + 1`.
#[derive(Component, Clone, Copy, Debug)]
pub struct StepConnector {
    pub index: usize,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetSelectedStep {
    pub counter: Entity,
    pub step: usize,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepChanged {
    pub counter: Entity,
    pub selected: usize,
}

pub fn apply_selected_step_requests(
    mut requests: MessageReader<SetSelectedStep>,
    mut counter_query: Query<&mut StepCounter>,
    mut changed: MessageWriter<StepChanged>,
) {
    for request in requests.read() {
        let Ok(mut counter) = counter_query.get_mut(request.counter) else {
            continue;
        };
        if counter.set_selected(request.step) {
            changed.write(StepChanged {
                counter: request.counter,
                selected: request.step,
            });
        }
    }
}

/// Reconciles bullet and connector children with the configured step count.
pub fn ensure_step_children(
    mut commands: Commands,
    counter_query: Query<(Entity, &StepCounter, Option<&Children>), Changed<StepCounter>>,
    bullet_query: Query<&StepBullet>,
    connector_query: Query<&StepConnector>,
) {
    for (counter_entity, counter, children) in counter_query.iter() {
        let mut present_bullets = Vec::new();
        let mut present_connectors = Vec::new();
        if let Some(children) = children {
            for child in children.iter() {
                if let Ok(bullet) = bullet_query.get(child) {
                    if bullet.index >= counter.steps() {
                        commands.entity(child).despawn();
                    } else {
                        present_bullets.push(bullet.index);
                    }
                }
                if let Ok(connector) = connector_query.get(child) {
                    if connector.index + 1 >= counter.steps() {
                        commands.entity(child).despawn();
                    } else {
                        present_connectors.push(connector.index);
                    }
                }
            }
        }

        commands.entity(counter_entity).with_children(|parent| {
            for index in (0..counter.steps()).filter(|index| !present_bullets.contains(index)) {
                parent.spawn((
                    Name::new(format!("step_bullet_{}", index + 1)),
                    StepBullet { index },
                ));
            }
            for index in
                (0..counter.steps().saturating_sub(1)).filter(|index| !present_connectors.contains(index))
            {
                parent.spawn((
                    Name::new(format!("step_connector_{index}")),
                    StepConnector { index },
                ));
            }
        });
    }
}

/// Re-emits bullet fill classes after any counter change.
pub fn sync_step_fill(
    counter_query: Query<(&StepCounter, &Children), Changed<StepCounter>>,
    bullet_query: Query<(Entity, &StepBullet)>,
    mut classes: MessageWriter<ClassIntent>,
) {
    for (counter, children) in counter_query.iter() {
        for child in children.iter() {
            let Ok((bullet_entity, bullet)) = bullet_query.get(child) else {
                continue;
            };
            classes.write(ClassIntent {
                target: bullet_entity,
                class: BULLET_ACTIVE_CLASS,
                applied: bullet.index < counter.selected(),
            });
        }
    }
}

pub struct StepCounterPlugin;

impl Plugin for StepCounterPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<crate::presentation::PresentationPlugin>() {
            app.add_plugins(crate::presentation::PresentationPlugin);
        }
        app.add_message::<SetSelectedStep>()
            .add_message::<StepChanged>()
            .configure_sets(
                Update,
                (
                    StepCounterSystems::ApplyRequests,
                    StepCounterSystems::EnsureChildren.after(StepCounterSystems::ApplyRequests),
                    StepCounterSystems::SyncFill.after(StepCounterSystems::EnsureChildren),
                ),
            )
            .add_systems(
                Update,
                (
                    apply_selected_step_requests.in_set(StepCounterSystems::ApplyRequests),
                    ensure_step_children.in_set(StepCounterSystems::EnsureChildren),
                    sync_step_fill.in_set(StepCounterSystems::SyncFill),
                ),
            );
    }
}
