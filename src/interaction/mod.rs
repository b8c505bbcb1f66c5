//! Pointer gesture primitives shared by every widget.
//!
//! The host performs hit testing and delivers `PointerPressed` /
//! `PointerReleased` per target entity. Behavioral truth for an in-progress
//! drag lives in `DragCapture`; click pairing lives in `Clickable`. Both pair
//! events by pointer id, so stray or multi-touch events degrade to no-ops
//! instead of corrupting a gesture.
use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum PointerSystems {
    Drag,
    Click,
}

/// Pointer-down on a hit-tested target, delivered by the host.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PointerPressed {
    pub target: Entity,
    pub pointer_id: u64,
    pub position: Vec2,
}

/// Pointer-up on a hit-tested target, delivered by the host.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PointerReleased {
    pub target: Entity,
    pub pointer_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureKind {
    Acquire,
    Release,
}

/// Exclusive pointer-capture request for the host input layer.
///
/// Every acquired capture is paired with a release on all exit paths,
/// including removal of the capturing component mid-drag.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    pub target: Entity,
    pub pointer_id: u64,
    pub kind: CaptureKind,
}

/// A drag gesture began on the target.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct DragStarted {
    pub target: Entity,
    pub pointer_id: u64,
    pub position: Vec2,
}

/// The matching pointer-up for an active drag arrived. Emitted exactly once
/// per completed gesture; this is the handoff point where write authority
/// over a control's value moves from input to animation.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragEnded {
    pub target: Entity,
    pub pointer_id: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging { pointer_id: u64, start: Vec2 },
}

/// Drag-capture state machine. At most one gesture is active per control;
/// the first gesture wins and later pointer-downs are ignored until it ends.
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(on_remove = DragCapture::on_remove)]
pub struct DragCapture {
    phase: DragPhase,
}

impl DragCapture {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Accepts a pointer-down. Returns `false` while another gesture is
    /// already active.
    fn begin(&mut self, pointer_id: u64, start: Vec2) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.phase = DragPhase::Dragging { pointer_id, start };
        true
    }

    /// Accepts a pointer-up. Returns `true` only when the id matches the
    /// captured gesture; anything else leaves the state untouched.
    fn finish(&mut self, pointer_id: u64) -> bool {
        match self.phase {
            DragPhase::Dragging {
                pointer_id: active, ..
            } if active == pointer_id => {
                self.phase = DragPhase::Idle;
                true
            }
            _ => false,
        }
    }

    fn on_remove(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(capture) = world.entity(entity).get::<DragCapture>().copied() else {
            return;
        };
        let DragPhase::Dragging { pointer_id, .. } = capture.phase else {
            return;
        };
        // The host must not be left with a stuck capture when a widget is
        // torn down mid-gesture.
        if let Some(mut requests) = world.get_resource_mut::<Messages<CaptureRequest>>() {
            requests.write(CaptureRequest {
                target: entity,
                pointer_id,
                kind: CaptureKind::Release,
            });
        }
    }
}

/// Advances drag state machines from this frame's pointer messages.
pub fn track_drag_gestures(
    mut pressed: MessageReader<PointerPressed>,
    mut released: MessageReader<PointerReleased>,
    mut drag_query: Query<&mut DragCapture>,
    mut capture_requests: MessageWriter<CaptureRequest>,
    mut drag_started: MessageWriter<DragStarted>,
    mut drag_ended: MessageWriter<DragEnded>,
) {
    for press in pressed.read() {
        let Ok(mut capture) = drag_query.get_mut(press.target) else {
            continue;
        };
        if capture.begin(press.pointer_id, press.position) {
            capture_requests.write(CaptureRequest {
                target: press.target,
                pointer_id: press.pointer_id,
                kind: CaptureKind::Acquire,
            });
            drag_started.write(DragStarted {
                target: press.target,
                pointer_id: press.pointer_id,
                position: press.position,
            });
        } else {
            debug!(
                "ignored pointer-down {} on {:?}: gesture already active",
                press.pointer_id, press.target
            );
        }
    }

    for release in released.read() {
        let Ok(mut capture) = drag_query.get_mut(release.target) else {
            continue;
        };
        if capture.finish(release.pointer_id) {
            capture_requests.write(CaptureRequest {
                target: release.target,
                pointer_id: release.pointer_id,
                kind: CaptureKind::Release,
            });
            drag_ended.write(DragEnded {
                target: release.target,
                pointer_id: release.pointer_id,
            });
        }
    }
}

/// The pressed/released pair completed on the target.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clicked {
    pub target: Entity,
}

/// Click pairing for non-draggable controls: a click is a pointer-up whose id
/// matches the pointer-down previously accepted by the same target.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Clickable {
    pressed_by: Option<u64>,
}

impl Clickable {
    pub fn is_pressed(&self) -> bool {
        self.pressed_by.is_some()
    }
}

pub fn track_clicks(
    mut pressed: MessageReader<PointerPressed>,
    mut released: MessageReader<PointerReleased>,
    mut clickable_query: Query<&mut Clickable>,
    mut clicked: MessageWriter<Clicked>,
) {
    for press in pressed.read() {
        if let Ok(mut clickable) = clickable_query.get_mut(press.target) {
            if clickable.pressed_by.is_none() {
                clickable.pressed_by = Some(press.pointer_id);
            }
        }
    }

    for release in released.read() {
        let Ok(mut clickable) = clickable_query.get_mut(release.target) else {
            continue;
        };
        if clickable.pressed_by == Some(release.pointer_id) {
            clickable.pressed_by = None;
            clicked.write(Clicked {
                target: release.target,
            });
        }
    }
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerPressed>()
            .add_message::<PointerReleased>()
            .add_message::<CaptureRequest>()
            .add_message::<DragStarted>()
            .add_message::<DragEnded>()
            .add_message::<Clicked>()
            .add_systems(
                Update,
                (
                    track_drag_gestures.in_set(PointerSystems::Drag),
                    track_clicks
                        .in_set(PointerSystems::Click)
                        .after(PointerSystems::Drag),
                ),
            );
    }
}
