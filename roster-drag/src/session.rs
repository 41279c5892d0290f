//! Drag gesture state machine.
//!
//! One session exists per board; at most one drag is active at a time.
//!
//! ```text
//!            pointer_down                 moved > activation_distance
//!   Idle ───────────────────► Pending ─────────────────────────────► Dragging
//!    ▲                          │ pointer_up (click)                   │ ▲
//!    │◄─────────────────────────┘                                      │ │ pointer_move /
//!    │                                   key_activate                  │ │ key_move
//!    │◄──────────── Resolving ◄── pointer_up / key_commit ─────────────┘─┘
//!    │                 (emits Option<DragIntent>)
//!    └──── cancel() from any state
//! ```
//!
//! `Resolving` only exists for the duration of [`DragSession::pointer_up`] or
//! [`DragSession::key_commit`]; the session is always back to `Idle` when
//! those return.

use roster_core::ActorId;
use serde::{Deserialize, Serialize};

use crate::targets::{ContainerId, DropTargets, Point};

/// Gesture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer travel (px) before a press becomes a drag.
    pub activation_distance: f32,
    /// Focus-point travel (px) per arrow key during keyboard drags.
    pub keyboard_step: f32,
    /// Drops farther than this from every target center are ignored.
    pub max_drop_distance: Option<f32>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: 5.0,
            keyboard_step: 25.0,
            max_drop_distance: None,
        }
    }
}

/// Input device driving the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Pointer,
    Keyboard,
}

/// Arrow-key direction for keyboard drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self, step: f32) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        }
    }
}

/// Per-session drag state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Pressed on a row, not yet past the activation distance.
    Pending { active: ActorId, origin: Point },
    Dragging {
        active: ActorId,
        sensor: Sensor,
        pointer: Point,
    },
    /// Drop point evaluated; `target` is `None` outside every container.
    Resolving {
        active: ActorId,
        target: Option<ContainerId>,
    },
}

/// Normalized outcome of a drop or a row button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragIntent {
    MoveToMembers(ActorId),
    MoveToAvailable(ActorId),
}

impl DragIntent {
    pub fn actor(&self) -> ActorId {
        match self {
            DragIntent::MoveToMembers(id) | DragIntent::MoveToAvailable(id) => *id,
        }
    }
}

/// Map a drop onto an intent.
///
/// Only cross-list drops move anything; same-list drops and drops outside
/// every container are no-ops.
pub fn resolve_intent(
    active: ActorId,
    target: Option<ContainerId>,
    is_member: bool,
) -> Option<DragIntent> {
    match (target, is_member) {
        (Some(ContainerId::Members), false) => Some(DragIntent::MoveToMembers(active)),
        (Some(ContainerId::Available), true) => Some(DragIntent::MoveToAvailable(active)),
        (Some(ContainerId::Members), true) | (Some(ContainerId::Available), false) | (None, _) => {
            None
        }
    }
}

/// Drives one board's drag gestures.
#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    config: DragConfig,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragSession {
    pub fn new(config: DragConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Actor being dragged, once past activation.
    pub fn active(&self) -> Option<ActorId> {
        match self.state {
            DragState::Dragging { active, .. } | DragState::Resolving { active, .. } => {
                Some(active)
            }
            DragState::Idle | DragState::Pending { .. } => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    // ───────────────────── pointer sensor ─────────────────────

    /// Press on a row. Ignored unless idle.
    pub fn pointer_down(&mut self, actor: ActorId, at: Point) -> bool {
        if self.state != DragState::Idle {
            log::trace!("pointer_down ignored: session busy ({:?})", self.state);
            return false;
        }
        self.state = DragState::Pending {
            active: actor,
            origin: at,
        };
        true
    }

    /// Pointer motion. Returns `true` while a drag is active.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        match self.state {
            DragState::Pending { active, origin } => {
                if origin.distance(&at) > self.config.activation_distance {
                    log::trace!("drag activated for {active}");
                    self.state = DragState::Dragging {
                        active,
                        sensor: Sensor::Pointer,
                        pointer: at,
                    };
                    true
                } else {
                    false
                }
            }
            DragState::Dragging {
                active,
                sensor: Sensor::Pointer,
                ..
            } => {
                self.state = DragState::Dragging {
                    active,
                    sensor: Sensor::Pointer,
                    pointer: at,
                };
                true
            }
            _ => false,
        }
    }

    /// Release the pointer and resolve the drop.
    pub fn pointer_up(
        &mut self,
        at: Point,
        targets: &DropTargets,
        is_member: impl Fn(ActorId) -> bool,
    ) -> Option<DragIntent> {
        match self.state {
            DragState::Pending { .. } => {
                // Released before activation: a click, not a drag.
                self.state = DragState::Idle;
                None
            }
            DragState::Dragging {
                active,
                sensor: Sensor::Pointer,
                ..
            } => self.resolve(active, at, targets, is_member),
            _ => None,
        }
    }

    // ───────────────────── keyboard sensor ─────────────────────

    /// Pick up a row from the keyboard. `start` is the row's center.
    pub fn key_activate(&mut self, actor: ActorId, start: Point) -> bool {
        if self.state != DragState::Idle {
            log::trace!("key_activate ignored: session busy ({:?})", self.state);
            return false;
        }
        self.state = DragState::Dragging {
            active: actor,
            sensor: Sensor::Keyboard,
            pointer: start,
        };
        true
    }

    /// Move the keyboard focus point by one step.
    pub fn key_move(&mut self, direction: Direction) -> bool {
        if let DragState::Dragging {
            active,
            sensor: Sensor::Keyboard,
            pointer,
        } = self.state
        {
            let (dx, dy) = direction.delta(self.config.keyboard_step);
            self.state = DragState::Dragging {
                active,
                sensor: Sensor::Keyboard,
                pointer: pointer.offset(dx, dy),
            };
            true
        } else {
            false
        }
    }

    /// Drop at the current keyboard focus point.
    pub fn key_commit(
        &mut self,
        targets: &DropTargets,
        is_member: impl Fn(ActorId) -> bool,
    ) -> Option<DragIntent> {
        match self.state {
            DragState::Dragging {
                active,
                sensor: Sensor::Keyboard,
                pointer,
            } => self.resolve(active, pointer, targets, is_member),
            _ => None,
        }
    }

    /// Abandon the current gesture without an intent.
    pub fn cancel(&mut self) {
        if self.state != DragState::Idle {
            log::trace!("drag cancelled from {:?}", self.state);
        }
        self.state = DragState::Idle;
    }

    fn resolve(
        &mut self,
        active: ActorId,
        at: Point,
        targets: &DropTargets,
        is_member: impl Fn(ActorId) -> bool,
    ) -> Option<DragIntent> {
        let target = targets.closest_center(at).map(|t| t.container);
        self.state = DragState::Resolving { active, target };

        let intent = resolve_intent(active, target, is_member(active));
        log::debug!("drop of {active} over {target:?} -> {intent:?}");

        self.state = DragState::Idle;
        intent
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::Aabb;

    fn columns() -> DropTargets {
        let mut t = DropTargets::new();
        t.insert_container(ContainerId::Members, Aabb::from_rect(0.0, 0.0, 200.0, 400.0));
        t.insert_container(ContainerId::Available, Aabb::from_rect(300.0, 0.0, 200.0, 400.0));
        t
    }

    const IN_MEMBERS: Point = Point { x: 100.0, y: 200.0 };
    const IN_AVAILABLE: Point = Point { x: 400.0, y: 200.0 };

    // ─────────────── resolve_intent ───────────────

    #[test]
    fn test_resolve_intent_table() {
        let a = ActorId::new();
        assert_eq!(
            resolve_intent(a, Some(ContainerId::Members), false),
            Some(DragIntent::MoveToMembers(a))
        );
        assert_eq!(
            resolve_intent(a, Some(ContainerId::Available), true),
            Some(DragIntent::MoveToAvailable(a))
        );
        assert_eq!(resolve_intent(a, Some(ContainerId::Members), true), None);
        assert_eq!(resolve_intent(a, Some(ContainerId::Available), false), None);
        assert_eq!(resolve_intent(a, None, true), None);
        assert_eq!(resolve_intent(a, None, false), None);
    }

    // ─────────────── pointer ───────────────

    #[test]
    fn test_pointer_drag_to_members() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();

        assert!(s.pointer_down(a, IN_AVAILABLE));
        assert!(matches!(s.state(), DragState::Pending { .. }));
        assert!(s.pointer_move(Point::new(380.0, 200.0)));
        assert_eq!(s.active(), Some(a));

        let intent = s.pointer_up(IN_MEMBERS, &targets, |_| false);
        assert_eq!(intent, Some(DragIntent::MoveToMembers(a)));
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn test_small_movement_does_not_activate() {
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.pointer_down(a, Point::new(10.0, 10.0));

        // Exactly at the threshold: still pending.
        assert!(!s.pointer_move(Point::new(15.0, 10.0)));
        assert!(!s.is_dragging());
        assert!(s.pointer_move(Point::new(15.1, 10.0)));
        assert!(s.is_dragging());
    }

    #[test]
    fn test_click_without_drag_is_noop() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.pointer_down(a, IN_AVAILABLE);
        assert_eq!(s.pointer_up(IN_MEMBERS, &targets, |_| false), None);
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn test_same_container_drop_is_noop() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.pointer_down(a, IN_MEMBERS);
        s.pointer_move(Point::new(120.0, 220.0));
        assert_eq!(s.pointer_up(Point::new(110.0, 210.0), &targets, |_| true), None);
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_with_no_targets_is_noop() {
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.pointer_down(a, IN_MEMBERS);
        s.pointer_move(Point::new(300.0, 300.0));
        assert_eq!(s.pointer_up(Point::new(300.0, 300.0), &DropTargets::new(), |_| true), None);
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn test_second_session_rejected_while_active() {
        let a = ActorId::new();
        let b = ActorId::new();
        let mut s = DragSession::default();
        assert!(s.pointer_down(a, IN_MEMBERS));
        assert!(!s.pointer_down(b, IN_AVAILABLE));
        assert!(!s.key_activate(b, IN_AVAILABLE));
        s.pointer_move(Point::new(200.0, 200.0));
        assert_eq!(s.active(), Some(a));
    }

    #[test]
    fn test_custom_activation_distance() {
        let a = ActorId::new();
        let mut s = DragSession::new(DragConfig {
            activation_distance: 20.0,
            ..DragConfig::default()
        });
        s.pointer_down(a, Point::ZERO);
        assert!(!s.pointer_move(Point::new(10.0, 10.0)));
        assert!(s.pointer_move(Point::new(20.0, 20.0)));
    }

    // ─────────────── keyboard ───────────────

    #[test]
    fn test_keyboard_drag_to_available() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::new(DragConfig {
            keyboard_step: 100.0,
            ..DragConfig::default()
        });

        assert!(s.key_activate(a, IN_MEMBERS));
        assert!(s.is_dragging());
        for _ in 0..3 {
            assert!(s.key_move(Direction::Right));
        }
        let intent = s.key_commit(&targets, |_| true);
        assert_eq!(intent, Some(DragIntent::MoveToAvailable(a)));
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn test_keyboard_commit_in_place_is_noop() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.key_activate(a, IN_AVAILABLE);
        s.key_move(Direction::Down);
        s.key_move(Direction::Up);
        assert_eq!(s.key_commit(&targets, |_| false), None);
    }

    #[test]
    fn test_pointer_events_do_not_drive_keyboard_drag() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();
        s.key_activate(a, IN_AVAILABLE);
        assert!(!s.pointer_move(IN_MEMBERS));
        assert_eq!(s.pointer_up(IN_MEMBERS, &targets, |_| false), None);
        assert!(s.is_dragging());
    }

    #[test]
    fn test_key_move_requires_keyboard_drag() {
        let mut s = DragSession::default();
        assert!(!s.key_move(Direction::Left));
        s.pointer_down(ActorId::new(), Point::ZERO);
        s.pointer_move(Point::new(50.0, 0.0));
        assert!(!s.key_move(Direction::Left));
    }

    // ─────────────── cancel ───────────────

    #[test]
    fn test_cancel_from_every_state() {
        let targets = columns();
        let a = ActorId::new();
        let mut s = DragSession::default();

        s.cancel();
        assert_eq!(s.state(), DragState::Idle);

        s.pointer_down(a, IN_AVAILABLE);
        s.cancel();
        assert_eq!(s.state(), DragState::Idle);

        s.pointer_down(a, IN_AVAILABLE);
        s.pointer_move(IN_MEMBERS);
        s.cancel();
        assert_eq!(s.state(), DragState::Idle);
        // Nothing left to drop.
        assert_eq!(s.pointer_up(IN_MEMBERS, &targets, |_| false), None);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let cfg: DragConfig = serde_json::from_str(r#"{"activation_distance": 8.0}"#).unwrap();
        assert_eq!(cfg.activation_distance, 8.0);
        assert_eq!(cfg.keyboard_step, 25.0);
        assert_eq!(cfg.max_drop_distance, None);
    }
}
