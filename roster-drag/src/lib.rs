//! # roster-drag: drop targets and drag gestures for membership boards
//!
//! Turns pointer and keyboard input into normalized move intents.
//!
//! ## Modules
//!
//! - [`targets`]: drop-target geometry and the nearest-center collision rule
//! - [`session`]: the per-drag state machine (Idle → Dragging → Resolving)
//!
//! ```text
//!  pointer / keyboard
//!       │
//!       ▼
//!  DragSession ──► DropTargets::closest_center() ──► ContainerId
//!       │
//!       ▼
//!  Option<DragIntent>   (MoveToMembers / MoveToAvailable / none)
//! ```

pub mod session;
pub mod targets;

pub use session::{
    resolve_intent, Direction, DragConfig, DragIntent, DragSession, DragState, Sensor,
};
pub use targets::{Aabb, ContainerId, DropTarget, DropTargets, Point, TargetId, TargetError};
