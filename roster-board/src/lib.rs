//! Roster Board: drag-and-drop membership editor for one group.
//!
//! Ties the other crates together:
//!
//! ```text
//!  roster-core ── Actor, Group, partition(), filter
//!  roster-drag ── DragSession, DropTargets (nearest-center collision)
//!  roster-sync ── RemoteSync, SharedMembership (authoritative state)
//!        │
//!        ▼
//!  MembershipBoard ── LocalMirror + gestures + view
//! ```
//!
//! The board is UI-toolkit agnostic: a host feeds it pointer/keyboard
//! events and row geometry, and renders the [`BoardView`] it returns.

pub mod board;
pub mod config;
pub mod layout;
pub mod mirror;

pub use board::{BoardView, MembershipBoard};
pub use config::{BoardConfig, ConfigError};
pub use layout::ColumnLayout;
pub use mirror::{LocalMirror, ReconcileOutcome};
