//! # roster-sync: authoritative membership state and remote sync
//!
//! Bridges a board's optimistic edits to the remote membership store and
//! writes the store's answer back into process-wide shared state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  add/remove   ┌─────────────────┐
//! │ RemoteSync   │ ────────────► │ MembershipStore │
//! │ (per board)  │ ◄──────────── │ (remote)        │
//! └──────┬───────┘  member ids   └─────────────────┘
//!        │ dispatch(MembersConfirmed | SyncFailed)
//!        ▼
//! ┌──────────────────┐   read    ┌─────────────────┐
//! │ MembershipWriter │ ────────► │ SharedMembership│ ──► boards re-derive
//! │ (single writer)  │           │ (readers)       │
//! └──────────────────┘           └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`]: the store seam and an in-memory reference store
//! - [`shared`]: shared state and its reducer
//! - [`adapter`]: the remote sync adapter

pub mod adapter;
pub mod shared;
pub mod store;

pub use adapter::{PendingSync, RemoteSync, SyncConfig, SyncOp};
pub use shared::{
    shared_membership, GroupSnapshot, MembershipAction, MembershipWriter, Revision,
    SharedMembership,
};
pub use store::{InMemoryStore, MembershipStore, MembershipUpdate, SyncError};
