//! Process-wide authoritative membership state.
//!
//! [`SharedMembership`] is the read side every board renders from.
//! [`MembershipWriter`] is the dispatch channel; its [`MembershipWriter::dispatch`]
//! reducer is the single entry point that mutates the state. In production
//! only [`crate::RemoteSync`] holds a writer.
//!
//! Every applied action bumps a revision counter. Boards compare the
//! revision they last reconciled against to decide whether to re-derive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use roster_core::{Actor, ActorId, Group, GroupId};
use rustc_hash::FxHashMap;
use tokio::sync::watch;

/// Change counters for one group's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revision {
    pub roster: u64,
    pub group: u64,
}

/// Consistent read of everything a board derives from.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    pub group: Group,
    pub roster: Vec<Actor>,
    pub revision: Revision,
}

/// Reducer input.
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipAction {
    RosterLoaded(Vec<Actor>),
    GroupLoaded(Group),
    /// The store confirmed a member list. `seq` is set only when stale
    /// responses are being discarded.
    MembersConfirmed {
        group_id: GroupId,
        members: Vec<ActorId>,
        seq: Option<u64>,
    },
    /// A remote call failed. Members are left as they are; only the
    /// revision moves, so observers reconcile against the unchanged value.
    SyncFailed { group_id: GroupId },
}

#[derive(Debug)]
struct GroupEntry {
    group: Group,
    revision: u64,
    /// Highest request sequence applied so far.
    applied_seq: u64,
}

#[derive(Debug, Default)]
struct MembershipState {
    roster: Vec<Actor>,
    roster_revision: u64,
    groups: FxHashMap<GroupId, GroupEntry>,
}

/// Create an empty shared state and its writer.
pub fn shared_membership() -> (SharedMembership, MembershipWriter) {
    let state = Arc::new(RwLock::new(MembershipState::default()));
    let (changes_tx, _) = watch::channel(0);
    let changes_tx = Arc::new(changes_tx);
    (
        SharedMembership {
            state: state.clone(),
            changes: changes_tx.clone(),
        },
        MembershipWriter {
            state,
            changes: changes_tx,
            next_seq: Arc::new(AtomicU64::new(0)),
        },
    )
}

// ───────────────────────────────────────────────────────────────────
// Read side
// ───────────────────────────────────────────────────────────────────

/// Read handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SharedMembership {
    state: Arc<RwLock<MembershipState>>,
    changes: Arc<watch::Sender<u64>>,
}

impl SharedMembership {
    fn read(&self) -> RwLockReadGuard<'_, MembershipState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn roster(&self) -> Vec<Actor> {
        self.read().roster.clone()
    }

    pub fn group(&self, group_id: GroupId) -> Option<Group> {
        self.read().groups.get(&group_id).map(|e| e.group.clone())
    }

    /// Current revision of a group's inputs, `None` if the group is unknown.
    pub fn revision(&self, group_id: GroupId) -> Option<Revision> {
        let state = self.read();
        state.groups.get(&group_id).map(|e| Revision {
            roster: state.roster_revision,
            group: e.revision,
        })
    }

    pub fn snapshot(&self, group_id: GroupId) -> Option<GroupSnapshot> {
        let state = self.read();
        state.groups.get(&group_id).map(|e| GroupSnapshot {
            group: e.group.clone(),
            roster: state.roster.clone(),
            revision: Revision {
                roster: state.roster_revision,
                group: e.revision,
            },
        })
    }

    /// Receiver that ticks after every applied action.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

// ───────────────────────────────────────────────────────────────────
// Write side
// ───────────────────────────────────────────────────────────────────

/// Dispatch channel into the shared state.
#[derive(Debug, Clone)]
pub struct MembershipWriter {
    state: Arc<RwLock<MembershipState>>,
    changes: Arc<watch::Sender<u64>>,
    /// Request counter shared by every clone, so all adapters on one
    /// state draw from a single sequence.
    next_seq: Arc<AtomicU64>,
}

impl MembershipWriter {
    fn write(&self) -> RwLockWriteGuard<'_, MembershipState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next request sequence number, starting at 1.
    pub fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply one action. Returns `false` when the action was ignored.
    pub fn dispatch(&self, action: MembershipAction) -> bool {
        let applied = {
            let mut state = self.write();
            reduce(&mut state, action)
        };
        if applied {
            self.changes.send_modify(|tick| *tick += 1);
        }
        applied
    }
}

fn reduce(state: &mut MembershipState, action: MembershipAction) -> bool {
    match action {
        MembershipAction::RosterLoaded(roster) => {
            log::info!("roster loaded: {} actor(s)", roster.len());
            state.roster = roster;
            state.roster_revision += 1;
            true
        }
        MembershipAction::GroupLoaded(group) => {
            log::info!("group {} loaded with {} member(s)", group.id, group.members.len());
            match state.groups.get_mut(&group.id) {
                Some(entry) => {
                    entry.group = group;
                    entry.revision += 1;
                }
                None => {
                    state.groups.insert(
                        group.id,
                        GroupEntry {
                            group,
                            revision: 1,
                            applied_seq: 0,
                        },
                    );
                }
            }
            true
        }
        MembershipAction::MembersConfirmed {
            group_id,
            members,
            seq,
        } => {
            let Some(entry) = state.groups.get_mut(&group_id) else {
                log::warn!("confirmation for unknown group {group_id} ignored");
                return false;
            };
            if let Some(seq) = seq {
                if seq < entry.applied_seq {
                    log::debug!(
                        "stale confirmation #{seq} for group {group_id} dropped (applied #{})",
                        entry.applied_seq
                    );
                    return false;
                }
                entry.applied_seq = seq;
            }
            log::debug!("group {group_id} confirmed with {} member(s)", members.len());
            entry.group.members = members;
            entry.revision += 1;
            true
        }
        MembershipAction::SyncFailed { group_id } => {
            let Some(entry) = state.groups.get_mut(&group_id) else {
                return false;
            };
            entry.revision += 1;
            true
        }
    }
}
