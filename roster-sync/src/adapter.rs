//! Remote sync adapter.
//!
//! Issues add/remove calls against a [`MembershipStore`] on spawned tokio
//! tasks and writes the outcome into shared state:
//!
//! - success → `MembersConfirmed` with the store's member list
//! - failure → `SyncFailed`, logged and absorbed
//!
//! Failures are never rolled back here. The next reconciliation against the
//! unchanged authoritative list undoes the optimistic move.
//!
//! Calls are fire-and-forget from the caller's point of view: nothing
//! blocks, and there is no timeout or retry at this layer.

use std::sync::Arc;

use roster_core::{ActorId, GroupId};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::shared::{MembershipAction, MembershipWriter};
use crate::store::{MembershipStore, MembershipUpdate, SyncError};

/// Adapter tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Drop a confirmation that resolves after a later-issued one was
    /// already applied. Off by default: the last response to arrive wins.
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Add,
    Remove,
}

/// Handle to an in-flight add/remove call.
///
/// Dropping it does not cancel the call; shared state is updated either way.
#[derive(Debug)]
pub struct PendingSync {
    op: SyncOp,
    group_id: GroupId,
    actor_id: ActorId,
    seq: u64,
    handle: JoinHandle<Result<MembershipUpdate, SyncError>>,
}

impl PendingSync {
    pub fn op(&self) -> SyncOp {
        self.op
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    /// Issue order of this call across every adapter sharing the same
    /// state, starting at 1.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the call to resolve. Shared state has already been updated
    /// by the time this returns.
    pub async fn wait(self) -> Result<MembershipUpdate, SyncError> {
        self.handle.await.map_err(|_| SyncError::Cancelled)?
    }
}

/// Remote sync adapter for one store.
///
/// Must be used from within a tokio runtime.
pub struct RemoteSync<S> {
    store: Arc<S>,
    writer: MembershipWriter,
    config: SyncConfig,
}

impl<S: MembershipStore> RemoteSync<S> {
    pub fn new(store: Arc<S>, writer: MembershipWriter, config: SyncConfig) -> Self {
        Self {
            store,
            writer,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Fetch the roster and a group and publish both into shared state.
    pub async fn load(&self, group_id: GroupId) -> Result<(), SyncError> {
        let roster = self.store.roster().await?;
        let group = self.store.group(group_id).await?;
        self.writer.dispatch(MembershipAction::RosterLoaded(roster));
        self.writer.dispatch(MembershipAction::GroupLoaded(group));
        Ok(())
    }

    pub fn add_member(&self, group_id: GroupId, actor_id: ActorId) -> PendingSync {
        self.submit(SyncOp::Add, group_id, actor_id)
    }

    pub fn remove_member(&self, group_id: GroupId, actor_id: ActorId) -> PendingSync {
        self.submit(SyncOp::Remove, group_id, actor_id)
    }

    fn submit(&self, op: SyncOp, group_id: GroupId, actor_id: ActorId) -> PendingSync {
        let seq = self.writer.next_seq();
        let stamp = self.config.discard_stale_responses.then_some(seq);
        log::debug!("sync #{seq}: {op:?} {actor_id} in group {group_id}");

        let store = self.store.clone();
        let writer = self.writer.clone();
        let handle = tokio::spawn(async move {
            let result = match op {
                SyncOp::Add => store.add_member(group_id, actor_id).await,
                SyncOp::Remove => store.remove_member(group_id, actor_id).await,
            };
            match &result {
                Ok(update) => {
                    writer.dispatch(MembershipAction::MembersConfirmed {
                        group_id: update.group_id,
                        members: update.members.clone(),
                        seq: stamp,
                    });
                }
                Err(e) => {
                    log::warn!("sync #{seq}: {op:?} {actor_id} in group {group_id} failed: {e}");
                    writer.dispatch(MembershipAction::SyncFailed { group_id });
                }
            }
            result
        });

        PendingSync {
            op,
            group_id,
            actor_id,
            seq,
            handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::shared_membership;
    use crate::store::InMemoryStore;
    use roster_core::{Actor, Group};

    fn setup(config: SyncConfig) -> (RemoteSync<InMemoryStore>, crate::SharedMembership, Group, Actor, Actor) {
        let a = Actor::human("Ann", "Lee");
        let b = Actor::human("Bo", "Kim");
        let group = Group::new("Choir").with_members(vec![a.id]);
        let store = Arc::new(InMemoryStore::new(vec![a.clone(), b.clone()], vec![group.clone()]));
        let (shared, writer) = shared_membership();
        (RemoteSync::new(store, writer, config), shared, group, a, b)
    }

    #[tokio::test]
    async fn test_load_publishes_roster_and_group() {
        let (sync, shared, group, a, _b) = setup(SyncConfig::default());
        sync.load(group.id).await.unwrap();
        assert_eq!(shared.roster().len(), 2);
        assert_eq!(shared.group(group.id).unwrap().members, vec![a.id]);
    }

    #[tokio::test]
    async fn test_load_unknown_group_fails() {
        let (sync, shared, _group, _a, _b) = setup(SyncConfig::default());
        let ghost = GroupId::new();
        assert_eq!(sync.load(ghost).await, Err(SyncError::GroupNotFound(ghost)));
        assert!(shared.group(ghost).is_none());
    }

    #[tokio::test]
    async fn test_add_writes_authoritative_members() {
        let (sync, shared, group, a, b) = setup(SyncConfig::default());
        sync.load(group.id).await.unwrap();

        let pending = sync.add_member(group.id, b.id);
        assert_eq!(pending.op(), SyncOp::Add);
        assert_eq!(pending.actor_id(), b.id);
        assert_eq!(pending.seq(), 1);

        let update = pending.wait().await.unwrap();
        assert_eq!(update.members, vec![a.id, b.id]);
        assert_eq!(shared.group(group.id).unwrap().members, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_remove_writes_authoritative_members() {
        let (sync, shared, group, a, _b) = setup(SyncConfig::default());
        sync.load(group.id).await.unwrap();

        sync.remove_member(group.id, a.id).wait().await.unwrap();
        assert!(shared.group(group.id).unwrap().members.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_absorbed_and_bumps_revision() {
        let (sync, shared, group, a, b) = setup(SyncConfig::default());
        sync.load(group.id).await.unwrap();
        let before = shared.revision(group.id).unwrap();

        sync.store().fail_next(1);
        let result = sync.add_member(group.id, b.id).wait().await;
        assert!(matches!(result, Err(SyncError::Transport(_))));

        assert_eq!(shared.group(group.id).unwrap().members, vec![a.id]);
        assert_ne!(shared.revision(group.id).unwrap(), before);
    }

    #[tokio::test]
    async fn test_sequence_numbers_increase() {
        let (sync, _shared, group, a, b) = setup(SyncConfig::default());
        sync.load(group.id).await.unwrap();
        let p1 = sync.add_member(group.id, b.id);
        let p2 = sync.remove_member(group.id, a.id);
        assert!(p2.seq() > p1.seq());
        p1.wait().await.unwrap();
        p2.wait().await.unwrap();
    }

    #[test]
    fn test_config_default_is_last_write_wins() {
        assert!(!SyncConfig::default().discard_stale_responses);
    }

    #[tokio::test]
    async fn test_adapters_sharing_a_writer_share_one_sequence() {
        let a = Actor::human("Ann", "Lee");
        let b = Actor::human("Bo", "Kim");
        let c = Actor::human("Cy", "Park");
        let group = Group::new("Choir");
        let store = Arc::new(InMemoryStore::new(
            vec![a.clone(), b.clone(), c.clone()],
            vec![group.clone()],
        ));
        let (shared, writer) = shared_membership();
        let config = SyncConfig {
            discard_stale_responses: true,
        };
        let first = RemoteSync::new(store.clone(), writer.clone(), config.clone());
        let second = RemoteSync::new(store, writer, config);
        first.load(group.id).await.unwrap();

        first.add_member(group.id, a.id).wait().await.unwrap();
        first.add_member(group.id, b.id).wait().await.unwrap();
        let later = second.add_member(group.id, c.id);
        assert_eq!(later.seq(), 3);
        later.wait().await.unwrap();

        assert_eq!(shared.group(group.id).unwrap().members, vec![a.id, b.id, c.id]);
    }
}
