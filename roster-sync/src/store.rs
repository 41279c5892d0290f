//! Membership store seam.
//!
//! The remote store owns groups and their member lists. Boards never talk
//! to it directly; [`crate::RemoteSync`] does.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use roster_core::{Actor, ActorId, Group, GroupId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Authoritative member list returned by an add/remove call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipUpdate {
    pub group_id: GroupId,
    pub members: Vec<ActorId>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Store rejected the change: {reason}")]
    Rejected { reason: String },
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Sync task cancelled")]
    Cancelled,
}

/// Remote membership operations.
///
/// Implementations handle their own transport, auth and retries; callers
/// only see the final answer.
pub trait MembershipStore: Send + Sync + 'static {
    /// Full roster of actors.
    fn roster(&self) -> impl Future<Output = Result<Vec<Actor>, SyncError>> + Send;

    fn group(&self, group_id: GroupId) -> impl Future<Output = Result<Group, SyncError>> + Send;

    fn add_member(
        &self,
        group_id: GroupId,
        actor_id: ActorId,
    ) -> impl Future<Output = Result<MembershipUpdate, SyncError>> + Send;

    fn remove_member(
        &self,
        group_id: GroupId,
        actor_id: ActorId,
    ) -> impl Future<Output = Result<MembershipUpdate, SyncError>> + Send;
}

// ───────────────────────────────────────────────────────────────────
// InMemoryStore
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct StoreInner {
    roster: Vec<Actor>,
    groups: FxHashMap<GroupId, Group>,
}

/// Process-local store for demos and tests.
///
/// Supports artificial latency and injected failures so callers can
/// exercise slow and rejected calls.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
    latency: Option<Duration>,
    /// Number of upcoming add/remove calls that fail.
    failures: AtomicUsize,
}

impl InMemoryStore {
    pub fn new(roster: Vec<Actor>, groups: Vec<Group>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                roster,
                groups: groups.into_iter().map(|g| (g.id, g)).collect(),
            }),
            latency: None,
            failures: AtomicUsize::new(0),
        }
    }

    /// Delay every add/remove call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `n` add/remove calls fail with a transport error.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Overwrite a group's members, as another client would.
    pub async fn set_members(&self, group_id: GroupId, members: Vec<ActorId>) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().await;
        let group = inner
            .groups
            .get_mut(&group_id)
            .ok_or(SyncError::GroupNotFound(group_id))?;
        group.members = members;
        Ok(())
    }

    pub async fn members(&self, group_id: GroupId) -> Option<Vec<ActorId>> {
        self.inner
            .lock()
            .await
            .groups
            .get(&group_id)
            .map(|g| g.members.clone())
    }

    async fn before_call(&self) -> Result<(), SyncError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(SyncError::Transport("injected failure".into()));
        }
        Ok(())
    }
}

impl MembershipStore for InMemoryStore {
    async fn roster(&self) -> Result<Vec<Actor>, SyncError> {
        Ok(self.inner.lock().await.roster.clone())
    }

    async fn group(&self, group_id: GroupId) -> Result<Group, SyncError> {
        self.inner
            .lock()
            .await
            .groups
            .get(&group_id)
            .cloned()
            .ok_or(SyncError::GroupNotFound(group_id))
    }

    async fn add_member(&self, group_id: GroupId, actor_id: ActorId) -> Result<MembershipUpdate, SyncError> {
        self.before_call().await?;

        let mut inner = self.inner.lock().await;
        if !inner.roster.iter().any(|a| a.id == actor_id) {
            return Err(SyncError::ActorNotFound(actor_id));
        }
        let group = inner
            .groups
            .get_mut(&group_id)
            .ok_or(SyncError::GroupNotFound(group_id))?;
        if !group.members.contains(&actor_id) {
            group.members.push(actor_id);
        }
        Ok(MembershipUpdate {
            group_id,
            members: group.members.clone(),
        })
    }

    async fn remove_member(&self, group_id: GroupId, actor_id: ActorId) -> Result<MembershipUpdate, SyncError> {
        self.before_call().await?;

        let mut inner = self.inner.lock().await;
        let group = inner
            .groups
            .get_mut(&group_id)
            .ok_or(SyncError::GroupNotFound(group_id))?;
        group.members.retain(|id| *id != actor_id);
        Ok(MembershipUpdate {
            group_id,
            members: group.members.clone(),
        })
    }
}
