//! Board state: owns the mirror → gesture → sync loop for one group.
//!
//! `MembershipBoard` is the single source of visual truth for a group's
//! membership editor. It holds the local mirror lists, the drag session,
//! the registered drop targets and the filter text, and forwards every
//! move to the remote sync adapter.
//!
//! ## Data flow
//!
//! ```text
//!  SharedMembership (roster, group.members, revision)
//!       │  refresh(): revision changed?
//!       ▼
//!  partition() ──► LocalMirror::reconcile()      (replace only on difference)
//!       │
//!       ▼
//!  view() / render() ──► BoardView (filtered available, count labels)
//!
//!  gesture / row button
//!       │
//!       ▼
//!  apply_intent() ──► LocalMirror::take_*()      (optimistic, synchronous)
//!       │
//!       ▼
//!  RemoteSync::add_member / remove_member ──► shared state ──► refresh()
//! ```

use std::fmt;
use std::sync::Arc;

use roster_core::{filter, partition, Actor, ActorId, GroupId};
use roster_drag::{
    Aabb, ContainerId, Direction, DragIntent, DragSession, DragState, DropTargets, Point,
    TargetId,
};
use roster_sync::{
    shared_membership, MembershipStore, PendingSync, RemoteSync, Revision, SharedMembership,
    SyncError,
};
use tokio::sync::watch;

use crate::config::BoardConfig;
use crate::layout::ColumnLayout;
use crate::mirror::LocalMirror;

/// What the host UI renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub members: Vec<Actor>,
    /// Available actors passing the filter, in mirror order.
    pub available: Vec<Actor>,
    pub member_count_label: String,
    pub available_count_label: String,
    pub filter: String,
    pub dragging: Option<ActorId>,
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |actors: &[Actor]| {
            actors
                .iter()
                .map(|a| a.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "{} [{}] | {} [{}]",
            self.member_count_label,
            names(&self.members),
            self.available_count_label,
            names(&self.available)
        )?;
        if !self.filter.is_empty() {
            write!(f, " (filter {:?})", self.filter)?;
        }
        Ok(())
    }
}

/// Membership editor state for one group.
pub struct MembershipBoard<S> {
    group_id: GroupId,
    config: BoardConfig,
    shared: SharedMembership,
    sync: RemoteSync<S>,
    changes: watch::Receiver<u64>,
    mirror: LocalMirror,
    drag: DragSession,
    targets: DropTargets,
    filter: String,
    /// Upstream revision the mirror was last reconciled against.
    seen: Option<Revision>,
}

impl<S: MembershipStore> MembershipBoard<S> {
    /// Board over existing shared state and adapter.
    pub fn new(
        group_id: GroupId,
        shared: SharedMembership,
        sync: RemoteSync<S>,
        config: BoardConfig,
    ) -> Self {
        let changes = shared.subscribe();
        let mut board = Self {
            group_id,
            drag: DragSession::new(config.drag.clone()),
            targets: DropTargets::with_max_distance(config.drag.max_drop_distance),
            config,
            shared,
            sync,
            changes,
            mirror: LocalMirror::new(),
            filter: String::new(),
            seen: None,
        };
        board.refresh();
        board
    }

    /// Board with its own shared state, talking to `store`.
    pub fn with_store(group_id: GroupId, store: Arc<S>, config: BoardConfig) -> Self {
        let (shared, writer) = shared_membership();
        let sync = RemoteSync::new(store, writer, config.sync.clone());
        Self::new(group_id, shared, sync, config)
    }

    /// Fetch roster and group from the store, then reconcile.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.sync.load(self.group_id).await?;
        let _ = self.changes.borrow_and_update();
        self.refresh();
        Ok(())
    }

    // ───────────────────── accessors ─────────────────────

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    pub fn shared(&self) -> &SharedMembership {
        &self.shared
    }

    pub fn sync(&self) -> &RemoteSync<S> {
        &self.sync
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn targets(&self) -> &DropTargets {
        &self.targets
    }

    // ───────────────────── reconciliation ─────────────────────

    /// Re-derive the partition if upstream moved since the last pass.
    ///
    /// Returns `true` when a mirror list was replaced.
    pub fn refresh(&mut self) -> bool {
        let revision = self.shared.revision(self.group_id);
        if revision.is_some() && revision == self.seen {
            return false;
        }
        let Some(snapshot) = self.shared.snapshot(self.group_id) else {
            return false;
        };

        let derived = partition(
            &snapshot.group.members,
            &snapshot.roster,
            self.config.member_order,
        );
        let outcome = self.mirror.reconcile(derived);
        self.seen = Some(snapshot.revision);

        if outcome.changed() {
            log::debug!(
                "group {}: mirror reconciled (members replaced: {}, available replaced: {})",
                self.group_id,
                outcome.members_replaced,
                outcome.available_replaced
            );
        }
        outcome.changed()
    }

    /// Wait until shared state changes, then reconcile.
    pub async fn next_change(&mut self) -> bool {
        if self.changes.changed().await.is_err() {
            return false;
        }
        let _ = self.changes.borrow_and_update();
        self.refresh()
    }

    // ───────────────────── intents ─────────────────────

    /// Apply a move: mutate the mirror, then issue the remote call.
    ///
    /// Both drags and row buttons end up here. A move whose actor is not in
    /// the expected source list does nothing and issues no call.
    pub fn apply_intent(&mut self, intent: DragIntent) -> Option<PendingSync> {
        match intent {
            DragIntent::MoveToMembers(id) => {
                if !self.mirror.take_from_available(id) {
                    log::debug!("MoveToMembers({id}) ignored: not in available list");
                    return None;
                }
                Some(self.sync.add_member(self.group_id, id))
            }
            DragIntent::MoveToAvailable(id) => {
                if !self.mirror.take_from_members(id) {
                    log::debug!("MoveToAvailable({id}) ignored: not in member list");
                    return None;
                }
                Some(self.sync.remove_member(self.group_id, id))
            }
        }
    }

    /// Row button on an available actor.
    pub fn add_member(&mut self, id: ActorId) -> Option<PendingSync> {
        self.apply_intent(DragIntent::MoveToMembers(id))
    }

    /// Row button on a member.
    pub fn remove_member(&mut self, id: ActorId) -> Option<PendingSync> {
        self.apply_intent(DragIntent::MoveToAvailable(id))
    }

    // ───────────────────── gestures ─────────────────────

    pub fn pointer_down(&mut self, id: ActorId, at: Point) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.drag.pointer_down(id, at)
    }

    pub fn pointer_move(&mut self, at: Point) -> bool {
        self.drag.pointer_move(at)
    }

    pub fn pointer_up(&mut self, at: Point) -> Option<PendingSync> {
        let mirror = &self.mirror;
        let intent = self
            .drag
            .pointer_up(at, &self.targets, |id| mirror.is_member(id))?;
        self.apply_intent(intent)
    }

    /// Pick up a row with the keyboard, starting from the row's center.
    pub fn key_activate(&mut self, id: ActorId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let home = if self.mirror.is_member(id) {
            ContainerId::Members
        } else {
            ContainerId::Available
        };
        let start = self
            .targets
            .center_of(TargetId::Item(id))
            .or_else(|| self.targets.center_of(TargetId::Container(home)))
            .unwrap_or(Point::ZERO);
        self.drag.key_activate(id, start)
    }

    pub fn key_move(&mut self, direction: Direction) -> bool {
        self.drag.key_move(direction)
    }

    pub fn key_commit(&mut self) -> Option<PendingSync> {
        let mirror = &self.mirror;
        let intent = self
            .drag
            .key_commit(&self.targets, |id| mirror.is_member(id))?;
        self.apply_intent(intent)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    fn contains(&self, id: ActorId) -> bool {
        self.mirror.is_member(id) || self.mirror.is_available(id)
    }

    // ───────────────────── geometry ─────────────────────

    pub fn register_container(&mut self, container: ContainerId, bounds: Aabb) {
        self.targets.insert_container(container, bounds);
    }

    pub fn register_item(&mut self, id: ActorId, container: ContainerId, bounds: Aabb) {
        self.targets.insert_item(id, container, bounds);
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register containers and the currently visible rows using `layout`.
    pub fn layout_with(&mut self, layout: &ColumnLayout) {
        let visible = filter::visible(&self.filter, self.mirror.available());
        layout.apply(&mut self.targets, self.mirror.members(), visible);
    }

    // ───────────────────── filter & view ─────────────────────

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn view(&self) -> BoardView {
        let members = self.mirror.members().to_vec();
        let available: Vec<Actor> = filter::visible(&self.filter, self.mirror.available())
            .into_iter()
            .cloned()
            .collect();
        BoardView {
            member_count_label: format!("{} members", members.len()),
            available_count_label: format!("{} available", available.len()),
            members,
            available,
            filter: self.filter.clone(),
            dragging: self.drag.active(),
        }
    }

    /// Reconcile against upstream, then build the view.
    pub fn render(&mut self) -> BoardView {
        self.refresh();
        self.view()
    }
}

// ===================================================================
// Tests
// ===================================================================
