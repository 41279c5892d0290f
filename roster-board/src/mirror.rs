//! Local mirror of a group's membership partition.
//!
//! The two lists here are what the board renders. They are mutated
//! optimistically by move intents and reset by [`LocalMirror::reconcile`]
//! whenever upstream state changes.

use roster_core::{Actor, ActorId, Partition};

/// Which lists a reconciliation replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub members_replaced: bool,
    pub available_replaced: bool,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.members_replaced || self.available_replaced
    }
}

/// Members / available lists. Always disjoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalMirror {
    members: Vec<Actor>,
    available: Vec<Actor>,
}

impl LocalMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[Actor] {
        &self.members
    }

    pub fn available(&self) -> &[Actor] {
        &self.available
    }

    pub fn is_member(&self, id: ActorId) -> bool {
        self.members.iter().any(|a| a.id == id)
    }

    pub fn is_available(&self, id: ActorId) -> bool {
        self.available.iter().any(|a| a.id == id)
    }

    /// Adopt a fresh partition, replacing each list only if its content
    /// differs. Unchanged lists keep their allocation and are not
    /// reported, so callers can skip redundant redraws.
    pub fn reconcile(&mut self, derived: Partition) -> ReconcileOutcome {
        let Partition { members, available } = derived;
        let mut outcome = ReconcileOutcome::default();

        if self.members != members {
            self.members = members;
            outcome.members_replaced = true;
        }
        if self.available != available {
            self.available = available;
            outcome.available_replaced = true;
        }
        outcome
    }

    /// Move an actor from available to the end of members.
    ///
    /// Returns `false` (and changes nothing) if the actor is not currently
    /// available.
    pub fn take_from_available(&mut self, id: ActorId) -> bool {
        match self.available.iter().position(|a| a.id == id) {
            Some(pos) => {
                let actor = self.available.remove(pos);
                self.members.push(actor);
                true
            }
            None => false,
        }
    }

    /// Move an actor from members to the end of available.
    ///
    /// An actor whose type can never be available (a location) leaves both
    /// lists instead, the same place the next partition puts it.
    ///
    /// Returns `false` (and changes nothing) if the actor is not currently
    /// a member.
    pub fn take_from_members(&mut self, id: ActorId) -> bool {
        match self.members.iter().position(|a| a.id == id) {
            Some(pos) => {
                let actor = self.members.remove(pos);
                if actor.actor_type.can_be_available() {
                    self.available.push(actor);
                }
                true
            }
            None => false,
        }
    }
}
