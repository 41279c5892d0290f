//! Roster partitioning: derive the member / available split for a group.
//!
//! Pure and deterministic: the same `(members, roster)` always yields the
//! same two lists.
//!
//! ```text
//!  roster ──┬── id ∈ members ───────────────────► Partition::members
//!           └── id ∉ members && type ≠ LOCATION ─► Partition::available
//! ```
//!
//! Member ids that do not appear in the roster are dropped.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{Actor, ActorId};

/// Ordering of the derived member list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrder {
    /// Roster iteration order.
    #[default]
    Roster,
    /// Position in the group's stored member list.
    Stored,
}

/// The two disjoint candidate lists for a group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub members: Vec<Actor>,
    pub available: Vec<Actor>,
}

impl Partition {
    pub fn member_ids(&self) -> Vec<ActorId> {
        self.members.iter().map(|a| a.id).collect()
    }

    pub fn available_ids(&self) -> Vec<ActorId> {
        self.available.iter().map(|a| a.id).collect()
    }
}

/// Split `roster` into members of the group and actors still available.
pub fn partition(members: &[ActorId], roster: &[Actor], order: MemberOrder) -> Partition {
    // id → position in the stored member list
    let positions: FxHashMap<ActorId, usize> = members
        .iter()
        .enumerate()
        .map(|(pos, id)| (*id, pos))
        .collect();

    let mut out = Partition::default();
    for actor in roster {
        if positions.contains_key(&actor.id) {
            out.members.push(actor.clone());
        } else if actor.actor_type.can_be_available() {
            out.available.push(actor.clone());
        }
    }

    if out.members.len() < positions.len() {
        log::debug!(
            "partition: dropped {} member id(s) missing from the roster",
            positions.len() - out.members.len()
        );
    }

    if order == MemberOrder::Stored {
        out.members.sort_by_key(|a| positions.get(&a.id).copied().unwrap_or(usize::MAX));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActorType;

    fn ids(actors: &[Actor]) -> Vec<ActorId> {
        actors.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_basic_split_excludes_locations() {
        let h1 = Actor::human("Hal", "One");
        let h2 = Actor::human("Hana", "Two");
        let l1 = Actor::location("Lobby");
        let roster = vec![h1.clone(), h2.clone(), l1];

        let p = partition(&[h1.id], &roster, MemberOrder::Roster);
        assert_eq!(ids(&p.members), vec![h1.id]);
        assert_eq!(ids(&p.available), vec![h2.id]);
    }

    #[test]
    fn test_location_member_stays_member() {
        let l1 = Actor::location("Lobby");
        let h1 = Actor::human("Hal", "One");
        let roster = vec![l1.clone(), h1.clone()];

        let p = partition(&[l1.id], &roster, MemberOrder::Roster);
        assert_eq!(ids(&p.members), vec![l1.id]);
        assert_eq!(ids(&p.available), vec![h1.id]);
    }

    #[test]
    fn test_other_types_are_available() {
        let team = Actor::other(ActorType::Other("TEAM".into()), "Ops");
        let p = partition(&[], std::slice::from_ref(&team), MemberOrder::Roster);
        assert_eq!(ids(&p.available), vec![team.id]);
    }

    #[test]
    fn test_dangling_member_ids_dropped() {
        let h1 = Actor::human("Hal", "One");
        let ghost = ActorId::new();
        let p = partition(&[ghost, h1.id], std::slice::from_ref(&h1), MemberOrder::Roster);
        assert_eq!(ids(&p.members), vec![h1.id]);
        assert!(p.available.is_empty());
    }

    #[test]
    fn test_empty_roster() {
        let p = partition(&[ActorId::new()], &[], MemberOrder::Roster);
        assert!(p.members.is_empty());
        assert!(p.available.is_empty());
    }

    #[test]
    fn test_roster_order_ignores_stored_order() {
        let a = Actor::human("A", "A");
        let b = Actor::human("B", "B");
        let c = Actor::human("C", "C");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        let p = partition(&[c.id, a.id], &roster, MemberOrder::Roster);
        assert_eq!(ids(&p.members), vec![a.id, c.id]);
    }

    #[test]
    fn test_stored_order() {
        let a = Actor::human("A", "A");
        let b = Actor::human("B", "B");
        let c = Actor::human("C", "C");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        let p = partition(&[c.id, a.id], &roster, MemberOrder::Stored);
        assert_eq!(ids(&p.members), vec![c.id, a.id]);
        assert_eq!(ids(&p.available), vec![b.id]);
    }

    #[test]
    fn test_lists_disjoint_and_within_roster() {
        let roster: Vec<Actor> = (0..20)
            .map(|i| {
                if i % 5 == 0 {
                    Actor::location(format!("Room {i}"))
                } else {
                    Actor::human(format!("P{i}"), "X")
                }
            })
            .collect();
        let members: Vec<ActorId> = roster.iter().step_by(3).map(|a| a.id).collect();

        let p = partition(&members, &roster, MemberOrder::Roster);
        for m in &p.members {
            assert!(!p.available.iter().any(|a| a.id == m.id));
        }
        for a in p.members.iter().chain(p.available.iter()) {
            assert!(roster.iter().any(|r| r.id == a.id));
        }
        assert!(p.available.iter().all(|a| a.actor_type != ActorType::Location));
        // every non-member non-location actor is offered
        let expected_available = roster
            .iter()
            .filter(|a| !members.contains(&a.id) && a.actor_type.can_be_available())
            .count();
        assert_eq!(p.available.len(), expected_available);
    }
}
