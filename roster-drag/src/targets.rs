//! Drop-target registry with nearest-center collision detection.
//!
//! Both list containers and the individual rows inside them register as
//! targets. A drop resolves to whichever target's center is closest to the
//! pointer (or keyboard focus point); a row resolves to the container it
//! currently sits in.
//!
//! # Design decisions
//!
//! * **Linear scan.** A board has two containers and one target per visible
//!   row, so a grid index buys nothing here.
//! * **Registration order breaks ties.** The earliest-registered target wins
//!   when two centers are equidistant.

use std::fmt;
use std::str::FromStr;

use roster_core::ActorId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Unknown container label: {0}")]
    UnknownContainer(String),
}

// ───────────────────────────────────────────────────────────────────
// Point
// ───────────────────────────────────────────────────────────────────

/// 2D position in board (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

// ───────────────────────────────────────────────────────────────────
// Aabb: Axis-Aligned Bounding Box
// ───────────────────────────────────────────────────────────────────

/// Target bounds stored as min/max corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    /// Create from origin + size.
    #[inline(always)]
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    #[inline(always)]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline(always)]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    #[inline(always)]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

// ───────────────────────────────────────────────────────────────────
// Target identity
// ───────────────────────────────────────────────────────────────────

/// The two list containers of a membership board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerId {
    #[serde(rename = "members-container")]
    Members,
    #[serde(rename = "available-container")]
    Available,
}

impl ContainerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerId::Members => "members-container",
            ContainerId::Available => "available-container",
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerId {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "members-container" => Ok(ContainerId::Members),
            "available-container" => Ok(ContainerId::Available),
            other => Err(TargetError::UnknownContainer(other.to_string())),
        }
    }
}

/// Key of a registered drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    Container(ContainerId),
    /// A list row, keyed by the actor it renders.
    Item(ActorId),
}

/// A registered drop target and the container it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub id: TargetId,
    pub container: ContainerId,
    pub bounds: Aabb,
}

// ───────────────────────────────────────────────────────────────────
// DropTargets
// ───────────────────────────────────────────────────────────────────

/// All drop targets currently laid out on the board.
#[derive(Debug, Clone, Default)]
pub struct DropTargets {
    targets: FxHashMap<TargetId, DropTarget>,
    /// Registration order, for deterministic tie-breaking.
    order: Vec<TargetId>,
    /// Drops farther than this from every center land nowhere.
    max_distance: Option<f32>,
}

impl DropTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_distance(max_distance: Option<f32>) -> Self {
        Self {
            max_distance,
            ..Self::default()
        }
    }

    /// Register (or move) a list container.
    pub fn insert_container(&mut self, container: ContainerId, bounds: Aabb) {
        self.insert(DropTarget {
            id: TargetId::Container(container),
            container,
            bounds,
        });
    }

    /// Register (or move) a row. Re-registering an actor under another
    /// container replaces the old entry.
    pub fn insert_item(&mut self, actor: ActorId, container: ContainerId, bounds: Aabb) {
        self.insert(DropTarget {
            id: TargetId::Item(actor),
            container,
            bounds,
        });
    }

    fn insert(&mut self, target: DropTarget) {
        if self.targets.insert(target.id, target).is_none() {
            self.order.push(target.id);
        }
    }

    /// Remove a target. No-op if the id is unknown.
    pub fn remove(&mut self, id: TargetId) {
        if self.targets.remove(&id).is_some() {
            self.order.retain(|t| *t != id);
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.order.clear();
    }

    pub fn get(&self, id: TargetId) -> Option<&DropTarget> {
        self.targets.get(&id)
    }

    pub fn center_of(&self, id: TargetId) -> Option<Point> {
        self.targets.get(&id).map(|t| t.bounds.center())
    }

    /// Nearest-center collision: the target whose center is closest to `p`.
    ///
    /// Returns `None` when nothing is registered, or when `max_distance` is
    /// set and every center is farther away than that.
    pub fn closest_center(&self, p: Point) -> Option<&DropTarget> {
        let mut best: Option<(&DropTarget, f32)> = None;
        for id in &self.order {
            let Some(target) = self.targets.get(id) else {
                continue;
            };
            let d = target.bounds.center().distance(&p);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((target, d)),
            }
        }

        match (best, self.max_distance) {
            (Some((_, d)), Some(max)) if d > max => None,
            (hit, _) => hit.map(|(t, _)| t),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

// ===================================================================
// Tests
// ===================================================================
