//! Two-column geometry for a board's drop targets.
//!
//! The host UI normally measures its own rows and registers them; this is
//! the fixed layout the demo and tests use.

use roster_core::Actor;
use roster_drag::{Aabb, ContainerId, DropTargets};

/// Members on the left, available on the right, fixed-height rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub x: f32,
    pub y: f32,
    pub column_width: f32,
    pub column_height: f32,
    pub gap: f32,
    pub row_height: f32,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            column_width: 240.0,
            column_height: 640.0,
            gap: 80.0,
            row_height: 32.0,
        }
    }
}

impl ColumnLayout {
    pub fn column(&self, container: ContainerId) -> Aabb {
        let x = match container {
            ContainerId::Members => self.x,
            ContainerId::Available => self.x + self.column_width + self.gap,
        };
        Aabb::from_rect(x, self.y, self.column_width, self.column_height)
    }

    pub fn row(&self, container: ContainerId, index: usize) -> Aabb {
        let column = self.column(container);
        Aabb::from_rect(
            column.min_x,
            column.min_y + index as f32 * self.row_height,
            self.column_width,
            self.row_height,
        )
    }

    /// Rebuild `targets` for the given rows.
    pub fn apply<'a>(
        &self,
        targets: &mut DropTargets,
        members: impl IntoIterator<Item = &'a Actor>,
        available: impl IntoIterator<Item = &'a Actor>,
    ) {
        targets.clear();
        for container in [ContainerId::Members, ContainerId::Available] {
            targets.insert_container(container, self.column(container));
        }
        for (i, actor) in members.into_iter().enumerate() {
            targets.insert_item(actor.id, ContainerId::Members, self.row(ContainerId::Members, i));
        }
        for (i, actor) in available.into_iter().enumerate() {
            targets.insert_item(
                actor.id,
                ContainerId::Available,
                self.row(ContainerId::Available, i),
            );
        }
    }
}
