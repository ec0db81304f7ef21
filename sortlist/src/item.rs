//! Draggable list cells and their size contract.

use crate::layout::Rect;
use crate::scene::NodeId;
use crate::types::{Axis, Extent, Vec2};

/// Minimum/preferred sizing a list measures its items by.
pub trait SizeContract {
    fn min_extent(&self) -> Extent;
    fn preferred_extent(&self) -> Extent;
    fn set_min_extent(&mut self, extent: Extent);
    fn set_preferred_extent(&mut self, extent: Extent);

    /// `max(preferred, minimum)` along `axis`.
    fn effective(&self, axis: Axis) -> f32 {
        self.preferred_extent()
            .get(axis)
            .max(self.min_extent().get(axis))
    }

    fn effective_extent(&self) -> Extent {
        Extent::new(self.effective(Axis::X), self.effective(Axis::Y))
    }
}

/// Notification an item raises from pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSignal {
    Pressed(NodeId),
    Released(NodeId),
}

impl ItemSignal {
    pub fn node(&self) -> NodeId {
        match self {
            ItemSignal::Pressed(node) | ItemSignal::Released(node) => *node,
        }
    }
}

/// The list-item capability of a scene node.
///
/// A passive measured cell: it carries a size contract and turns pointer
/// input into [`ItemSignal`]s. Drag behavior lives in the
/// [`DragManager`](crate::manager::DragManager).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ListItem {
    min: Extent,
    preferred: Extent,
}

impl ListItem {
    /// An item with an empty contract. Lists replace a non-positive size with
    /// their default size the first time they measure it.
    pub const fn new() -> Self {
        Self {
            min: Extent::ZERO,
            preferred: Extent::ZERO,
        }
    }

    /// An item that prefers `width` x `height`.
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            min: Extent::ZERO,
            preferred: Extent::new(width, height),
        }
    }

    pub const fn with_min(mut self, width: f32, height: f32) -> Self {
        self.min = Extent::new(width, height);
        self
    }

    pub const fn with_preferred(mut self, width: f32, height: f32) -> Self {
        self.preferred = Extent::new(width, height);
        self
    }

    /// Pointer went down at `point`. Only raises `Pressed` when the point is
    /// inside the item's bounds.
    pub fn on_pointer_down(&self, node: NodeId, bounds: Rect, point: Vec2) -> Option<ItemSignal> {
        bounds
            .contains(point)
            .then_some(ItemSignal::Pressed(node))
    }

    /// Pointer went up after a press on this item.
    pub fn on_pointer_up(&self, node: NodeId) -> ItemSignal {
        ItemSignal::Released(node)
    }
}

impl SizeContract for ListItem {
    fn min_extent(&self) -> Extent {
        self.min
    }

    fn preferred_extent(&self) -> Extent {
        self.preferred
    }

    fn set_min_extent(&mut self, extent: Extent) {
        self.min = extent;
    }

    fn set_preferred_extent(&mut self, extent: Extent) {
        self.preferred = extent;
    }
}
