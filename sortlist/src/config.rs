//! List and drag configuration.

use std::time::Duration;

use crate::scene::NodeId;
use crate::types::{Extent, Orientation};

/// How a list decides its cached item sequence is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemCacheKey {
    /// Recompute when the content's child count changes.
    ///
    /// Reordering children without changing their count is not noticed
    /// until the next count change or an explicit invalidation.
    #[default]
    ChildCount,
    /// Recompute when the ordered sequence of child ids changes.
    Identity,
}

/// Per-list configuration, set once before the list initializes.
#[derive(Debug, Clone)]
pub struct ListConfig {
    pub orientation: Orientation,

    /// Size substituted for items whose contract measures non-positive.
    pub default_size: Extent,

    /// Destroy whatever the content container holds when the list starts.
    pub clear_content: bool,

    /// Drawing surface dragged items are lifted into.
    /// When unset, the nearest canvas ancestor of the list node is used.
    pub canvas: Option<NodeId>,

    /// Node carrying the scroll view whose content holds the items. Required.
    pub scroll_view: Option<NodeId>,

    pub cache_key: ItemCacheKey,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            default_size: Extent::new(100.0, 100.0),
            clear_content: false,
            canvas: None,
            scroll_view: None,
            cache_key: ItemCacheKey::ChildCount,
        }
    }
}

impl ListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn horizontal(self) -> Self {
        self.orientation(Orientation::Horizontal)
    }

    pub fn vertical(self) -> Self {
        self.orientation(Orientation::Vertical)
    }

    pub fn default_size(mut self, width: f32, height: f32) -> Self {
        self.default_size = Extent::new(width, height);
        self
    }

    pub fn clear_content(mut self, clear: bool) -> Self {
        self.clear_content = clear;
        self
    }

    pub fn canvas(mut self, canvas: NodeId) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn scroll_view(mut self, scroll_view: NodeId) -> Self {
        self.scroll_view = Some(scroll_view);
        self
    }

    pub fn cache_key(mut self, key: ItemCacheKey) -> Self {
        self.cache_key = key;
        self
    }
}

/// Drag gesture tuning shared by every registered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// How long a press must be held still before it turns into a drag.
    pub dragging_delay: Duration,

    /// How far the pointer may wander from the press position while the
    /// delay runs. Zero requires the exact press position.
    pub hold_tolerance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            dragging_delay: Duration::from_millis(250),
            hold_tolerance: 0.0,
        }
    }
}

impl DragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging_delay(mut self, delay: Duration) -> Self {
        self.dragging_delay = delay;
        self
    }

    pub fn hold_tolerance(mut self, tolerance: f32) -> Self {
        self.hold_tolerance = tolerance.max(0.0);
        self
    }
}
