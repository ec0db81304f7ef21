use crate::item::ListItem;
use crate::layout::Rect;
use crate::types::{Axis, Style, Vec2};

/// Handle to a node in a [`Scene`](super::Scene).
///
/// Ids are never reused, so a handle to a destroyed node simply stops
/// resolving instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Anchor-based placement relative to the parent rect.
///
/// `anchor_min`/`anchor_max` are normalized (0..1) points in the parent.
/// The resolved rect starts at the `anchor_min` point offset by `position`
/// and spans the anchor range plus `size_delta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectTransform {
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub position: Vec2,
    pub size_delta: Vec2,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self::fixed(0.0, 0.0, 0.0, 0.0)
    }
}

impl RectTransform {
    /// Fixed-size rect anchored at the parent's top-left corner.
    pub const fn fixed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::ZERO,
            position: Vec2::new(x, y),
            size_delta: Vec2::new(width, height),
        }
    }

    /// Fill the parent rect entirely.
    pub const fn stretch() -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::new(1.0, 1.0),
            position: Vec2::ZERO,
            size_delta: Vec2::ZERO,
        }
    }

    pub fn resolve(&self, parent: Rect) -> Rect {
        let x = parent.x + self.anchor_min.x * parent.width + self.position.x;
        let y = parent.y + self.anchor_min.y * parent.height + self.position.y;
        let width = (self.anchor_max.x - self.anchor_min.x) * parent.width + self.size_delta.x;
        let height = (self.anchor_max.y - self.anchor_min.y) * parent.height + self.size_delta.y;
        Rect::new(x, y, width.max(0.0), height.max(0.0))
    }
}

/// Stacking layout: children are placed one after another along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGroup {
    pub axis: Axis,
    pub force_expand_width: bool,
    pub force_expand_height: bool,
}

impl LayoutGroup {
    /// Top-to-bottom stack that stretches children to the full width.
    pub const fn vertical() -> Self {
        Self {
            axis: Axis::Y,
            force_expand_width: true,
            force_expand_height: false,
        }
    }

    /// Left-to-right stack that stretches children to the full height.
    pub const fn horizontal() -> Self {
        Self {
            axis: Axis::X,
            force_expand_width: false,
            force_expand_height: true,
        }
    }

    pub const fn expands(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.force_expand_width,
            Axis::Y => self.force_expand_height,
        }
    }
}

/// Scroll container component. `content` is the child that scrolls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollView {
    pub content: NodeId,
    pub horizontal: bool,
    pub vertical: bool,
    pub offset: Vec2,
}

impl ScrollView {
    pub const fn new(content: NodeId) -> Self {
        Self {
            content,
            horizontal: false,
            vertical: true,
            offset: Vec2::ZERO,
        }
    }

    pub const fn enabled(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.horizontal,
            Axis::Y => self.vertical,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub active: bool,
    pub transform: RectTransform,

    // Visual
    pub label: Option<String>,
    pub style: Style,

    // Capabilities
    /// Marks a top-level drawing surface.
    pub canvas: bool,
    pub item: Option<ListItem>,
    pub scroll_view: Option<ScrollView>,
    pub(crate) layout_group: Option<LayoutGroup>,
    /// Set when the layout group is scheduled for destruction at frame end.
    pub(crate) layout_group_doomed: bool,
}

impl Node {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            active: true,
            transform: RectTransform::default(),
            label: None,
            style: Style::default(),
            canvas: false,
            item: None,
            scroll_view: None,
            layout_group: None,
            layout_group_doomed: false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layout_group(&self) -> Option<&LayoutGroup> {
        self.layout_group.as_ref()
    }

    pub fn is_item(&self) -> bool {
        self.item.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fixed() {
        let t = RectTransform::fixed(5.0, 2.0, 10.0, 4.0);
        let rect = t.resolve(Rect::new(10.0, 10.0, 100.0, 100.0));
        assert_eq!(rect, Rect::new(15.0, 12.0, 10.0, 4.0));
    }

    #[test]
    fn test_resolve_full_width_top_anchor() {
        let t = RectTransform {
            anchor_min: Vec2::new(0.0, 0.0),
            anchor_max: Vec2::new(1.0, 0.0),
            position: Vec2::ZERO,
            size_delta: Vec2::new(0.0, 30.0),
        };
        let rect = t.resolve(Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 40.0, 30.0));
    }

    #[test]
    fn test_resolve_never_negative() {
        let t = RectTransform::fixed(0.0, 0.0, -5.0, -1.0);
        let rect = t.resolve(Rect::from_size(10.0, 10.0));
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }
}
