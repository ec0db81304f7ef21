mod rect;

pub use rect::Rect;

use std::collections::HashMap;

use crate::item::SizeContract;
use crate::scene::{LayoutGroup, Node, NodeId, Scene};
use crate::types::{Axis, Extent, Vec2};

pub type LayoutResult = HashMap<NodeId, Rect>;

/// Lay out every root of the scene within `viewport`.
pub fn layout(scene: &Scene, viewport: Rect) -> LayoutResult {
    let mut result = LayoutResult::new();
    for &root in scene.roots() {
        layout_node(scene, root, viewport, &mut result);
    }
    result
}

fn layout_node(scene: &Scene, id: NodeId, parent_rect: Rect, result: &mut LayoutResult) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if !node.active {
        return;
    }

    let rect = node.transform.resolve(parent_rect);
    result.insert(id, rect);
    layout_children(scene, node, rect, result);
}

fn layout_children(scene: &Scene, node: &Node, rect: Rect, result: &mut LayoutResult) {
    if let Some(group) = node.layout_group() {
        stack_children(scene, group, node.children(), rect, result);
        return;
    }

    for &child in node.children() {
        // Scroll views shift their content by the scroll offset
        let parent_rect = match &node.scroll_view {
            Some(scroll) if scroll.content == child => {
                rect.translate(Vec2::ZERO - scroll.offset)
            }
            _ => rect,
        };
        layout_node(scene, child, parent_rect, result);
    }
}

/// Place active children one after another along the group's axis.
/// Children ignore their own transforms while driven by a layout group.
fn stack_children(
    scene: &Scene,
    group: &LayoutGroup,
    children: &[NodeId],
    rect: Rect,
    result: &mut LayoutResult,
) {
    let axis = group.axis;
    let cross = axis.cross();

    let flow: Vec<(&Node, NodeId, Extent)> = children
        .iter()
        .filter_map(|&id| scene.node(id).map(|n| (n, id)))
        .filter(|(n, _)| n.active)
        .map(|(n, id)| (n, id, preferred_extent(n)))
        .collect();

    if flow.is_empty() {
        return;
    }

    let main_total: f32 = flow.iter().map(|(_, _, e)| e.get(axis)).sum();
    let extra = if group.expands(axis) {
        (rect.size().get(axis) - main_total).max(0.0) / flow.len() as f32
    } else {
        0.0
    };

    let mut offset = 0.0;
    for (child, id, preferred) in flow {
        let main = preferred.get(axis) + extra;
        let cross_size = if group.expands(cross) {
            rect.size().get(cross)
        } else {
            preferred.get(cross)
        };

        let child_rect = match axis {
            Axis::X => Rect::new(rect.x + offset, rect.y, main, cross_size),
            Axis::Y => Rect::new(rect.x, rect.y + offset, cross_size, main),
        };
        result.insert(id, child_rect);
        layout_children(scene, child, child_rect, result);

        offset += main;
    }
}

/// Size a stacked child asks for: its size contract when it is an item,
/// otherwise the fixed size of its transform.
fn preferred_extent(node: &Node) -> Extent {
    let extent = match &node.item {
        Some(item) => item.effective_extent(),
        None => Extent::new(
            node.transform.size_delta.x,
            node.transform.size_delta.y,
        ),
    };
    Extent::new(extent.width.max(0.0), extent.height.max(0.0))
}
