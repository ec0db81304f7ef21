use crate::scene::{Node, NodeId, Scene};
use crate::types::Vec2;

/// Find the topmost active list item at the given point.
/// Returns None if no item contains the point.
pub fn hit_test_item(scene: &Scene, point: Vec2) -> Option<NodeId> {
    hit_test_where(scene, point, Node::is_item)
}

/// Find the deepest active node at the given point, whatever it carries.
pub fn hit_test_any(scene: &Scene, point: Vec2) -> Option<NodeId> {
    hit_test_where(scene, point, |_| true)
}

fn hit_test_where(
    scene: &Scene,
    point: Vec2,
    pred: impl Fn(&Node) -> bool + Copy,
) -> Option<NodeId> {
    // Later roots draw over earlier ones
    scene
        .roots()
        .iter()
        .rev()
        .find_map(|&root| hit_test_node(scene, root, point, pred))
}

fn hit_test_node(
    scene: &Scene,
    id: NodeId,
    point: Vec2,
    pred: impl Fn(&Node) -> bool + Copy,
) -> Option<NodeId> {
    let node = scene.node(id)?;
    if !node.active {
        return None;
    }
    let rect = scene.world_rect(id)?;

    // Nodes clip their children to their own rect
    if !rect.contains(point) {
        return None;
    }

    // Check children in reverse order (last rendered = on top)
    for &child in node.children().iter().rev() {
        if let Some(hit) = hit_test_node(scene, child, point, pred) {
            return Some(hit);
        }
    }

    pred(node).then_some(id)
}
