//! Retained node tree that lists and items live in.
//!
//! The scene is an arena of [`Node`]s addressed by [`NodeId`]. It owns child
//! ordering, reparenting, component slots and the last computed layout.
//! Destroying a node takes effect immediately, but destroying a layout group
//! is deferred until [`Scene::end_frame`], the way component teardown works
//! in most retained-mode hosts.

mod node;

pub use node::{LayoutGroup, Node, NodeId, RectTransform, ScrollView};

use crate::item::ListItem;
use crate::layout::{self, LayoutResult, Rect};
use crate::types::{Axis, Vec2};

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    roots: Vec<NodeId>,
    /// Nodes whose layout group is destroyed at the end of the frame.
    doomed_groups: Vec<NodeId>,
    layout: LayoutResult,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Create a new root node.
    pub fn create(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(name.into())));
        self.roots.push(id);
        id
    }

    /// Create a node appended as the last child of `parent`.
    ///
    /// If `parent` no longer exists the node is created as a root.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.create(name);
        if !self.set_parent(id, Some(parent)) {
            log::warn!("[scene] parent {parent} missing, {id} created as root");
        }
        id
    }

    /// Create a root drawing surface that fills the viewport.
    pub fn create_canvas(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.create(name);
        if let Some(node) = self.node_mut(id) {
            node.canvas = true;
            node.transform = RectTransform::stretch();
        }
        id
    }

    /// Attach a scroll view to `node` and create its content child.
    ///
    /// Returns the content node. Content starts anchored full-size; lists
    /// re-anchor it for their orientation.
    pub fn add_scroll_view(&mut self, node: NodeId) -> Option<NodeId> {
        let name = format!("{}-content", self.node(node)?.name);
        let content = self.create_child(node, name);
        if let Some(c) = self.node_mut(content) {
            c.transform = RectTransform::stretch();
        }
        self.node_mut(node)?.scroll_view = Some(ScrollView::new(content));
        Some(content)
    }

    /// Create an item node under `parent` carrying the given size contract.
    pub fn create_item(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        item: ListItem,
    ) -> NodeId {
        let name = name.into();
        let id = self.create_child(parent, name.clone());
        if let Some(node) = self.node_mut(id) {
            node.label = Some(name);
            node.item = Some(item);
        }
        id
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn item(&self, id: NodeId) -> Option<&ListItem> {
        self.node(id).and_then(|n| n.item.as_ref())
    }

    pub fn item_mut(&mut self, id: NodeId) -> Option<&mut ListItem> {
        self.node_mut(id).and_then(|n| n.item.as_mut())
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of direct children, active or not.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Position of `id` among its siblings.
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let siblings = match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        };
        siblings.iter().position(|&c| c == id)
    }

    /// Active children of `id` that carry the item capability, in sibling
    /// order.
    pub fn active_items(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.node(c).is_some_and(|n| n.active && n.is_item()))
    }

    /// Position of `id` among the active items of its parent. Inactive and
    /// non-item siblings are not counted.
    pub fn item_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.active_items(parent).position(|c| c == id)
    }

    /// Whether `id` and every ancestor are active.
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.node(cur) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Walk from `id` (inclusive) towards the root and return the first node
    /// matching `pred`.
    pub fn find_ancestor(&self, id: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node(cur)?;
            if pred(node) {
                return Some(cur);
            }
            current = node.parent;
        }
        None
    }

    /// True if `ancestor` is `id` itself or one of its ancestors.
    fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.parent(cur);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    pub fn set_active(&mut self, id: NodeId, active: bool) {
        if let Some(node) = self.node_mut(id) {
            node.active = active;
        }
    }

    /// Reparent `child`, appending it as the last child of `parent`
    /// (or as the last root when `parent` is `None`).
    ///
    /// Reparenting to the current parent keeps the sibling index. Returns
    /// false if either node is missing or the move would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(p) = parent {
            if !self.contains(p) || self.is_descendant_of(p, child) {
                return false;
            }
        }
        if self.parent(child) == parent && self.sibling_index(child).is_some() {
            return true;
        }

        self.unlink(child);
        match parent {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = parent;
        }
        true
    }

    /// Move `id` to position `index` among its siblings, clamped to the last
    /// valid position.
    pub fn set_sibling_index(&mut self, id: NodeId, index: usize) {
        let Some(current) = self.sibling_index(id) else {
            return;
        };
        let siblings = match self.parent(id) {
            Some(parent) => match self.node_mut(parent) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.roots,
        };
        siblings.remove(current);
        let index = index.min(siblings.len());
        siblings.insert(index, id);
    }

    /// Destroy `id` and its whole subtree.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur.0).and_then(Option::take) {
                stack.extend(node.children);
            }
            self.layout.remove(&cur);
        }
        log::trace!("[scene] destroyed {id}");
    }

    fn unlink(&mut self, id: NodeId) {
        match self.parent(id) {
            Some(parent) => {
                if let Some(node) = self.node_mut(parent) {
                    node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    // -------------------------------------------------------------------------
    // Layout group component
    // -------------------------------------------------------------------------

    pub fn layout_group(&self, id: NodeId) -> Option<&LayoutGroup> {
        self.node(id).and_then(|n| n.layout_group.as_ref())
    }

    /// Returns true if the node still carries a layout group that is
    /// scheduled for destruction.
    pub fn layout_group_pending_destroy(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.layout_group_doomed)
    }

    /// Add a layout group. Refused while any layout group is present,
    /// including one that is pending destruction.
    pub fn add_layout_group(&mut self, id: NodeId, group: LayoutGroup) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.layout_group.is_some() {
            log::debug!("[scene] {id} already has a layout group, add refused");
            return false;
        }
        node.layout_group = Some(group);
        true
    }

    /// Reconfigure an existing, live layout group in place.
    pub fn configure_layout_group(&mut self, id: NodeId, group: LayoutGroup) -> bool {
        match self.node_mut(id) {
            Some(node) if node.layout_group.is_some() && !node.layout_group_doomed => {
                node.layout_group = Some(group);
                true
            }
            _ => false,
        }
    }

    /// Schedule the layout group for destruction at the end of the frame.
    /// Returns true if there was a group to destroy.
    pub fn destroy_layout_group(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.layout_group.is_none() {
            return false;
        }
        if !node.layout_group_doomed {
            node.layout_group_doomed = true;
            self.doomed_groups.push(id);
        }
        true
    }

    /// Finish the frame: deferred component destruction happens here.
    pub fn end_frame(&mut self) {
        for id in std::mem::take(&mut self.doomed_groups) {
            if let Some(node) = self.node_mut(id) {
                node.layout_group = None;
                node.layout_group_doomed = false;
                log::trace!("[scene] layout group on {id} destroyed");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Scroll the scroll view on `id` by `delta`, honoring its enabled axes
    /// and clamping to the content overflow from the last layout.
    /// Returns true if the offset changed.
    pub fn scroll_by(&mut self, id: NodeId, delta: Vec2) -> bool {
        let Some(scroll) = self.node(id).and_then(|n| n.scroll_view) else {
            return false;
        };
        let (Some(viewport), Some(content)) = (self.world_rect(id), self.world_rect(scroll.content))
        else {
            return false;
        };

        let max_x = (content.width - viewport.width).max(0.0);
        let max_y = (content.height - viewport.height).max(0.0);
        let mut offset = scroll.offset;
        if scroll.enabled(Axis::X) {
            offset.x = (offset.x + delta.x).clamp(0.0, max_x);
        }
        if scroll.enabled(Axis::Y) {
            offset.y = (offset.y + delta.y).clamp(0.0, max_y);
        }

        if offset == scroll.offset {
            return false;
        }
        if let Some(sv) = self.node_mut(id).and_then(|n| n.scroll_view.as_mut()) {
            sv.offset = offset;
        }
        true
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Recompute every active node's rect within `viewport`.
    pub fn layout(&mut self, viewport: Rect) {
        self.layout = layout::layout(self, viewport);
    }

    /// Screen-space rect from the last layout pass.
    pub fn world_rect(&self, id: NodeId) -> Option<Rect> {
        self.layout.get(&id).copied()
    }

    pub fn layout_result(&self) -> &LayoutResult {
        &self.layout
    }
}
