//! Sortable list widget.
//!
//! A [`SortableList`] owns the ordered items inside a scroll view's content
//! node. It keeps the stacking layout and scroll axes in line with its
//! orientation, sizes the content to fit its items, and turns item
//! pointer signals into [`ListEvent`]s for the drag manager.

mod set;

pub use set::ListSet;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ItemCacheKey, ListConfig};
use crate::error::ListError;
use crate::event::{ListEvent, PointerState};
use crate::item::SizeContract;
use crate::manager::{DragManager, Registration};
use crate::scene::{LayoutGroup, NodeId, Scene};
use crate::types::{Orientation, Vec2};

/// Unique identifier for a sortable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u64);

impl ListId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__sortable_{}", self.0)
    }
}

/// Initialization progress of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitState {
    /// Not started; the next update validates configuration.
    Pending,
    /// Waiting for the layout group of the other orientation to go away.
    ClearingLayout,
    /// Configured and registered with the drag manager.
    Ready,
    /// Configuration was invalid.
    Failed(ListError),
}

/// References resolved when the list starts.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    canvas: NodeId,
    scroll_view: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheStamp {
    Count(usize),
    Children(Vec<NodeId>),
}

#[derive(Debug)]
struct ItemCache {
    stamp: CacheStamp,
    items: Vec<NodeId>,
}

#[derive(Debug)]
pub struct SortableList {
    id: ListId,
    node: NodeId,
    config: ListConfig,
    scroll_lock: bool,
    state: InitState,
    /// Content clearing happens once, on the first start only.
    started: bool,
    resolved: Option<Resolved>,
    items: Option<ItemCache>,
    registration: Option<Registration>,
}

impl SortableList {
    /// Create a list living on `node`. Nothing is validated until the first
    /// [`update`](Self::update).
    pub fn new(node: NodeId, config: ListConfig) -> Self {
        Self {
            id: ListId::new(),
            node,
            config,
            scroll_lock: false,
            state: InitState::Pending,
            started: false,
            resolved: None,
            items: None,
            registration: None,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    /// The node whose rect is the list's drop area.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn state(&self) -> &InitState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == InitState::Ready
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    pub fn scroll_lock(&self) -> bool {
        self.scroll_lock
    }

    /// The canvas dragged items are lifted into, once started.
    pub fn canvas(&self) -> Option<NodeId> {
        self.resolved.map(|r| r.canvas)
    }

    /// The node carrying this list's scroll view.
    pub fn scroll_view(&self) -> Option<NodeId> {
        self.resolved
            .map(|r| r.scroll_view)
            .or(self.config.scroll_view)
    }

    /// The container that holds the items.
    pub fn content(&self, scene: &Scene) -> Option<NodeId> {
        let scroll_view = self.scroll_view()?;
        scene.node(scroll_view)?.scroll_view.map(|s| s.content)
    }

    // -------------------------------------------------------------------------
    // Initialization
    // -------------------------------------------------------------------------

    /// Drive initialization. Call once per tick; it is a no-op once ready.
    ///
    /// Layout group teardown is deferred by the scene, so switching the
    /// stacking layout can take more than one tick: the list waits in
    /// [`InitState::ClearingLayout`] until the old group is really gone.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        manager: &mut DragManager,
    ) -> Result<(), ListError> {
        match &self.state {
            InitState::Ready => Ok(()),
            InitState::Failed(err) => Err(err.clone()),
            InitState::Pending => {
                let resolved = match self.resolve(scene) {
                    Ok(resolved) => resolved,
                    Err(err) => {
                        log::error!("[list] {} failed to start: {err}", self.id);
                        self.state = InitState::Failed(err.clone());
                        return Err(err);
                    }
                };
                self.resolved = Some(resolved);

                if !self.started {
                    self.started = true;
                    if self.config.clear_content {
                        self.clear_content(scene);
                    }
                }

                if self.clear_other_layout(scene) {
                    log::debug!("[list] {} waiting for old layout teardown", self.id);
                    self.state = InitState::ClearingLayout;
                    return Ok(());
                }
                self.initialize(scene, manager);
                Ok(())
            }
            InitState::ClearingLayout => {
                if !self.clear_other_layout(scene) {
                    self.initialize(scene, manager);
                }
                Ok(())
            }
        }
    }

    /// Switch stacking direction. The list re-runs initialization on its
    /// next update, tearing down the old layout first.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.config.orientation == orientation {
            return;
        }
        self.config.orientation = orientation;
        if !matches!(self.state, InitState::Failed(_)) {
            self.state = InitState::Pending;
        }
        self.items = None;
    }

    fn resolve(&self, scene: &Scene) -> Result<Resolved, ListError> {
        let name = match scene.node(self.node) {
            Some(node) => node.name.clone(),
            None => return Err(ListError::StaleNode { node: self.node }),
        };

        let canvas = match self.config.canvas {
            Some(canvas) if scene.node(canvas).is_some_and(|n| n.canvas) => canvas,
            _ => scene
                .find_ancestor(self.node, |n| n.canvas)
                .ok_or_else(|| ListError::MissingCanvas { list: name.clone() })?,
        };

        let scroll_view = self
            .config
            .scroll_view
            .ok_or_else(|| ListError::MissingScrollView { list: name.clone() })?;
        if scene.node(scroll_view).and_then(|n| n.scroll_view).is_none() {
            return Err(ListError::NotAScrollView {
                list: name,
                node: scroll_view,
            });
        }

        Ok(Resolved {
            canvas,
            scroll_view,
        })
    }

    fn clear_content(&mut self, scene: &mut Scene) {
        let Some(content) = self.content(scene) else {
            return;
        };
        let children = scene.children(content).to_vec();
        log::debug!("[list] {} clearing {} children", self.id, children.len());
        for child in children {
            scene.destroy(child);
        }
        self.items = None;
    }

    /// Schedule removal of a layout group that does not match the
    /// orientation. Returns true while such a group is still present.
    fn clear_other_layout(&self, scene: &mut Scene) -> bool {
        let Some(content) = self.content(scene) else {
            return false;
        };
        let axis = self.config.orientation.axis();
        match scene.layout_group(content) {
            Some(group) if group.axis != axis => {
                scene.destroy_layout_group(content);
                true
            }
            // A matching group that is on its way out still blocks adding a new one
            Some(_) => scene.layout_group_pending_destroy(content),
            None => false,
        }
    }

    fn initialize(&mut self, scene: &mut Scene, manager: &mut DragManager) {
        self.apply_scroll_axes(scene);
        self.install_layout(scene);
        self.update_content_size(scene);
        self.state = InitState::Ready;
        if self.registration.is_none() {
            self.registration = Some(manager.register(self.id));
        }
        log::debug!(
            "[list] {} ready ({:?})",
            self.id,
            self.config.orientation
        );
    }

    fn install_layout(&self, scene: &mut Scene) {
        let Some(content) = self.content(scene) else {
            return;
        };
        let group = match self.config.orientation {
            Orientation::Vertical => LayoutGroup::vertical(),
            Orientation::Horizontal => LayoutGroup::horizontal(),
        };
        if !scene.configure_layout_group(content, group)
            && !scene.add_layout_group(content, group)
        {
            log::warn!("[list] {} could not install its layout group", self.id);
        }
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Lock disables both scroll axes; unlocking restores the axis the
    /// orientation scrolls along.
    pub fn set_scroll_lock(&mut self, scene: &mut Scene, lock: bool) {
        self.scroll_lock = lock;
        self.apply_scroll_axes(scene);
    }

    fn apply_scroll_axes(&self, scene: &mut Scene) {
        let Some(scroll_view) = self.scroll_view() else {
            return;
        };
        let Some(scroll) = scene.node_mut(scroll_view).and_then(|n| n.scroll_view.as_mut()) else {
            return;
        };
        let (horizontal, vertical) = match (self.scroll_lock, self.config.orientation) {
            (true, _) => (false, false),
            (false, Orientation::Vertical) => (false, true),
            (false, Orientation::Horizontal) => (true, false),
        };
        scroll.horizontal = horizontal;
        scroll.vertical = vertical;
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Active children of the content container that carry the item
    /// capability, in sibling order.
    ///
    /// The sequence is cached. With [`ItemCacheKey::ChildCount`] a reorder
    /// that keeps the child count unchanged returns the previous order until
    /// the count changes or [`invalidate_items`](Self::invalidate_items) is
    /// called.
    pub fn items(&mut self, scene: &Scene) -> &[NodeId] {
        let Some(content) = self.content(scene) else {
            return &[];
        };
        let stamp = match self.config.cache_key {
            ItemCacheKey::ChildCount => CacheStamp::Count(scene.child_count(content)),
            ItemCacheKey::Identity => CacheStamp::Children(scene.children(content).to_vec()),
        };

        let fresh = matches!(&self.items, Some(cache) if cache.stamp == stamp);
        if !fresh {
            let items = scene.active_items(content).collect();
            self.items = Some(ItemCache { stamp, items });
        }

        self.items.as_ref().map(|c| c.items.as_slice()).unwrap_or(&[])
    }

    /// Drop the cached item sequence.
    pub fn invalidate_items(&mut self) {
        self.items = None;
    }

    /// Reparent `item` under this list's content so it becomes item number
    /// `index`, clamped to the end of the list.
    ///
    /// `index` counts items only. The item goes right before the item
    /// currently at `index`, or right after the last item when `index` is
    /// past the end, so inactive and non-item children keep their places.
    pub fn attach_item(&mut self, scene: &mut Scene, item: NodeId, index: usize) {
        let Some(content) = self.content(scene) else {
            log::warn!("[list] {} has no content to attach {item} to", self.id);
            return;
        };
        if !scene.set_parent(item, Some(content)) {
            log::warn!("[list] {} could not attach {item}", self.id);
            return;
        }

        let others: Vec<NodeId> = scene.active_items(content).filter(|&c| c != item).collect();
        let anchor = match others.get(index) {
            Some(&next) => Some((next, 0)),
            None => others.last().map(|&last| (last, 1)),
        };
        // Sibling positions with `item` taken out, as set_sibling_index sees them
        let siblings: Vec<NodeId> = scene
            .children(content)
            .iter()
            .copied()
            .filter(|&c| c != item)
            .collect();
        let sibling = anchor
            .and_then(|(node, after)| siblings.iter().position(|&c| c == node).map(|p| p + after))
            .unwrap_or(siblings.len());
        scene.set_sibling_index(item, sibling);

        // A move within the content keeps the child count
        self.items = None;
        log::trace!("[list] {} attached {item} at {index}", self.id);
        self.update_content_size(scene);
    }

    /// Position of `item` among this list's items, counted live.
    pub fn item_index(&self, scene: &Scene, item: NodeId) -> Option<usize> {
        if !self.owns(scene, item) {
            return None;
        }
        scene.item_index(item)
    }

    /// Reparent `item` to `new_parent` and resize the content.
    pub fn detach_item(&mut self, scene: &mut Scene, item: NodeId, new_parent: NodeId) {
        if !scene.set_parent(item, Some(new_parent)) {
            log::warn!("[list] {} could not move {item} to {new_parent}", self.id);
        }
        self.update_content_size(scene);
    }

    /// Destroy `item` and resize the content.
    pub fn remove_item(&mut self, scene: &mut Scene, item: NodeId) {
        scene.destroy(item);
        self.update_content_size(scene);
    }

    /// Resize the content container to the sum of its items' sizes along
    /// the orientation axis and return that extent.
    ///
    /// Each item counts `max(preferred, minimum)`. An item measuring
    /// non-positive counts the default size instead, and the default is
    /// written back into its contract. The content's anchors are re-asserted
    /// so it always fills the cross axis.
    pub fn update_content_size(&mut self, scene: &mut Scene) -> f32 {
        let Some(content) = self.content(scene) else {
            return 0.0;
        };
        let orientation = self.config.orientation;
        let axis = orientation.axis();
        let default = self.config.default_size.get(axis);

        let items = self.items(scene).to_vec();
        let mut total = 0.0;
        for id in items {
            let Some(item) = scene.item_mut(id) else {
                continue;
            };
            let mut size = item.effective(axis);
            if size <= 0.0 {
                size = default;
                let mut min = item.min_extent();
                let mut preferred = item.preferred_extent();
                min.set(axis, default);
                preferred.set(axis, default);
                item.set_min_extent(min);
                item.set_preferred_extent(preferred);
                log::trace!("[list] {} defaulted size of {id}", self.id);
            }
            total += size;
        }

        if let Some(node) = scene.node_mut(content) {
            let transform = &mut node.transform;
            match orientation {
                Orientation::Vertical => {
                    transform.anchor_min = Vec2::new(0.0, 0.0);
                    transform.anchor_max = Vec2::new(1.0, 0.0);
                    transform.size_delta = Vec2::new(0.0, total);
                }
                Orientation::Horizontal => {
                    transform.anchor_min = Vec2::new(0.0, 0.0);
                    transform.anchor_max = Vec2::new(0.0, 1.0);
                    transform.size_delta = Vec2::new(total, 0.0);
                }
            }
        }
        total
    }

    /// Content extent along the orientation axis as last computed.
    pub fn content_extent(&self, scene: &Scene) -> f32 {
        self.content(scene)
            .and_then(|c| scene.node(c))
            .map(|n| n.transform.size_delta.get(self.config.orientation.axis()))
            .unwrap_or(0.0)
    }

    /// Whether `item` currently sits directly in this list's content.
    pub fn owns(&self, scene: &Scene, item: NodeId) -> bool {
        self.content(scene)
            .is_some_and(|content| scene.parent(item) == Some(content))
    }

    // -------------------------------------------------------------------------
    // Item events
    // -------------------------------------------------------------------------

    /// Forward an item press. Filtered by the primary button state at the
    /// time of forwarding, not just by the press itself.
    pub fn on_item_pressed(
        &self,
        scene: &Scene,
        item: NodeId,
        pointer: &PointerState,
    ) -> Option<ListEvent> {
        if !pointer.primary_held || !self.owns(scene, item) {
            return None;
        }
        Some(ListEvent::ItemPressed {
            list: self.id,
            item,
        })
    }

    pub fn on_item_released(&self, scene: &Scene, item: NodeId) -> Option<ListEvent> {
        self.owns(scene, item).then_some(ListEvent::ItemReleased {
            list: self.id,
            item,
        })
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Unregister from the drag manager and destroy the list's node.
    ///
    /// A manager that is gone, or no longer knows this list, is not an error.
    pub fn destroy(mut self, scene: &mut Scene, manager: Option<&mut DragManager>) {
        match (self.registration.take(), manager) {
            (Some(registration), Some(manager)) => {
                if !manager.unregister(registration) {
                    log::debug!("[list] {} was already unregistered", self.id);
                }
            }
            (Some(_), None) => {
                log::warn!(
                    "[list] {} destroyed after its drag manager, nothing to unregister",
                    self.id
                );
            }
            (None, _) => {}
        }
        scene.destroy(self.node);
    }
}
