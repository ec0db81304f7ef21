//! Drag coordination across sortable lists.
//!
//! The [`DragManager`] watches item presses forwarded by registered lists
//! and runs the gesture state machine:
//!
//! ```text
//! Idle ──press──▶ Prepping ──held still past delay──▶ Dragging ──release──▶ Idle
//!                    │                                    │
//!                    └──────────release──────▶ Idle ◀─────┘ (cancel)
//! ```
//!
//! While dragging, the item floats on its list's canvas, every registered
//! list is scroll-locked, and a placeholder item previews where it will land.
//! The manager never reorders a list's container itself: every move goes
//! through the list's own attach/detach operations.

mod gesture;

pub use gesture::{insertion_index, Drag, GestureState, Press};

use std::time::Duration;

use crate::config::DragConfig;
use crate::event::{ListEvent, PointerState};
use crate::item::{ListItem, SizeContract};
use crate::list::{ListId, ListSet};
use crate::scene::{NodeId, RectTransform, Scene};
use crate::types::{Border, Extent, Style, Vec2};

/// Proof that a list is registered with a [`DragManager`].
///
/// Handed back to [`DragManager::unregister`] when the list goes away.
#[must_use = "a registration that is dropped can never be unregistered"]
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    list: ListId,
}

impl Registration {
    pub fn list(&self) -> ListId {
        self.list
    }
}

#[derive(Debug)]
pub struct DragManager {
    config: DragConfig,
    /// Registered lists in registration order. Hover tests scan this order.
    registered: Vec<ListId>,
    state: GestureState,
    scroll_lock: bool,
    /// Inactive parent the placeholder returns to between previews.
    root: NodeId,
    placeholder: NodeId,
}

impl DragManager {
    pub fn new(scene: &mut Scene, config: DragConfig) -> Self {
        let root = scene.create("drag-manager");
        scene.set_active(root, false);
        let placeholder = create_placeholder(scene, root);
        Self {
            config,
            registered: Vec::new(),
            state: GestureState::Idle,
            scroll_lock: false,
            root,
            placeholder,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a list as a drag source and drop target.
    /// Registering twice keeps the original position in the scan order.
    pub fn register(&mut self, list: ListId) -> Registration {
        if self.registered.contains(&list) {
            log::debug!("[drag] {list} already registered");
        } else {
            self.registered.push(list);
            log::debug!("[drag] registered {list} ({} total)", self.registered.len());
        }
        Registration { list }
    }

    /// Returns false if the list was not registered.
    pub fn unregister(&mut self, registration: Registration) -> bool {
        let list = registration.list;
        let Some(pos) = self.registered.iter().position(|&id| id == list) else {
            return false;
        };
        self.registered.remove(pos);

        if let GestureState::Dragging(drag) = &mut self.state {
            if drag.target == Some(list) {
                drag.target = None;
                drag.target_index = None;
                drag.cached_rects.clear();
            }
        }
        log::debug!("[drag] unregistered {list}");
        true
    }

    pub fn registered(&self) -> &[ListId] {
        &self.registered
    }

    pub fn is_registered(&self, list: ListId) -> bool {
        self.registered.contains(&list)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_prepping(&self) -> bool {
        self.state.is_prepping()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// True while a drag holds every registered list still.
    pub fn scroll_lock(&self) -> bool {
        self.scroll_lock
    }

    pub fn source(&self) -> Option<ListId> {
        self.state.press().map(|p| p.source)
    }

    pub fn dragged_item(&self) -> Option<NodeId> {
        self.state.press().map(|p| p.item)
    }

    pub fn target(&self) -> Option<ListId> {
        self.state.drag().and_then(|d| d.target)
    }

    pub fn target_index(&self) -> Option<usize> {
        self.state.drag().and_then(|d| d.target_index)
    }

    pub fn placeholder(&self) -> NodeId {
        self.placeholder
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the current gesture touches `list` as source, target, or
    /// placeholder host.
    pub fn involves(&self, list: ListId) -> bool {
        match &self.state {
            GestureState::Idle => false,
            GestureState::Prepping(press) => press.source == list,
            GestureState::Dragging(drag) => {
                drag.press.source == list
                    || drag.target == Some(list)
                    || drag.placeholder_host == Some(list)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// React to a press or release forwarded by a list.
    pub fn handle_list_event(
        &mut self,
        scene: &Scene,
        event: &ListEvent,
        pointer: &PointerState,
        now: Duration,
    ) {
        match *event {
            ListEvent::ItemPressed { list, item } => {
                if !self.is_registered(list) {
                    log::debug!("[drag] press on {item} from unregistered {list} ignored");
                    return;
                }
                if !self.state.is_idle() {
                    log::debug!("[drag] press on {item} ignored, gesture in progress");
                    return;
                }
                let grab_offset = scene
                    .world_rect(item)
                    .map(|r| pointer.position - r.origin())
                    .unwrap_or(Vec2::ZERO);
                let press = Press {
                    source: list,
                    item,
                    source_index: scene.item_index(item).unwrap_or(0),
                    pressed_at: now,
                    position: pointer.position,
                    grab_offset,
                };
                log::debug!(
                    "[drag] prepping {item} from {list} at index {}",
                    press.source_index
                );
                self.state = GestureState::Prepping(press);
            }
            ListEvent::ItemReleased { item, .. } => {
                if let GestureState::Prepping(press) = &self.state {
                    if press.item == item {
                        log::debug!("[drag] {item} released before the delay, aborting");
                        self.state = GestureState::Idle;
                    }
                }
            }
        }
    }

    /// Advance the gesture by one frame.
    ///
    /// Call after lists have updated and before the scene is laid out. The
    /// tick that starts a drag does not hit-test: the last layout still has
    /// the lifted item inside its list.
    pub fn tick(
        &mut self,
        scene: &mut Scene,
        lists: &mut ListSet,
        pointer: &PointerState,
        now: Duration,
    ) {
        let mut drag = match std::mem::take(&mut self.state) {
            GestureState::Idle => return,
            GestureState::Prepping(press) => {
                if !self.hold_complete(&press, pointer, now) {
                    self.state = GestureState::Prepping(press);
                    return;
                }
                match self.start_dragging(scene, lists, press, pointer) {
                    Some(drag) => drag,
                    None => return,
                }
            }
            GestureState::Dragging(mut drag) => {
                self.update_target(scene, lists, &mut drag, pointer);
                drag
            }
        };

        if pointer.primary_released {
            self.finish(scene, lists, &mut drag);
        } else {
            follow_pointer(scene, &drag, pointer);
            self.state = GestureState::Dragging(drag);
        }
    }

    /// Abandon the current gesture. A lifted item goes back to its source
    /// list at its original index.
    pub fn cancel(&mut self, scene: &mut Scene, lists: &mut ListSet) {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => {}
            GestureState::Prepping(press) => {
                log::debug!("[drag] cancelled press on {}", press.item);
            }
            GestureState::Dragging(mut drag) => {
                log::debug!("[drag] cancelled drag of {}", drag.press.item);
                drag.target = None;
                drag.target_index = None;
                self.finish(scene, lists, &mut drag);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Gesture steps
    // -------------------------------------------------------------------------

    fn hold_complete(&self, press: &Press, pointer: &PointerState, now: Duration) -> bool {
        let held = now.saturating_sub(press.pressed_at);
        held > self.config.dragging_delay
            && pointer.position.distance(press.position) <= self.config.hold_tolerance
    }

    /// Lift the pressed item out of its list onto the list's canvas.
    fn start_dragging(
        &mut self,
        scene: &mut Scene,
        lists: &mut ListSet,
        press: Press,
        pointer: &PointerState,
    ) -> Option<Drag> {
        let Some(list) = lists.get_mut(press.source) else {
            log::warn!("[drag] source {} vanished before the drag started", press.source);
            return None;
        };
        let Some(canvas) = list.canvas() else {
            log::warn!("[drag] source {} has no canvas", press.source);
            return None;
        };
        if !list.owns(scene, press.item) {
            log::warn!("[drag] {} left {} before the drag started", press.item, press.source);
            return None;
        }

        let original_transform = scene.node(press.item)?.transform;
        let size = scene
            .world_rect(press.item)
            .map(|r| r.size())
            .or_else(|| scene.item(press.item).map(SizeContract::effective_extent))
            .unwrap_or(Extent::ZERO);

        list.detach_item(scene, press.item, canvas);
        if let Some(node) = scene.node_mut(press.item) {
            node.transform = RectTransform::fixed(0.0, 0.0, size.width, size.height);
        }

        let drag = Drag::new(press, canvas, original_transform);
        follow_pointer(scene, &drag, pointer);
        self.set_scroll_lock(scene, lists, true);
        log::debug!("[drag] lifted {} from {}", press.item, press.source);
        Some(drag)
    }

    /// Track the list under the pointer and move the placeholder to the
    /// insertion index.
    fn update_target(
        &mut self,
        scene: &mut Scene,
        lists: &mut ListSet,
        drag: &mut Drag,
        pointer: &PointerState,
    ) {
        let hovered = self.registered.iter().copied().find(|&id| {
            lists
                .get(id)
                .and_then(|list| scene.world_rect(list.node()))
                .is_some_and(|rect| rect.contains(pointer.position))
        });

        if hovered != drag.target {
            drag.target = hovered;
            drag.target_index = None;
            drag.cached_rects = match hovered.and_then(|id| lists.get_mut(id)) {
                Some(list) => list
                    .items(scene)
                    .iter()
                    .map(|&item| scene.world_rect(item).unwrap_or_default())
                    .collect(),
                None => Vec::new(),
            };
            match hovered {
                Some(id) => log::debug!(
                    "[drag] over {id}, cached {} item rects",
                    drag.cached_rects.len()
                ),
                None => log::debug!("[drag] left all lists"),
            }
        }

        let Some(target) = drag.target else {
            self.withdraw_placeholder(scene, lists, drag);
            return;
        };

        let index = insertion_index(&drag.cached_rects, pointer.position);
        self.ensure_placeholder(scene);
        if let Some(dragged) = scene.item(drag.press.item).copied() {
            if let Some(placeholder) = scene.item_mut(self.placeholder) {
                placeholder.set_min_extent(dragged.min_extent());
                placeholder.set_preferred_extent(dragged.preferred_extent());
            }
        }

        let moved = drag.target_index != Some(index) || drag.placeholder_host != Some(target);
        drag.target_index = Some(index);
        if !moved {
            return;
        }

        if let Some(host) = drag.placeholder_host.filter(|&host| host != target) {
            self.return_placeholder(scene, lists, host);
            drag.placeholder_host = None;
        }
        let Some(list) = lists.get_mut(target) else {
            return;
        };
        scene.set_active(self.placeholder, true);
        list.attach_item(scene, self.placeholder, index);
        drag.placeholder_host = Some(target);
        log::trace!("[drag] placeholder at {target}[{index}]");

        if let Some(source) = lists.get_mut(drag.press.source) {
            source.update_content_size(scene);
        }
    }

    /// Drop the item where the gesture points and return to idle.
    fn finish(&mut self, scene: &mut Scene, lists: &mut ListSet, drag: &mut Drag) {
        self.state = GestureState::Idle;
        self.set_scroll_lock(scene, lists, false);
        self.withdraw_placeholder(scene, lists, drag);

        let item = drag.press.item;
        if let Some(node) = scene.node_mut(item) {
            node.transform = drag.original_transform;
        }

        let (mut list_id, mut index) = drag.drop_location();
        if lists.get(list_id).is_none() {
            log::warn!("[drag] target {list_id} is gone, returning {item} to its source");
            list_id = drag.press.source;
            index = drag.press.source_index;
        }
        match lists.get_mut(list_id) {
            Some(list) => {
                list.attach_item(scene, item, index);
                log::debug!("[drag] dropped {item} into {list_id} at {index}");
            }
            None => log::warn!("[drag] source {list_id} is gone, {item} stays on the canvas"),
        }
    }

    fn withdraw_placeholder(&mut self, scene: &mut Scene, lists: &mut ListSet, drag: &mut Drag) {
        if let Some(host) = drag.placeholder_host.take() {
            self.return_placeholder(scene, lists, host);
        }
    }

    /// Take the placeholder out of `host` and park it, inactive, under the
    /// manager's root.
    fn return_placeholder(&mut self, scene: &mut Scene, lists: &mut ListSet, host: ListId) {
        self.ensure_placeholder(scene);
        match lists.get_mut(host) {
            Some(list) => list.detach_item(scene, self.placeholder, self.root),
            None => {
                scene.set_parent(self.placeholder, Some(self.root));
            }
        }
        scene.set_active(self.placeholder, false);
    }

    /// Recreate the placeholder (and its root) if something destroyed them.
    fn ensure_placeholder(&mut self, scene: &mut Scene) {
        if !scene.contains(self.root) {
            self.root = scene.create("drag-manager");
            scene.set_active(self.root, false);
        }
        if !scene.contains(self.placeholder) {
            log::warn!("[drag] placeholder was destroyed, recreating");
            self.placeholder = create_placeholder(scene, self.root);
        }
    }

    fn set_scroll_lock(&mut self, scene: &mut Scene, lists: &mut ListSet, lock: bool) {
        for &id in &self.registered {
            if let Some(list) = lists.get_mut(id) {
                list.set_scroll_lock(scene, lock);
            }
        }
        self.scroll_lock = lock;
    }
}

fn create_placeholder(scene: &mut Scene, root: NodeId) -> NodeId {
    let id = scene.create_item(root, "placeholder", ListItem::new());
    scene.set_active(id, false);
    if let Some(node) = scene.node_mut(id) {
        node.label = None;
        node.style = Style::new().border(Border::Rounded).dim();
    }
    id
}

/// Keep the floating item under the pointer at the offset it was grabbed by.
fn follow_pointer(scene: &mut Scene, drag: &Drag, pointer: &PointerState) {
    let canvas_origin = scene
        .world_rect(drag.canvas)
        .map(|r| r.origin())
        .unwrap_or(Vec2::ZERO);
    let position = pointer.position - drag.press.grab_offset - canvas_origin;
    if let Some(node) = scene.node_mut(drag.press.item) {
        node.transform.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::SortableList;
    use crate::config::ListConfig;

    fn manager() -> (Scene, DragManager) {
        let mut scene = Scene::new();
        let manager = DragManager::new(&mut scene, DragConfig::default());
        (scene, manager)
    }

    fn list_id(scene: &mut Scene) -> ListId {
        let node = scene.create("list");
        SortableList::new(node, ListConfig::default()).id()
    }

    #[test]
    fn test_register_is_idempotent_and_ordered() {
        let (mut scene, mut manager) = manager();
        let a = list_id(&mut scene);
        let b = list_id(&mut scene);

        let _ra = manager.register(a);
        let _rb = manager.register(b);
        let again = manager.register(a);
        assert_eq!(manager.registered(), &[a, b]);
        assert_eq!(again.list(), a);
    }

    #[test]
    fn test_unregister_reports_unknown_list() {
        let (mut scene, mut manager) = manager();
        let a = list_id(&mut scene);
        let first = manager.register(a);
        let second = manager.register(a);

        assert!(manager.unregister(first));
        assert!(!manager.unregister(second));
        assert!(manager.registered().is_empty());
    }

    #[test]
    fn test_placeholder_starts_parked_and_inactive() {
        let (scene, manager) = manager();
        let placeholder = scene.node(manager.placeholder()).unwrap();
        assert!(!placeholder.active);
        assert!(placeholder.is_item());
        assert_eq!(placeholder.parent(), Some(manager.root()));
    }

    #[test]
    fn test_press_from_unregistered_list_is_ignored() {
        let (mut scene, mut manager) = manager();
        let a = list_id(&mut scene);
        let item = scene.create("item");
        let event = ListEvent::ItemPressed { list: a, item };
        let pointer = PointerState::at(1.0, 1.0).held(true);

        manager.handle_list_event(&scene, &event, &pointer, Duration::ZERO);
        assert!(manager.state().is_idle());
    }

    #[test]
    fn test_release_while_prepping_aborts() {
        let (mut scene, mut manager) = manager();
        let a = list_id(&mut scene);
        let _reg = manager.register(a);
        let item = scene.create("item");
        let pointer = PointerState::at(1.0, 1.0).held(true);

        let pressed = ListEvent::ItemPressed { list: a, item };
        manager.handle_list_event(&scene, &pressed, &pointer, Duration::ZERO);
        assert!(manager.is_prepping());
        assert_eq!(manager.source(), Some(a));
        assert!(manager.involves(a));

        let released = ListEvent::ItemReleased { list: a, item };
        manager.handle_list_event(&scene, &released, &pointer, Duration::ZERO);
        assert!(manager.state().is_idle());
        assert_eq!(manager.source(), None);
    }
}
