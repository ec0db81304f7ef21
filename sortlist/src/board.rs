//! Frame driver tying the scene, lists and drag manager together.
//!
//! A [`Board`] plays the host's part: it routes pointer input to items,
//! runs list initialization and the drag tick in order, then finishes the
//! frame and lays the scene out again.

use std::time::Duration;

use crate::config::DragConfig;
use crate::error::ListError;
use crate::event::{MouseButton, PointerEvent, PointerState};
use crate::hit::hit_test_item;
use crate::item::ItemSignal;
use crate::layout::Rect;
use crate::list::{ListId, ListSet, SortableList};
use crate::manager::DragManager;
use crate::scene::{NodeId, Scene};
use crate::types::Vec2;

/// Input for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Logical time of this frame.
    pub now: Duration,
    pub events: Vec<PointerEvent>,
}

impl FrameInput {
    pub fn at(now: Duration) -> Self {
        Self {
            now,
            events: Vec::new(),
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::at(Duration::from_millis(ms))
    }

    pub fn event(mut self, event: PointerEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn down(self, x: f32, y: f32) -> Self {
        self.event(PointerEvent::down(x, y))
    }

    pub fn up(self, x: f32, y: f32) -> Self {
        self.event(PointerEvent::up(x, y))
    }

    pub fn moved(self, x: f32, y: f32) -> Self {
        self.event(PointerEvent::moved(x, y))
    }
}

#[derive(Debug)]
pub struct Board {
    pub scene: Scene,
    pub lists: ListSet,
    pub manager: DragManager,
    viewport: Rect,
    pointer: PointerState,
    /// Item that received the last primary press; releases go to it.
    pressed_item: Option<NodeId>,
    now: Duration,
}

impl Board {
    pub fn new(viewport: Rect, config: DragConfig) -> Self {
        let mut scene = Scene::new();
        let manager = DragManager::new(&mut scene, config);
        scene.layout(viewport);
        Self {
            scene,
            lists: ListSet::new(),
            manager,
            viewport,
            pointer: PointerState::new(),
            pressed_item: None,
            now: Duration::ZERO,
        }
    }

    pub fn add_list(&mut self, list: SortableList) -> ListId {
        self.lists.insert(list)
    }

    /// Destroy a list. A drag involving it is cancelled first.
    pub fn remove_list(&mut self, id: ListId) -> bool {
        let removed = self.lists.remove(id, &mut self.scene, &mut self.manager);
        if removed {
            self.scene.layout(self.viewport);
        }
        removed
    }

    pub fn list(&self, id: ListId) -> Option<&SortableList> {
        self.lists.get(id)
    }

    pub fn list_mut(&mut self, id: ListId) -> Option<&mut SortableList> {
        self.lists.get_mut(id)
    }

    /// Current item order of a list.
    pub fn items(&mut self, id: ListId) -> Vec<NodeId> {
        match self.lists.get_mut(id) {
            Some(list) => list.items(&self.scene).to_vec(),
            None => Vec::new(),
        }
    }

    /// Labels of a list's items, in order.
    pub fn labels(&mut self, id: ListId) -> Vec<String> {
        self.items(id)
            .into_iter()
            .filter_map(|item| self.scene.node(item).and_then(|n| n.label.clone()))
            .collect()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn resize(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.scene.layout(viewport);
    }

    /// Abandon the current gesture; a lifted item goes back where it came from.
    pub fn cancel_drag(&mut self) {
        self.manager.cancel(&mut self.scene, &mut self.lists);
        self.pressed_item = None;
        self.scene.layout(self.viewport);
    }

    /// Run one frame: deliver input, update lists, tick the drag manager,
    /// finish deferred teardown and lay the scene out.
    ///
    /// A list configuration error is returned after the frame completes,
    /// so healthy lists keep working.
    pub fn frame(&mut self, input: &FrameInput) -> Result<(), ListError> {
        self.now = input.now;
        self.pointer.begin_frame();
        for event in &input.events {
            self.pointer.apply(event);
            self.dispatch(event);
        }

        let updated = self.lists.update_all(&mut self.scene, &mut self.manager);
        self.manager
            .tick(&mut self.scene, &mut self.lists, &self.pointer, self.now);
        self.scene.end_frame();
        self.scene.layout(self.viewport);
        updated
    }

    fn dispatch(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.press(position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => self.release(),
            PointerEvent::Scroll { position, delta } => self.scroll(position, delta),
            _ => {}
        }
    }

    fn press(&mut self, position: Vec2) {
        let Some(item) = hit_test_item(&self.scene, position) else {
            return;
        };
        let (Some(bounds), Some(cell)) =
            (self.scene.world_rect(item), self.scene.item(item).copied())
        else {
            return;
        };
        let Some(ItemSignal::Pressed(node)) = cell.on_pointer_down(item, bounds, position) else {
            return;
        };
        self.pressed_item = Some(node);

        let event = self
            .lists
            .owner_of(&self.scene, node)
            .and_then(|owner| self.lists.get(owner))
            .and_then(|list| list.on_item_pressed(&self.scene, node, &self.pointer));
        if let Some(event) = event {
            self.manager
                .handle_list_event(&self.scene, &event, &self.pointer, self.now);
        }
    }

    fn release(&mut self) {
        let Some(item) = self.pressed_item.take() else {
            return;
        };
        let Some(cell) = self.scene.item(item).copied() else {
            return;
        };
        let node = cell.on_pointer_up(item).node();

        let event = self
            .lists
            .owner_of(&self.scene, node)
            .and_then(|owner| self.lists.get(owner))
            .and_then(|list| list.on_item_released(&self.scene, node));
        if let Some(event) = event {
            self.manager
                .handle_list_event(&self.scene, &event, &self.pointer, self.now);
        }
    }

    fn scroll(&mut self, position: Vec2, delta: Vec2) {
        let scroll_view = self
            .lists
            .iter()
            .filter(|list| {
                self.scene
                    .world_rect(list.node())
                    .is_some_and(|rect| rect.contains(position))
            })
            .find_map(SortableList::scroll_view);
        if let Some(scroll_view) = scroll_view {
            if self.scene.scroll_by(scroll_view, delta) {
                self.scene.layout(self.viewport);
            }
        }
    }
}
