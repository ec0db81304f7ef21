use crate::error::ListError;
use crate::manager::DragManager;
use crate::scene::{NodeId, Scene};

use super::{ListId, SortableList};

/// Owner of every sortable list, kept in insertion order.
#[derive(Debug, Default)]
pub struct ListSet {
    lists: Vec<SortableList>,
}

impl ListSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, list: SortableList) -> ListId {
        let id = list.id();
        self.lists.push(list);
        id
    }

    pub fn get(&self, id: ListId) -> Option<&SortableList> {
        self.lists.iter().find(|l| l.id() == id)
    }

    pub fn get_mut(&mut self, id: ListId) -> Option<&mut SortableList> {
        self.lists.iter_mut().find(|l| l.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortableList> {
        self.lists.iter()
    }

    /// The list whose content directly holds `item`.
    pub fn owner_of(&self, scene: &Scene, item: NodeId) -> Option<ListId> {
        self.lists
            .iter()
            .find(|l| l.owns(scene, item))
            .map(SortableList::id)
    }

    /// Run one initialization tick on every list. Every list is updated
    /// even if one fails; the first configuration error is returned.
    pub fn update_all(
        &mut self,
        scene: &mut Scene,
        manager: &mut DragManager,
    ) -> Result<(), ListError> {
        let mut first_error = None;
        for list in &mut self.lists {
            if let Err(err) = list.update(scene, manager) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Destroy a list. A gesture that involves it is cancelled first, so the
    /// placeholder is parked outside the list before its node goes away.
    /// A dragged item returns to its source list; when that is the list
    /// being removed, the item is destroyed with it.
    pub fn remove(&mut self, id: ListId, scene: &mut Scene, manager: &mut DragManager) -> bool {
        if manager.involves(id) {
            manager.cancel(scene, self);
        }
        let Some(pos) = self.lists.iter().position(|l| l.id() == id) else {
            return false;
        };
        let list = self.lists.remove(pos);
        list.destroy(scene, Some(manager));
        true
    }
}
