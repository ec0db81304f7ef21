//! Gesture state carried by the drag manager.

use std::time::Duration;

use crate::layout::Rect;
use crate::list::ListId;
use crate::scene::{NodeId, RectTransform};
use crate::types::Vec2;

/// A press that may turn into a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub source: ListId,
    pub item: NodeId,
    /// Item index within the source list when it was pressed.
    pub source_index: usize,
    pub pressed_at: Duration,
    pub position: Vec2,
    /// Pointer position relative to the item's top-left corner.
    pub grab_offset: Vec2,
}

/// An item lifted out of its list and following the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub press: Press,
    pub canvas: NodeId,
    /// Transform the item had before it was lifted, restored on drop.
    pub original_transform: RectTransform,
    /// List under the pointer, if any.
    pub target: Option<ListId>,
    /// Insertion index within `target` computed on the last tick.
    pub target_index: Option<usize>,
    /// Rects of the target's items, captured when the target was entered.
    pub cached_rects: Vec<Rect>,
    /// List currently holding the placeholder.
    pub placeholder_host: Option<ListId>,
}

impl Drag {
    pub fn new(press: Press, canvas: NodeId, original_transform: RectTransform) -> Self {
        Self {
            press,
            canvas,
            original_transform,
            target: None,
            target_index: None,
            cached_rects: Vec::new(),
            placeholder_host: None,
        }
    }

    /// Where the item will land if released now.
    pub fn drop_location(&self) -> (ListId, usize) {
        match (self.target, self.target_index) {
            (Some(list), Some(index)) => (list, index),
            _ => (self.press.source, self.press.source_index),
        }
    }
}

/// Idle → Prepping → Dragging → Idle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Prepping(Press),
    Dragging(Drag),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn is_prepping(&self) -> bool {
        matches!(self, GestureState::Prepping(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }

    pub fn press(&self) -> Option<&Press> {
        match self {
            GestureState::Idle => None,
            GestureState::Prepping(press) => Some(press),
            GestureState::Dragging(drag) => Some(&drag.press),
        }
    }

    pub fn drag(&self) -> Option<&Drag> {
        match self {
            GestureState::Dragging(drag) => Some(drag),
            _ => None,
        }
    }
}

/// Index of the first rect containing `point`; one past the end when none do.
pub fn insertion_index(rects: &[Rect], point: Vec2) -> usize {
    rects
        .iter()
        .position(|r| r.contains(point))
        .unwrap_or(rects.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(count: usize, height: f32) -> Vec<Rect> {
        (0..count)
            .map(|i| Rect::new(0.0, i as f32 * height, 20.0, height))
            .collect()
    }

    #[test]
    fn test_insertion_index_first_containing_rect() {
        let rects = column(3, 10.0);
        assert_eq!(insertion_index(&rects, Vec2::new(5.0, 0.0)), 0);
        assert_eq!(insertion_index(&rects, Vec2::new(5.0, 15.0)), 1);
        assert_eq!(insertion_index(&rects, Vec2::new(5.0, 29.0)), 2);
    }

    #[test]
    fn test_insertion_index_defaults_to_append() {
        let rects = column(3, 10.0);
        assert_eq!(insertion_index(&rects, Vec2::new(5.0, 30.0)), 3);
        assert_eq!(insertion_index(&rects, Vec2::new(25.0, 5.0)), 3);
        assert_eq!(insertion_index(&[], Vec2::ZERO), 0);
    }

    #[test]
    fn test_insertion_index_overlap_prefers_earlier() {
        let rects = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 5.0, 10.0, 10.0)];
        assert_eq!(insertion_index(&rects, Vec2::new(1.0, 7.0)), 0);
    }
}
