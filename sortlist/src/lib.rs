//! Drag-and-reorder for list widgets in a retained layout tree.
//!
//! Items live in [`SortableList`]s inside a [`Scene`]. The [`DragManager`]
//! turns a press held still past a delay into a drag, tracks which list and
//! index the pointer points at, previews the drop with a placeholder and
//! moves the item on release. [`Board`] drives all of it one frame at a
//! time.

pub mod board;
pub mod buffer;
pub mod config;
pub mod error;
pub mod event;
pub mod hit;
pub mod item;
pub mod layout;
pub mod list;
pub mod manager;
pub mod render;
pub mod scene;
pub mod terminal;
pub mod text;
pub mod types;

pub use board::{Board, FrameInput};
pub use buffer::Buffer;
pub use config::{DragConfig, ItemCacheKey, ListConfig};
pub use error::ListError;
pub use event::{ListEvent, MouseButton, PointerEvent, PointerState};
pub use hit::{hit_test_any, hit_test_item};
pub use item::{ItemSignal, ListItem, SizeContract};
pub use layout::{LayoutResult, Rect};
pub use list::{InitState, ListId, ListSet, SortableList};
pub use manager::{DragManager, GestureState, Registration};
pub use render::render_to_buffer;
pub use scene::{LayoutGroup, Node, NodeId, RectTransform, Scene, ScrollView};
pub use terminal::Terminal;
pub use types::*;
