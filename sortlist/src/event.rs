use crate::scene::NodeId;
use crate::types::Vec2;

/// Raw pointer input delivered by the host for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed
    Down { position: Vec2, button: MouseButton },
    /// Button released
    Up { position: Vec2, button: MouseButton },
    /// Pointer moved, with or without a button held
    Move { position: Vec2 },
    /// Wheel scroll at a position
    Scroll { position: Vec2, delta: Vec2 },
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        PointerEvent::Down {
            position: Vec2::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        PointerEvent::Up {
            position: Vec2::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        PointerEvent::Move {
            position: Vec2::new(x, y),
        }
    }
}

// Conversion from crossterm types, using cell coordinates as positions
impl From<crossterm::event::MouseEvent> for PointerEvent {
    fn from(event: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind;

        let position = Vec2::new(event.column as f32, event.row as f32);
        match event.kind {
            MouseEventKind::Down(button) => PointerEvent::Down {
                position,
                button: button.into(),
            },
            MouseEventKind::Up(button) => PointerEvent::Up {
                position,
                button: button.into(),
            },
            MouseEventKind::Drag(_) | MouseEventKind::Moved => PointerEvent::Move { position },
            MouseEventKind::ScrollDown => PointerEvent::Scroll {
                position,
                delta: Vec2::new(0.0, 1.0),
            },
            MouseEventKind::ScrollUp => PointerEvent::Scroll {
                position,
                delta: Vec2::new(0.0, -1.0),
            },
            MouseEventKind::ScrollRight => PointerEvent::Scroll {
                position,
                delta: Vec2::new(1.0, 0.0),
            },
            MouseEventKind::ScrollLeft => PointerEvent::Scroll {
                position,
                delta: Vec2::new(-1.0, 0.0),
            },
        }
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(btn: crossterm::event::MouseButton) -> Self {
        use crossterm::event::MouseButton as CtBtn;
        match btn {
            CtBtn::Left => MouseButton::Left,
            CtBtn::Right => MouseButton::Right,
            CtBtn::Middle => MouseButton::Middle,
        }
    }
}

/// Queryable pointer state: where the pointer is and whether the primary
/// button is held.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Vec2,
    pub primary_held: bool,
    /// Primary button went up during the current frame.
    pub primary_released: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn held(mut self, held: bool) -> Self {
        self.primary_held = held;
        self
    }

    /// Clear the per-frame release edge.
    pub fn begin_frame(&mut self) {
        self.primary_released = false;
    }

    /// Fold an input event into the state.
    pub fn apply(&mut self, event: &PointerEvent) {
        self.position = event.position();
        match event {
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => self.primary_held = true,
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => {
                self.primary_held = false;
                self.primary_released = true;
            }
            _ => {}
        }
    }
}

/// List-scoped notification forwarded from an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    ItemPressed { list: crate::list::ListId, item: NodeId },
    ItemReleased { list: crate::list::ListId, item: NodeId },
}

impl ListEvent {
    pub fn list(&self) -> crate::list::ListId {
        match self {
            ListEvent::ItemPressed { list, .. } | ListEvent::ItemReleased { list, .. } => *list,
        }
    }

    pub fn item(&self) -> NodeId {
        match self {
            ListEvent::ItemPressed { item, .. } | ListEvent::ItemReleased { item, .. } => *item,
        }
    }
}
