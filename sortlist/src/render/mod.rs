//! Draws the laid-out scene into a [`Buffer`].
//!
//! Rects are snapped to whole cells (origin floored, size rounded). Nodes
//! are painted in tree order, so later siblings and later roots land on
//! top; that is how a dragged item floating on its canvas covers the
//! lists underneath. Scroll views clip their content to their own rect.

use crate::buffer::{Buffer, CellRect};
use crate::layout::Rect;
use crate::scene::{Node, NodeId, Scene, ScrollView};
use crate::text::truncate_to_width;
use crate::types::{Border, Rgb};

/// Cell-snapped rect that may lie partly off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapped {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Snapped {
    fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x.floor() as i32,
            y: rect.y.floor() as i32,
            width: rect.width.round() as i32,
            height: rect.height.round() as i32,
        }
    }

    fn right(&self) -> i32 {
        self.x + self.width
    }

    fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// The visible part of the rect within `clip`.
    fn clip(&self, clip: CellRect) -> Option<CellRect> {
        let x0 = self.x.max(clip.x as i32);
        let y0 = self.y.max(clip.y as i32);
        let x1 = self.right().min(clip.right() as i32);
        let y1 = self.bottom().min(clip.bottom() as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CellRect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

/// Render every active node of `scene` using its last layout.
pub fn render_to_buffer(scene: &Scene, buf: &mut Buffer) {
    let clip = buf.area();
    let mut drawn = 0;
    for &root in scene.roots() {
        render_node(scene, root, buf, clip, &mut drawn);
    }
    log::trace!("[render] {drawn} nodes drawn");
}

fn render_node(scene: &Scene, id: NodeId, buf: &mut Buffer, clip: CellRect, drawn: &mut usize) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if !node.active {
        return;
    }
    let Some(rect) = scene.world_rect(id) else {
        return;
    };
    let snapped = Snapped::from_rect(rect);
    let visible = snapped.clip(clip);

    if let Some(visible) = visible {
        if let Some(bg) = node.style.background {
            buf.fill(visible, bg);
        }
        render_border(node, snapped, buf, clip);
        render_label(node, snapped, buf, clip);
        *drawn += 1;
    }

    let child_clip = match (&node.scroll_view, visible) {
        (Some(_), Some(visible)) => visible,
        (Some(_), None) => return,
        (None, _) => clip,
    };
    for &child in node.children() {
        render_node(scene, child, buf, child_clip, drawn);
    }

    if let Some(scroll) = &node.scroll_view {
        render_scroll_indicator(scene, node, scroll, snapped, buf, clip);
    }
}

fn put(buf: &mut Buffer, x: i32, y: i32, symbol: char, node: &Node, clip: CellRect) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    let fg = node.style.foreground.unwrap_or(Rgb::WHITE);
    buf.put(x, y, symbol, fg, node.style.text_style, clip);
}

fn render_border(node: &Node, rect: Snapped, buf: &mut Buffer, clip: CellRect) {
    let (tl, tr, bl, br, h, v) = match node.style.border {
        Border::None => return,
        Border::Single => ('┌', '┐', '└', '┘', '─', '│'),
        Border::Double => ('╔', '╗', '╚', '╝', '═', '║'),
        Border::Rounded => ('╭', '╮', '╰', '╯', '─', '│'),
        Border::Thick => ('┏', '┓', '┗', '┛', '━', '┃'),
    };
    if rect.width < 2 || rect.height < 2 {
        return;
    }

    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

    put(buf, left, top, tl, node, clip);
    put(buf, right, top, tr, node, clip);
    put(buf, left, bottom, bl, node, clip);
    put(buf, right, bottom, br, node, clip);
    for x in (left + 1)..right {
        put(buf, x, top, h, node, clip);
        put(buf, x, bottom, h, node, clip);
    }
    for y in (top + 1)..bottom {
        put(buf, left, y, v, node, clip);
        put(buf, right, y, v, node, clip);
    }
}

fn render_label(node: &Node, rect: Snapped, buf: &mut Buffer, clip: CellRect) {
    let Some(label) = &node.label else {
        return;
    };
    let inset = if node.style.border == Border::None { 0 } else { 1 };
    let inner_width = rect.width - 2 * inset;
    let inner_height = rect.height - 2 * inset;
    if inner_width <= 0 || inner_height <= 0 {
        return;
    }

    let text = truncate_to_width(label, inner_width as usize);
    let x = rect.x + inset;
    let y = rect.y + inset + (inner_height - 1) / 2;
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    let fg = node.style.foreground.unwrap_or(Rgb::WHITE);
    buf.put_str(x, y, &text, fg, node.style.text_style, clip);
}

/// Thumb along the right (vertical) or bottom (horizontal) edge when the
/// content overflows the view.
fn render_scroll_indicator(
    scene: &Scene,
    node: &Node,
    scroll: &ScrollView,
    rect: Snapped,
    buf: &mut Buffer,
    clip: CellRect,
) {
    let Some(content) = scene.world_rect(scroll.content) else {
        return;
    };
    let inset = if node.style.border == Border::None { 0 } else { 1 };

    let track_len = rect.height - 2 * inset;
    let overflow = content.height - rect.height as f32;
    if overflow > 0.0 && track_len >= 2 {
        let (thumb_pos, thumb_len) = thumb(track_len, content.height, overflow, scroll.offset.y);
        let x = rect.right() - 1 - inset;
        for i in 0..track_len {
            let symbol = if (thumb_pos..thumb_pos + thumb_len).contains(&i) { '┃' } else { '│' };
            put(buf, x, rect.y + inset + i, symbol, node, clip);
        }
    }

    let track_len = rect.width - 2 * inset;
    let overflow = content.width - rect.width as f32;
    if overflow > 0.0 && track_len >= 2 {
        let (thumb_pos, thumb_len) = thumb(track_len, content.width, overflow, scroll.offset.x);
        let y = rect.bottom() - 1 - inset;
        for i in 0..track_len {
            let symbol = if (thumb_pos..thumb_pos + thumb_len).contains(&i) { '━' } else { '─' };
            put(buf, rect.x + inset + i, y, symbol, node, clip);
        }
    }
}

fn thumb(track_len: i32, content_len: f32, overflow: f32, offset: f32) -> (i32, i32) {
    let visible = content_len - overflow;
    let len = ((visible / content_len) * track_len as f32).round().max(1.0) as i32;
    let len = len.min(track_len);
    let pos = ((offset / overflow) * (track_len - len) as f32).round() as i32;
    (pos.clamp(0, track_len - len), len)
}
