use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEventKind};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use sortlist::{
    Board, Border, DragConfig, FrameInput, GestureState, ListConfig, ListId, ListItem, NodeId,
    Orientation, Rect, RectTransform, Rgb, SortableList, Style, Terminal, Vec2,
};

const FRAME: Duration = Duration::from_millis(16);

/// A list panel placed on the canvas.
struct Panel {
    name: &'static str,
    list: ListId,
}

fn main() -> io::Result<()> {
    // The terminal is in raw mode, so logs go to a file
    let log_file = File::create("sortlist-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file).map_err(io::Error::other)?;

    let mut term = Terminal::new()?;
    let mut board = Board::new(term.viewport(), DragConfig::default());
    let canvas = board.scene.create_canvas("canvas");
    let panels = build_panels(&mut board, canvas);
    let status = create_status_line(&mut board, canvas);

    let clock = Instant::now();
    loop {
        let mut input = FrameInput::at(clock.elapsed());
        for event in term.poll(FRAME)? {
            match event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Esc if !board.manager.state().is_idle() => board.cancel_drag(),
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Char('o') => flip(&mut board, panels[1].list),
                    _ => {}
                },
                CrosstermEvent::Mouse(mouse) => input.events.push(mouse.into()),
                CrosstermEvent::Resize(width, height) => {
                    board.resize(Rect::from_size(width as f32, height as f32));
                }
                _ => {}
            }
        }

        if let Err(err) = board.frame(&input) {
            log::error!("[demo] {err}");
            return Err(io::Error::other(err));
        }

        let text = status_text(&board, &panels);
        if let Some(node) = board.scene.node_mut(status) {
            node.label = Some(text);
        }
        if term.draw(&board.scene)? {
            board.resize(term.viewport());
        }
    }
}

fn build_panels(board: &mut Board, canvas: NodeId) -> Vec<Panel> {
    let todo = Style::new().background(Rgb::new(40, 44, 64)).border(Border::Rounded);
    let done = Style::new().background(Rgb::new(36, 58, 44)).border(Border::Rounded);
    let tags = Style::new().background(Rgb::new(64, 44, 40)).border(Border::Rounded);

    vec![
        Panel {
            name: "todo",
            list: add_list(
                board,
                canvas,
                "todo",
                anchored(Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.7)),
                Orientation::Vertical,
                &["write parser", "fix layout", "review PR", "update docs", "release"],
                todo,
            ),
        },
        Panel {
            name: "done",
            list: add_list(
                board,
                canvas,
                "done",
                anchored(Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.7)),
                Orientation::Vertical,
                &["set up CI", "pick a name"],
                done,
            ),
        },
        Panel {
            name: "tags",
            list: add_list(
                board,
                canvas,
                "tags",
                anchored(Vec2::new(0.0, 0.7), Vec2::new(1.0, 1.0)),
                Orientation::Horizontal,
                &["bug", "feature", "chore", "urgent"],
                tags,
            ),
        },
    ]
}

/// Panel filling an anchor range of the canvas, with a one-cell gutter and
/// room for the status line at the bottom.
fn anchored(min: Vec2, max: Vec2) -> RectTransform {
    let bottom_gutter = if max.y >= 1.0 { -2.0 } else { -1.0 };
    RectTransform {
        anchor_min: min,
        anchor_max: max,
        position: Vec2::new(1.0, 1.0),
        size_delta: Vec2::new(-2.0, bottom_gutter),
    }
}

fn add_list(
    board: &mut Board,
    canvas: NodeId,
    name: &str,
    transform: RectTransform,
    orientation: Orientation,
    labels: &[&str],
    item_style: Style,
) -> ListId {
    let scene = &mut board.scene;
    let panel = scene.create_child(canvas, name);
    let view = scene.create_child(panel, format!("{name}-view"));
    if let Some(node) = scene.node_mut(panel) {
        node.transform = transform;
        node.style = Style::new().border(Border::Single).foreground(Rgb::new(128, 128, 128));
    }
    if let Some(node) = scene.node_mut(view) {
        node.transform = RectTransform {
            position: Vec2::new(1.0, 1.0),
            size_delta: Vec2::new(-2.0, -2.0),
            ..RectTransform::stretch()
        };
    }

    let content = scene.add_scroll_view(view);
    let item = match orientation {
        Orientation::Vertical => ListItem::sized(0.0, 3.0),
        Orientation::Horizontal => ListItem::sized(14.0, 0.0),
    };
    if let Some(content) = content {
        for label in labels {
            let id = scene.create_item(content, *label, item);
            if let Some(node) = scene.node_mut(id) {
                node.style = item_style;
            }
        }
    }

    let config = ListConfig::new()
        .orientation(orientation)
        .scroll_view(view)
        .default_size(14.0, 3.0);
    board.add_list(SortableList::new(panel, config))
}

fn create_status_line(board: &mut Board, canvas: NodeId) -> NodeId {
    let status = board.scene.create_child(canvas, "status");
    if let Some(node) = board.scene.node_mut(status) {
        node.transform = RectTransform {
            anchor_min: Vec2::new(0.0, 1.0),
            anchor_max: Vec2::new(1.0, 1.0),
            position: Vec2::new(1.0, -1.0),
            size_delta: Vec2::new(-2.0, 1.0),
        };
        node.style = Style::new().foreground(Rgb::new(160, 160, 160)).dim();
    }
    status
}

fn flip(board: &mut Board, list: ListId) {
    if let Some(list) = board.list_mut(list) {
        let next = list.orientation().opposite();
        log::info!("[demo] switching {} to {next:?}", list.id());
        list.set_orientation(next);
    }
}

fn status_text(board: &Board, panels: &[Panel]) -> String {
    let label = |item: NodeId| {
        board
            .scene
            .node(item)
            .and_then(|n| n.label.clone())
            .unwrap_or_default()
    };
    let name = |list: ListId| {
        panels
            .iter()
            .find(|p| p.list == list)
            .map(|p| p.name)
            .unwrap_or("?")
    };

    match board.manager.state() {
        GestureState::Idle => {
            "hold an item still to pick it up · wheel scrolls · o flips 'done' · esc/q quits".into()
        }
        GestureState::Prepping(press) => format!("holding '{}'", label(press.item)),
        GestureState::Dragging(drag) => match (drag.target, drag.target_index) {
            (Some(list), Some(index)) => {
                format!("dragging '{}' into {} at {index}", label(drag.press.item), name(list))
            }
            _ => format!(
                "dragging '{}', release to return it to {}",
                label(drag.press.item),
                name(drag.press.source)
            ),
        },
    }
}
