use std::time::Duration;

use sortlist::{
    Board, DragConfig, FrameInput, GestureState, ListConfig, ListId, ListItem, NodeId,
    Orientation, Rect, RectTransform, SortableList,
};

// Two vertical lists of 2-row items: L1 spans x 0..10, L2 spans x 20..30.
fn board() -> Board {
    board_with(DragConfig::default())
}

fn board_with(config: DragConfig) -> Board {
    Board::new(Rect::from_size(40.0, 30.0), config)
}

fn canvas(board: &mut Board) -> NodeId {
    board.scene.create_canvas("canvas")
}

fn add_list(
    board: &mut Board,
    canvas: NodeId,
    rect: RectTransform,
    orientation: Orientation,
    labels: &[&str],
) -> (ListId, Vec<NodeId>) {
    let panel = board.scene.create_child(canvas, "panel");
    board.scene.node_mut(panel).unwrap().transform = rect;
    let content = board.scene.add_scroll_view(panel).unwrap();
    let size = match orientation {
        Orientation::Vertical => ListItem::sized(0.0, 2.0),
        Orientation::Horizontal => ListItem::sized(5.0, 0.0),
    };
    let items = labels
        .iter()
        .map(|label| board.scene.create_item(content, *label, size))
        .collect();
    let config = ListConfig::new().orientation(orientation).scroll_view(panel);
    (board.add_list(SortableList::new(panel, config)), items)
}

fn column(board: &mut Board, canvas: NodeId, x: f32, labels: &[&str]) -> (ListId, Vec<NodeId>) {
    add_list(
        board,
        canvas,
        RectTransform::fixed(x, 0.0, 10.0, 20.0),
        Orientation::Vertical,
        labels,
    )
}

fn frame(board: &mut Board, input: FrameInput) {
    board.frame(&input).unwrap();
}

/// Press at (x, y) at t=10ms and hold still until the drag starts at t=300ms.
fn lift(board: &mut Board, x: f32, y: f32) {
    frame(board, FrameInput::millis(10).down(x, y));
    assert!(board.manager.is_prepping());
    frame(board, FrameInput::millis(300));
    assert!(board.manager.is_dragging());
}

// ============================================================================
// Gesture Start Tests
// ============================================================================

#[test]
fn test_press_enters_prepping() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    frame(&mut board, FrameInput::millis(0));

    frame(&mut board, FrameInput::millis(10).down(5.0, 3.0));

    match board.manager.state() {
        GestureState::Prepping(press) => {
            assert_eq!(press.source, l1);
            assert_eq!(press.item, items[1]);
            assert_eq!(press.source_index, 1);
            assert_eq!(press.pressed_at, Duration::from_millis(10));
        }
        other => panic!("expected prepping, got {other:?}"),
    }
}

#[test]
fn test_release_before_delay_never_detaches() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    frame(&mut board, FrameInput::millis(0));
    let content = board.list(l1).unwrap().content(&board.scene).unwrap();

    frame(&mut board, FrameInput::millis(10).down(5.0, 3.0));
    frame(&mut board, FrameInput::millis(100).up(5.0, 3.0));
    assert!(board.manager.state().is_idle());

    // Well past the delay: nothing happens any more
    frame(&mut board, FrameInput::millis(600));

    assert!(board.manager.state().is_idle());
    assert_eq!(board.scene.parent(items[1]), Some(content));
    assert_eq!(board.items(l1), items);
    assert!(!board.manager.scroll_lock());
}

#[test]
fn test_delay_must_be_exceeded() {
    let mut board = board();
    let canvas = canvas(&mut board);
    column(&mut board, canvas, 0.0, &["a", "b"]);
    frame(&mut board, FrameInput::millis(0));

    frame(&mut board, FrameInput::millis(10).down(5.0, 1.0));
    frame(&mut board, FrameInput::millis(260));
    assert!(board.manager.is_prepping(), "exactly the delay is not enough");

    frame(&mut board, FrameInput::millis(261));
    assert!(board.manager.is_dragging());
}

#[test]
fn test_hold_gate_requires_exact_position() {
    let mut board = board();
    let canvas = canvas(&mut board);
    column(&mut board, canvas, 0.0, &["a", "b"]);
    frame(&mut board, FrameInput::millis(0));

    frame(&mut board, FrameInput::millis(10).down(5.0, 1.0));
    frame(&mut board, FrameInput::millis(100).moved(6.0, 1.0));
    frame(&mut board, FrameInput::millis(400));
    assert!(board.manager.is_prepping(), "one cell of movement blocks the drag");

    // Coming back to the press position lets it start
    frame(&mut board, FrameInput::millis(416).moved(5.0, 1.0));
    assert!(board.manager.is_dragging());
}

#[test]
fn test_hold_tolerance_allows_small_movement() {
    let mut board = board_with(DragConfig::new().hold_tolerance(1.5));
    let canvas = canvas(&mut board);
    column(&mut board, canvas, 0.0, &["a", "b"]);
    frame(&mut board, FrameInput::millis(0));

    frame(&mut board, FrameInput::millis(10).down(5.0, 1.0));
    frame(&mut board, FrameInput::millis(300).moved(6.0, 1.0));

    assert!(board.manager.is_dragging());
}

#[test]
fn test_custom_dragging_delay() {
    let mut board = board_with(DragConfig::new().dragging_delay(Duration::from_millis(50)));
    let canvas = canvas(&mut board);
    column(&mut board, canvas, 0.0, &["a"]);
    frame(&mut board, FrameInput::millis(0));

    frame(&mut board, FrameInput::millis(10).down(5.0, 1.0));
    frame(&mut board, FrameInput::millis(61));

    assert!(board.manager.is_dragging());
}

#[test]
fn test_lift_moves_item_to_canvas_and_locks_scrolling() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);

    assert_eq!(board.scene.parent(items[1]), Some(canvas));
    assert_eq!(board.items(l1), vec![items[0], items[2]]);
    assert_eq!(board.list(l1).unwrap().content_extent(&board.scene), 4.0);
    assert!(board.manager.scroll_lock());
    for id in [l1, l2] {
        let list = board.list(id).unwrap();
        assert!(list.scroll_lock());
        let scroll = board.scene.node(list.node()).unwrap().scroll_view.unwrap();
        assert!(!scroll.horizontal && !scroll.vertical);
    }
}

#[test]
fn test_dragged_item_follows_pointer_with_grab_offset() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (_, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    frame(&mut board, FrameInput::millis(0));

    // Grabbed 5 cells from the left and 1 row from the top of "b"
    lift(&mut board, 5.0, 3.0);
    assert_eq!(board.scene.world_rect(items[1]), Some(Rect::new(0.0, 2.0, 10.0, 2.0)));

    frame(&mut board, FrameInput::millis(316).moved(25.0, 10.0));

    assert_eq!(board.scene.world_rect(items[1]), Some(Rect::new(20.0, 9.0, 10.0, 2.0)));
}

// ============================================================================
// Drop Tests
// ============================================================================

#[test]
fn test_round_trip_keeps_original_index() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316));
    assert_eq!(board.manager.target(), Some(l1));
    assert_eq!(board.manager.target_index(), Some(1));

    frame(&mut board, FrameInput::millis(332).up(5.0, 3.0));

    assert!(board.manager.state().is_idle());
    assert_eq!(board.items(l1), items);
    assert_eq!(board.labels(l1), ["a", "b", "c"]);
}

#[test]
fn test_release_right_after_lift_restores_source_index() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    frame(&mut board, FrameInput::millis(0));

    // The item is on the canvas by now, so no list forwards this release
    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(300).up(5.0, 3.0));

    assert!(board.manager.state().is_idle());
    assert_eq!(board.items(l1), items);
}

#[test]
fn test_drag_to_other_list_at_front() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    assert_eq!(board.manager.target(), Some(l2));
    assert_eq!(board.manager.target_index(), Some(0));

    frame(&mut board, FrameInput::millis(332).up(25.0, 1.0));

    assert_eq!(board.labels(l2), ["b", "x", "y"]);
    assert_eq!(board.labels(l1), ["a", "c"]);
    assert!(!board.manager.scroll_lock());
}

#[test]
fn test_drop_below_last_item_appends() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 1.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 15.0));
    assert_eq!(board.manager.target_index(), Some(2));
    frame(&mut board, FrameInput::millis(332).up(25.0, 15.0));

    assert_eq!(board.labels(l2), ["x", "y", "a"]);
    assert_eq!(board.labels(l1), ["b"]);
}

#[test]
fn test_no_target_release_returns_to_source() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, others) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    // Pass over L2, then leave every list
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    frame(&mut board, FrameInput::millis(332).moved(35.0, 25.0));
    assert_eq!(board.manager.target(), None);
    assert_eq!(board.items(l2), others, "placeholder withdrawn");

    frame(&mut board, FrameInput::millis(348).up(35.0, 25.0));

    assert_eq!(board.items(l1), items);
    assert_eq!(board.items(l2), others);
}

#[test]
fn test_cancel_returns_item_to_source() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, others) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    board.cancel_drag();

    assert!(board.manager.state().is_idle());
    assert!(!board.manager.scroll_lock());
    assert_eq!(board.items(l1), items);
    assert_eq!(board.items(l2), others);
}

#[test]
fn test_drop_into_horizontal_list() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b"]);
    let (row, _) = add_list(
        &mut board,
        canvas,
        RectTransform::fixed(0.0, 22.0, 30.0, 4.0),
        Orientation::Horizontal,
        &["p", "q"],
    );
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 1.0);
    frame(&mut board, FrameInput::millis(316).moved(6.0, 23.0));
    assert_eq!(board.manager.target(), Some(row));
    assert_eq!(board.manager.target_index(), Some(1));
    frame(&mut board, FrameInput::millis(332).up(6.0, 23.0));

    assert_eq!(board.labels(row), ["p", "a", "q"]);
    assert_eq!(board.labels(l1), ["b"]);
}

// ============================================================================
// Placeholder Tests
// ============================================================================

#[test]
fn test_placeholder_previews_drop_position() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (_, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, others) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));
    let placeholder = board.manager.placeholder();

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 3.0));

    assert_eq!(board.items(l2), vec![others[0], placeholder, others[1]]);
    assert!(board.scene.node(placeholder).unwrap().active);
    let size = board.scene.item(placeholder).copied().unwrap();
    assert_eq!(size, board.scene.item(items[1]).copied().unwrap());
    assert_eq!(board.list(l2).unwrap().content_extent(&board.scene), 6.0);

    frame(&mut board, FrameInput::millis(332).up(25.0, 3.0));

    assert_eq!(board.items(l2), vec![others[0], items[1], others[1]]);
    let parked = board.scene.node(placeholder).unwrap();
    assert!(!parked.active);
    assert_eq!(parked.parent(), Some(board.manager.root()));
}

#[test]
fn test_placeholder_follows_target_between_lists() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, others) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));
    let placeholder = board.manager.placeholder();

    lift(&mut board, 5.0, 1.0);
    frame(&mut board, FrameInput::millis(316));
    assert_eq!(board.items(l1).first(), Some(&placeholder));

    // Same index in the other list still moves the placeholder
    frame(&mut board, FrameInput::millis(332).moved(25.0, 1.0));

    assert!(!board.items(l1).contains(&placeholder));
    assert_eq!(board.items(l2), vec![placeholder, others[0], others[1]]);
}

// ============================================================================
// Target Selection Tests
// ============================================================================

#[test]
fn test_overlapping_lists_prefer_first_registered() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b"]);
    let (l2, _) = add_list(
        &mut board,
        canvas,
        RectTransform::fixed(5.0, 10.0, 10.0, 10.0),
        Orientation::Vertical,
        &["x"],
    );
    frame(&mut board, FrameInput::millis(0));
    assert_eq!(board.manager.registered(), &[l1, l2]);

    lift(&mut board, 2.0, 1.0);
    frame(&mut board, FrameInput::millis(316).moved(7.0, 12.0));

    assert_eq!(board.manager.target(), Some(l1));
}

#[test]
fn test_presses_during_a_drag_are_ignored() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (_, items) = column(&mut board, canvas, 0.0, &["a", "b"]);
    let (_, others) = column(&mut board, canvas, 20.0, &["x"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 1.0);
    frame(&mut board, FrameInput::millis(316).down(25.0, 1.0));

    assert_eq!(board.manager.dragged_item(), Some(items[0]));
    assert_ne!(board.manager.dragged_item(), Some(others[0]));
}

// ============================================================================
// Hidden Children Tests
// ============================================================================

/// Put an inactive item and a zero-sized non-item node in front of a list's
/// items. Neither counts as an item.
fn hide_front(board: &mut Board, list: ListId) -> (NodeId, NodeId) {
    let content = board.list(list).unwrap().content(&board.scene).unwrap();
    let hidden = board.scene.create_item(content, "hidden", ListItem::sized(0.0, 2.0));
    board.scene.set_active(hidden, false);
    board.scene.set_sibling_index(hidden, 0);
    let decoration = board.scene.create_child(content, "decoration");
    board.scene.set_sibling_index(decoration, 1);
    (hidden, decoration)
}

#[test]
fn test_round_trip_with_hidden_children() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b"]);
    let (hidden, decoration) = hide_front(&mut board, l1);
    frame(&mut board, FrameInput::millis(0));
    let content = board.list(l1).unwrap().content(&board.scene).unwrap();

    frame(&mut board, FrameInput::millis(10).down(5.0, 3.0));
    assert_eq!(board.manager.state().press().map(|p| p.source_index), Some(1));
    frame(&mut board, FrameInput::millis(300));
    frame(&mut board, FrameInput::millis(316));
    frame(&mut board, FrameInput::millis(332).up(5.0, 3.0));

    assert_eq!(board.labels(l1), ["a", "b"]);
    assert_eq!(
        board.scene.children(content),
        &[hidden, decoration, items[0], items[1]]
    );
}

#[test]
fn test_drop_index_ignores_hidden_children() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x", "y"]);
    hide_front(&mut board, l2);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 1.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 3.0));
    assert_eq!(board.manager.target_index(), Some(1));
    frame(&mut board, FrameInput::millis(332).up(25.0, 3.0));

    assert_eq!(board.labels(l2), ["x", "a", "y"]);
    assert!(board.labels(l1).is_empty());
}

#[test]
fn test_no_target_release_with_hidden_children() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, _) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    hide_front(&mut board, l1);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(35.0, 25.0));
    frame(&mut board, FrameInput::millis(332).up(35.0, 25.0));

    assert_eq!(board.labels(l1), ["a", "b", "c"]);
}

// ============================================================================
// Teardown Tests
// ============================================================================

#[test]
fn test_removing_target_list_mid_drag_cancels() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x", "y"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    assert!(board.remove_list(l2));

    assert!(board.manager.state().is_idle());
    assert_eq!(board.manager.registered(), &[l1]);
    assert_eq!(board.items(l1), items);
    let placeholder = board.manager.placeholder();
    assert!(board.scene.contains(placeholder), "placeholder survives the list");
}

#[test]
fn test_unregistering_target_clears_it() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, _) = column(&mut board, canvas, 20.0, &["x"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    assert_eq!(board.manager.target(), Some(l2));

    let registration = board.manager.register(l2);
    assert!(board.manager.unregister(registration));
    assert_eq!(board.manager.target(), None);

    frame(&mut board, FrameInput::millis(332).up(25.0, 1.0));
    assert_eq!(board.items(l1), items);
}

#[test]
fn test_removing_source_list_mid_drag_destroys_its_item() {
    let mut board = board();
    let canvas = canvas(&mut board);
    let (l1, items) = column(&mut board, canvas, 0.0, &["a", "b", "c"]);
    let (l2, others) = column(&mut board, canvas, 20.0, &["x"]);
    frame(&mut board, FrameInput::millis(0));

    lift(&mut board, 5.0, 3.0);
    frame(&mut board, FrameInput::millis(316).moved(25.0, 1.0));
    assert!(board.remove_list(l1));

    // The item went back to its list and was destroyed with it
    assert!(!board.scene.contains(items[1]));
    assert!(board.manager.state().is_idle());
    assert!(!board.manager.scroll_lock());
    assert_eq!(board.manager.registered(), &[l2]);
    assert_eq!(board.items(l2), others);
    assert!(board.scene.contains(board.manager.placeholder()));
}
