use card_crush::core::{CellSet, Session, SessionSnapshot};
use card_crush::term::{AdapterStatusView, AnchorY, FrameBuffer, GameView, HudView, Viewport};
use card_crush::types::Pos;

fn abc_snapshot() -> SessionSnapshot {
    Session::new("abc").unwrap().snapshot()
}

fn all_text(fb: &FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn term_view_frames_the_board() {
    let snap = abc_snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    // 6 tiles of 5 columns plus border = 32 wide, 8 tall; no room for a panel.
    let fb = view.render(&snap, &HudView::new("Level 1", Pos::new(5, 5)), Viewport::new(32, 8));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(31, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 7).unwrap().ch, '└');
    assert_eq!(fb.get(31, 7).unwrap().ch, '┘');
    assert!(!all_text(&fb).contains("TURN"));
}

#[test]
fn term_view_labels_tiles_and_marks_cursor() {
    let snap = abc_snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, &HudView::new("Level 1", Pos::new(0, 0)), Viewport::new(32, 8));

    // 'a' -> Jito, 'b' -> Nyl, 'c' -> Ott
    let row = fb.row_text(1);
    assert!(row.starts_with("│[jto] nyl  ott  jto"), "{row:?}");
    let row = fb.row_text(2);
    assert!(row.starts_with("│ jto  nyl  ott "), "{row:?}");
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut session = Session::new("abc").unwrap();
    session.tap(Pos::new(0, 0));
    session.tap(Pos::new(0, 1));
    let snap = session.snapshot();

    let status = AdapterStatusView {
        enabled: true,
        client_count: 2,
        controller_id: Some(1),
        streaming_count: 1,
    };
    let hud = HudView {
        message: Some("hello there"),
        adapter: Some(&status),
        ..HudView::new("Level 3", Pos::new(0, 0))
    };
    let fb = GameView::default().render(&snap, &hud, Viewport::new(90, 24));
    let text = all_text(&fb);

    assert!(text.contains("Level 3"));
    assert!(text.contains("TURN"));
    assert!(text.contains(&format!("1/{}", snap.turn_limit)));
    assert!(text.contains("POINTS"));
    assert!(text.contains("a1r"));
    assert!(text.contains("C 2 S 1 CTRL 1"));
    assert!(fb.row_text(23).contains("hello there"));
    assert!(!text.contains("You can now submit!"));
}

#[test]
fn term_view_burns_overlay_cells() {
    let snap = abc_snapshot();
    let mut overlay = CellSet::new();
    overlay.insert(Pos::new(1, 2));
    let hud = HudView {
        overlay: Some(&overlay),
        ..HudView::new("Level 1", Pos::new(5, 5))
    };
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, &hud, Viewport::new(32, 8));

    let (x, y) = view.tile_origin(0, 0, Pos::new(1, 2));
    for dx in 0..5 {
        assert_eq!(fb.get(x + dx, y).unwrap().ch, '▒');
    }
    assert_eq!(fb.row_text(2).matches("ott").count(), 1);
    assert_eq!(fb.row_text(1).matches("ott").count(), 2);
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = abc_snapshot();
    let fb = GameView::default().render(
        &snap,
        &HudView::new("Level 1", Pos::new(0, 0)),
        Viewport::new(32, 20),
    );
    // start_y = (20 - 8) / 2 = 6
    assert_eq!(fb.get(0, 6).unwrap().ch, '┌');
}
