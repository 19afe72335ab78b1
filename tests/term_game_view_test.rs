use tui_2048::core::{Grid, Session, SessionConfig, SessionSnapshot, SimpleRng};
use tui_2048::term::{tile_bg, AdapterStatusView, AnchorY, FrameBuffer, GameView, Rgb, Viewport};
use tui_2048::types::GameStatus;

fn snapshot_of(rows: [[u32; 4]; 4]) -> SessionSnapshot {
    Session::from_grid(Grid::from_rows(rows), SessionConfig::default(), SimpleRng::new(1)).snapshot()
}

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn term_view_renders_border_corners() {
    let view = GameView::default();
    // 4 tiles of 6 columns + 3 gaps + border = 29; 4 tiles of 3 rows + border = 14.
    let fb = view.render(&SessionSnapshot::default(), None, Viewport::new(29, 14));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(28, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 13).unwrap().ch, '└');
    assert_eq!(fb.get(28, 13).unwrap().ch, '┘');
}

#[test]
fn term_view_centers_tile_values() {
    let snap = snapshot_of([[2, 2048, 0, 0], [0; 4], [0; 4], [0, 0, 0, 16]]);
    let fb = GameView::default().render(&snap, None, Viewport::new(29, 14));

    // Tile (0,0) spans x 1..7, y 1..4; a single digit lands at x=3, middle row y=2.
    assert_eq!(fb.get(3, 2).unwrap().ch, '2');
    // Tile (0,1) starts at x=8; four digits start at x=9.
    let row: String = fb.row_text(2).chars().skip(9).take(4).collect();
    assert_eq!(row, "2048");
    // Tile (3,3) starts at x=22, y=10; two digits start at x=24 on y=11.
    assert_eq!(fb.get(24, 11).unwrap().ch, '1');
    assert_eq!(fb.get(25, 11).unwrap().ch, '6');
}

#[test]
fn term_view_colors_tiles_by_value() {
    let snap = snapshot_of([[2, 128, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let fb = GameView::default().render(&snap, None, Viewport::new(29, 14));

    assert_eq!(fb.get(1, 1).unwrap().style.bg, tile_bg(2));
    assert_eq!(fb.get(8, 1).unwrap().style.bg, tile_bg(128));
    assert_eq!(fb.get(15, 1).unwrap().style.bg, Rgb::hex(0xcdc1b4));
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = snapshot_of([[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    snap.moves = 37;

    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let adapter = AdapterStatusView {
        client_count: 2,
        has_controller: true,
    };
    let fb = view.render(&snap, Some(&adapter), Viewport::new(60, 16));
    let all = screen_text(&fb);

    assert!(all.contains("STATUS"));
    assert!(all.contains("playing"));
    assert!(all.contains("MOVES"));
    assert!(all.contains("37"));
    assert!(all.contains("ctrl"));

    let narrow = view.render(&snap, None, Viewport::new(29, 14));
    assert!(!screen_text(&narrow).contains("STATUS"));
}

#[test]
fn term_view_overlays_terminal_states() {
    let mut snap = snapshot_of([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    assert_eq!(snap.status, GameStatus::Lost);
    let fb = GameView::default().render(&snap, None, Viewport::new(29, 14));
    assert!(screen_text(&fb).contains("GAME OVER"));
    assert!(screen_text(&fb).contains("r: restart"));

    snap.status = GameStatus::Won;
    let fb = GameView::default().render(&snap, None, Viewport::new(29, 14));
    assert!(screen_text(&fb).contains("YOU WIN!"));
}

#[test]
fn render_into_reuses_and_resizes_buffer() {
    let view = GameView::default();
    let snap = SessionSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    view.render_into(&snap, None, Viewport::new(40, 20), &mut fb);
    assert_eq!((fb.width(), fb.height()), (40, 20));

    view.render_into(&snap, None, Viewport::new(29, 14), &mut fb);
    assert_eq!(fb, view.render(&snap, None, Viewport::new(29, 14)));
}
