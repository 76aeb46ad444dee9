use std::time::Duration;

use block_party::core::{EngineConfig, GameSession, MemoryHighScoreStore, SimpleRng};
use block_party::term::{AnchorY, FrameBuffer, GameView, Viewport};
use block_party::types::{Action, Cell, Mode, PieceKind};

fn session() -> GameSession {
    GameSession::new(EngineConfig::default(), SimpleRng::new(1)).unwrap()
}

fn all_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

#[test]
fn term_view_renders_border_corners() {
    let snap = session().snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 11*2 by 20*1 => 22x20
    // plus border => 24x22
    let fb = view.render(&snap, Viewport::new(24, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(23, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(23, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_draws_row_zero_at_the_bottom() {
    let mut s = session();
    s.board_mut().set(0, 0, Cell::Filled(PieceKind::I));
    s.board_mut().set(10, 19, Cell::Filled(PieceKind::O));
    let snap = s.snapshot();
    assert_eq!(snap.active, None);

    let fb = GameView::default().render(&snap, Viewport::new(24, 22));

    // Inside border: (1,1) origin, each cell two columns wide.
    assert_eq!(fb.get(1, 20).unwrap().ch, '█');
    assert_eq!(fb.get(2, 20).unwrap().ch, '█');
    assert_eq!(fb.get(1, 1).unwrap().ch, ' ');

    // Top-right board cell is the first interior row.
    assert_eq!(fb.get(21, 1).unwrap().ch, '█');
    assert_eq!(fb.get(22, 1).unwrap().ch, '█');
}

#[test]
fn term_view_marks_clearing_rows_in_reverse() {
    let mut s = session();
    s.board_mut().set(3, 0, Cell::Clearing(PieceKind::T));
    let fb = GameView::default().render(&s.snapshot(), Viewport::new(24, 22));

    let cell = fb.get(7, 20).unwrap();
    assert_eq!(cell.ch, '▒');
    assert!(cell.style.reverse);
}

#[test]
fn term_view_draws_active_piece_and_ghost() {
    let mut s = session();
    s.reset();
    s.apply_action(Action::Confirm, Duration::ZERO);
    let snap = s.snapshot();
    assert_eq!(snap.mode, Mode::Play);

    let fb = GameView::default().render(&snap, Viewport::new(24, 22));
    let text = all_text(&fb);
    assert!(text.contains('░'), "ghost missing:\n{}", text);
    assert!(text.contains('█'), "piece missing:\n{}", text);

    // The ghost rests on the floor, so the bottom interior row has some of it.
    assert!(fb.row_text(20).contains('░'));
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut s = session().with_high_score_store(Box::new(MemoryHighScoreStore::new(1234)));
    s.reset();
    s.apply_action(Action::Confirm, Duration::ZERO);
    let snap = s.snapshot();

    let fb = GameView::default().render(&snap, Viewport::new(60, 22));
    let text = all_text(&fb);

    assert!(text.contains("HIGH"));
    assert!(text.contains("1234"));
    assert!(text.contains("SCORE"));
    assert!(text.contains("LEVEL"));
    assert!(text.contains("LINES"));
    assert!(text.contains("NEXT"));
    assert!(text.contains("SOUND on"));
}

#[test]
fn term_view_hides_high_score_without_store() {
    let mut s = session();
    s.reset();
    let fb = GameView::default().render(&s.snapshot(), Viewport::new(60, 22));
    let text = all_text(&fb);
    assert!(text.contains("SCORE"));
    assert!(!text.contains("HIGH"));
}

#[test]
fn term_view_shows_sound_off() {
    let mut s = session();
    s.apply_action(Action::ToggleSound, Duration::ZERO);
    s.reset();
    let fb = GameView::default().render(&s.snapshot(), Viewport::new(60, 22));
    assert!(all_text(&fb).contains("SOUND off"));
}

#[test]
fn term_view_shows_select_level_poster() {
    let mut s = session();
    s.reset();
    s.apply_action(Action::MoveRight, Duration::ZERO);

    let fb = GameView::default().render(&s.snapshot(), Viewport::new(24, 22));
    let text = all_text(&fb);
    assert!(text.contains("Select Level"));
    assert!(text.contains("LEVEL: 6"));
    assert!(text.contains("Enter to start"));
}

#[test]
fn term_view_shows_game_over_poster() {
    let mut s = session();
    s.reset();
    s.apply_action(Action::Confirm, Duration::ZERO);
    s.apply_action(Action::HardDrop, Duration::ZERO);
    for y in 17..20 {
        for x in 0..11 {
            s.board_mut().set(x, y, Cell::Filled(PieceKind::Z));
        }
    }
    s.advance(Duration::from_millis(500));
    assert_eq!(s.mode(), Mode::GameOver);

    let fb = GameView::default().render(&s.snapshot(), Viewport::new(24, 22));
    let text = all_text(&fb);
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("Enter to play again"));
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = session().snapshot();

    // Board frame is 22 rows tall (20 + border).
    let fb = GameView::default().render(&snap, Viewport::new(24, 30));

    // start_y = (30 - 22) / 2 = 4 => top-left corner at (0,4).
    assert_eq!(fb.get(0, 4).unwrap().ch, '┌');
}

#[test]
fn term_view_can_anchor_board_to_top() {
    let snap = session().snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);

    let fb = view.render(&snap, Viewport::new(24, 30));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
}

#[test]
fn term_view_follows_configured_board_size() {
    let config = EngineConfig {
        width: 6,
        height: 10,
        ..EngineConfig::default()
    };
    let snap = GameSession::new(config, SimpleRng::new(1)).unwrap().snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(14, 12));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(13, 11).unwrap().ch, '┘');
}
