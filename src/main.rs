//! Terminal Block Party runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from the term crate.
//! The engine runs on "time since start"; this loop only polls keys, feeds
//! the session, and repaints when the session asks for it.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use log::{error, info};

use block_party::core::{GameSession, GameSnapshot};
use block_party::input::InputHandler;
use block_party::logging;
use block_party::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use block_party::types::{GameEvent, Region, SoundCue, FRAME_MS};
use block_party::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    if let Err(e) = logging::init(config.log_level, &config.log_path) {
        eprintln!("block-party: logging disabled: {:#}", e);
    }

    let mut session = config.build_session()?;
    info!(
        "starting: {:?}, high score file {:?}",
        config.engine, config.score_path
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!("terminated: {:#}", e);
    }
    result
}

fn run(term: &mut TerminalRenderer, session: &mut GameSession) -> Result<()> {
    let start = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut dirty = true;

    session.reset();

    loop {
        // Events.
        let mut bell = false;
        for event in session.drain_events() {
            match event {
                GameEvent::Redraw(Region::Full) => {
                    term.invalidate();
                    dirty = true;
                }
                GameEvent::Redraw(_) => dirty = true,
                GameEvent::Sound(SoundCue::LineClear | SoundCue::GameOver(_)) => bell = true,
                _ => {}
            }
        }
        if session.is_finished() {
            return Ok(());
        }
        if bell {
            term.bell()?;
        }

        // Render.
        if dirty {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            session.snapshot_into(&mut snap);
            view.render_into(&snap, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until the next frame or tick, whichever is first.
        let now = start.elapsed();
        let timeout = session
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now).min(frame))
            .unwrap_or(frame);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = input.handle_key_event(key, start.elapsed()) {
                        session.apply_action(action, start.elapsed());
                    }
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        // Tick.
        let now = start.elapsed();
        if let Some(action) = input.update(now) {
            session.apply_action(action, now);
        }
        session.advance(now);
    }
}
