//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from
//! `tui_2048::term`. When the TCP adapter is enabled, an agent plays the same
//! session; the screen refreshes on a short poll interval to pick up its moves.

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tui_2048::adapter::{lock_session, shared_session, Adapter, SharedSession};
use tui_2048::config::AppConfig;
use tui_2048::core::{Session, SessionSnapshot, SimpleRng};
use tui_2048::input::{handle_key_event, should_quit};
use tui_2048::term::{AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, Viewport};

const POLL_MS: u64 = 50;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;
    for w in &config.warnings {
        warn!("{w}");
    }

    let session = match config.seed {
        Some(seed) => Session::with_config(seed, config.session),
        None => Session::with_rng(config.session, SimpleRng::from_entropy()),
    };
    info!(seed = ?config.seed, win_tile = config.session.win_tile(), "starting session");
    let session = shared_session(session);

    // A broken adapter setup should not keep the local player from playing.
    let adapter = match Adapter::start_from_env(Arc::clone(&session)) {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!(error = %e, "adapter failed to start; continuing without it");
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &session, adapter.as_ref());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(config: &AppConfig) -> Result<()> {
    // The renderer owns stdout; without a log file there is nowhere to log.
    let Some(path) = config.log_path.as_ref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn run(term: &mut TerminalRenderer, session: &SharedSession, adapter: Option<&Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let poll = Duration::from_millis(POLL_MS);

    loop {
        // Render.
        lock_session(session).snapshot_into(&mut snap);
        let adapter_view = adapter.map(|a| AdapterStatusView {
            client_count: a.client_count().min(u16::MAX as usize) as u16,
            has_controller: a.has_controller(),
        });
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, adapter_view.as_ref(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(poll)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    info!("quit requested");
                    return Ok(());
                }
                let Some(action) = handle_key_event(key) else {
                    continue;
                };
                let after = {
                    let mut s = lock_session(session);
                    s.apply_action(action);
                    s.snapshot()
                };
                if let Some(adapter) = adapter {
                    adapter.publish(after);
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
