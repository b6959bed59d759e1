//! ThreeToGo terminal runner (default binary).
//!
//! Mouse-driven: click an add button to insert the next token, click a token
//! and then the cell above (color) or below (shape) it to align the row.
//! Uses crossterm for input and the framebuffer renderer from `three_to_go::term`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use three_to_go::clock::TickClock;
use three_to_go::config;
use three_to_go::core::{GameSession, GameSnapshot, SessionConfig};
use three_to_go::input::{handle_key_event, map_mouse, KeyCommand};
use three_to_go::scores::HighScores;
use three_to_go::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use three_to_go::types::{Cue, GameEvent, TICK_MS};

/// How long a cue banner stays on screen.
const BANNER_MS: u32 = 1500;

/// Line up colored shapes and clear runs of three before the clock runs out.
#[derive(Parser)]
#[command(name = "three-to-go", about = "Terminal tile-matching game")]
struct Cli {
    /// Seed for the token supply
    #[arg(long)]
    seed: Option<u32>,

    /// Match length in seconds
    #[arg(long)]
    duration: Option<u32>,

    /// Path to TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// High-score table (TOML), created on the first finished match
    #[arg(long, default_value = "three-to-go-scores.toml")]
    scores: PathBuf,

    /// Write logs to this file (RUST_LOG filters apply)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// High-score table and where it is saved.
struct ScoreBoard<'a> {
    table: HighScores,
    path: &'a Path,
    new_record: bool,
}

impl ScoreBoard<'_> {
    fn record(&mut self, session: &GameSession) {
        let score = session.score();
        self.new_record = self.table.record(score, session.config().seed);
        info!(score, new_record = self.new_record, best = ?self.table.best(), "match recorded");
        if let Err(err) = self.table.save(self.path) {
            warn!(%err, "could not save high scores");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut session_config = match &cli.config {
        Some(path) => config::load_or_default(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        session_config.seed = seed;
    }
    if let Some(secs) = cli.duration {
        session_config.duration_ms = secs.saturating_mul(1000);
    }
    let session = GameSession::new(session_config).context("invalid session config")?;
    info!(seed = session.config().seed, duration_ms = session.config().duration_ms, "starting match");

    let table = HighScores::load(&cli.scores)
        .with_context(|| format!("loading high scores from {}", cli.scores.display()))?;
    let mut board = ScoreBoard {
        table,
        path: &cli.scores,
        new_record: false,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session, &mut board);

    // Always try to restore terminal state.
    let _ = term.exit();

    let score = result?;
    println!("Final score: {score}");
    if let Some(best) = board.table.best() {
        println!("Best score: {best}");
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,three_to_go_core=debug")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, mut session: GameSession, board: &mut ScoreBoard<'_>) -> Result<u32> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut banner: Option<(Cue, u32)> = None;

    let mut clock = TickClock::new(TICK_MS, Instant::now());

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        let overlay = Overlay {
            banner: banner.map(|(cue, _)| cue),
            best: board.table.best(),
            new_record: board.new_record,
        };
        let layout = view.render_into(&snap, &overlay, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        if event::poll(clock.timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match handle_key_event(key) {
                    Some(KeyCommand::Quit) => return Ok(session.score()),
                    Some(KeyCommand::Restart) => {
                        session.restart();
                        clock.reset(Instant::now());
                        banner = None;
                        board.new_record = false;
                        info!(episode_id = session.episode_id(), "restarted");
                    }
                    Some(KeyCommand::Add(side)) => {
                        session.handle_event(GameEvent::ClickAddButton(side));
                    }
                    None => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(ev) = map_mouse(mouse, &layout, snap.len) {
                        session.handle_event(ev);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if let Some(cue) = session.take_last_cue() {
            info!(cue = cue.as_str(), score = session.score(), "cue");
            term.bell()?;
            banner = Some((cue, BANNER_MS));
        }

        // Tick by the wall time that actually passed.
        if let Some(elapsed_ms) = clock.poll(Instant::now()) {
            if session.tick(elapsed_ms) {
                info!(score = session.score(), moves = session.moves(), "time up");
                board.record(&session);
            }
            banner = banner.and_then(|(cue, ms)| {
                let left = ms.saturating_sub(elapsed_ms);
                (left > 0).then_some((cue, left))
            });
        }
    }
}
