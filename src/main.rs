//! A terminal browser for a 3D model library.
//!
//! Run the binary to browse the category tree and thumbnail grid.
//! Run with `--print-categories` or `--scan <DIR>` for scriptable output.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
    thumbs::{self, ThumbUpdate},
};
use crate::core::{category, scan};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Browse a 3D model library by thumbnail")]
struct Cli {
    /// Library root (overrides the config file).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Print the category table with resolved paths and exit.
    #[arg(long = "print-categories")]
    print_categories: bool,

    /// Print every thumbnail under DIR and exit.
    #[arg(long, value_name = "DIR")]
    scan: Option<PathBuf>,
}

// ───────────────────────────────────────── print modes ───────

fn print_categories(root: &Path, out: &mut impl Write) -> io::Result<()> {
    for top in category::build_categories(root) {
        writeln!(out, "{}\t{}", top.name, top.path.display())?;
        for child in &top.children {
            writeln!(out, "  {}\t{}", child.name, child.path.display())?;
        }
    }
    Ok(())
}

fn print_scan(dir: &Path, out: &mut impl Write) -> io::Result<()> {
    let result = scan::scan(dir);
    for entry in &result.entries {
        writeln!(out, "{}\t{}", entry.name, entry.thumbnail.display())?;
    }
    writeln!(out, "{} models", result.count)
}

// ───────────────────────────────────────── event loop ───────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (thumb_tx, mut thumb_rx) = tokio::sync::mpsc::unbounded_channel::<ThumbUpdate>();

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        // The draw just measured the grid; decode whatever became visible.
        thumbs::request_visible(state, &thumb_tx);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => {}
                }
            }

            Some(update) = thumb_rx.recv() => {
                // Batch-drain so a burst of decodes costs one redraw.
                thumbs::apply_update(state, update);
                while let Ok(update) = thumb_rx.try_recv() {
                    thumbs::apply_update(state, update);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (silent unless RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if let Some(root) = cli.root {
        user_config.root = root;
    }

    // ── scriptable modes ──────────────────────────────────────
    if cli.print_categories {
        print_categories(&user_config.root, &mut io::stdout().lock())?;
        return Ok(());
    }
    if let Some(dir) = cli.scan {
        print_scan(&dir, &mut io::stdout().lock())
            .with_context(|| format!("scanning {}", dir.display()))?;
        return Ok(());
    }

    tracing::info!("library root: {}", user_config.root.display());
    let mut state = AppState::new(user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
