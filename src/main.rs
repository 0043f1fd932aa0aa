//! A frosted-glass card over a scrollable stack of full-bleed images.
//!
//! Run with image files or directories as arguments, or with none to browse
//! the built-in scenes.  Scroll to the last image and the card glides down
//! the screen; scroll back and it returns to the top.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::app::{
    event::{spawn_event_sources, AppEvent},
    handler,
    loader::LoadUpdate,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::gallery::Gallery;
use crate::ui::{
    glass_card::GlassCard, image_stack::ImageStack, layout::AppLayout, spinner::LoadIndicator,
    status::StatusBar,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Glassmorphism card over a scrollable image stack")]
struct Cli {
    /// Images or directories of images to show (defaults to built-in scenes).
    paths: Vec<PathBuf>,

    /// Height of each image, in terminal rows.
    #[arg(long)]
    item_rows: Option<u16>,

    /// Height of the glass card, in terminal rows.
    #[arg(long)]
    card_rows: Option<u16>,

    /// Length of the card slide, in milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Animation frame interval, in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.  Values go
    /// through the same parser as the file so the same clamping applies.
    fn apply_overrides(&self, config: AppConfig) -> AppConfig {
        let mut overrides = Vec::new();
        if let Some(v) = self.item_rows {
            overrides.push(format!("item_rows = {v}"));
        }
        if let Some(v) = self.card_rows {
            overrides.push(format!("card_rows = {v}"));
        }
        if let Some(v) = self.duration_ms {
            overrides.push(format!("animation_ms = {v}"));
        }
        if let Some(v) = self.tick_ms {
            overrides.push(format!("tick_ms = {v}"));
        }
        if overrides.is_empty() {
            return config;
        }
        let text = format!("{}\n{}", config.serialise(), overrides.join("\n"));
        AppConfig::parse(&text)
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG asks for it).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let config = cli.apply_overrides(AppConfig::load());

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }
    if cli.write_config {
        config.save().context("failed to write config")?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    let gallery = Gallery::from_paths(&cli.paths).context("failed to build image list")?;
    tracing::info!("showing {} images", gallery.len());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, gallery, config).await;

    // ── teardown ──────────────────────────────────────────────
    // Always restore the terminal, even when the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    gallery: Gallery,
    config: AppConfig,
) -> Result<()> {
    let tick_rate = config.tick_rate();
    let mut state = AppState::new(gallery, config, Instant::now());

    let size = terminal.size()?;
    let layout = AppLayout::from_area(Rect::new(0, 0, size.width, size.height));
    state.set_viewport(layout.list_area.height, Instant::now());

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_sources(tick_rate);
    let (load_tx, mut load_rx) = tokio::sync::mpsc::unbounded_channel::<(u64, LoadUpdate)>();
    state.start_decode(&load_tx);

    let mut needs_redraw = true;

    // ── event loop ────────────────────────────────────────────
    loop {
        if needs_redraw {
            needs_redraw = false;
            terminal.draw(|frame| {
                let layout = AppLayout::from_area(frame.area());

                // Fit newly visible images before borrowing state for drawing.
                state
                    .fitted
                    .prepare(&state.scroll, &state.images, layout.list_area.width);

                frame.render_widget(
                    ImageStack {
                        gallery: &state.gallery,
                        scroll: &state.scroll,
                        slots: &state.images,
                        fitted: &state.fitted,
                        tick: state.tick,
                    },
                    layout.list_area,
                );
                frame.render_widget(
                    GlassCard::new(state.card_offset(), state.config.card_rows),
                    layout.list_area,
                );
                frame.render_widget(
                    LoadIndicator {
                        visible: state.loading,
                        tick: state.tick,
                    },
                    layout.list_area,
                );

                let current = state.current_image();
                let hint = state.config.status_bar_hint();
                frame.render_widget(
                    StatusBar {
                        current: current.as_ref().map(|(i, label)| (*i, label.as_str())),
                        total: state.gallery.len(),
                        at_bottom: state.at_bottom(),
                        message: state.status_message.as_deref(),
                        hint: &hint,
                    },
                    layout.status_area,
                );
            })?;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => {
                        handler::handle_key(&mut state, k, Instant::now());
                        if std::mem::take(&mut state.reload_requested) {
                            state.start_decode(&load_tx);
                        }
                        needs_redraw = true;
                    }
                    AppEvent::Mouse(m) => {
                        handler::handle_mouse(&mut state, m, Instant::now());
                        needs_redraw = true;
                    }
                    AppEvent::Resize(w, h) => {
                        let layout = AppLayout::from_area(Rect::new(0, 0, w, h));
                        state.set_viewport(layout.list_area.height, Instant::now());
                        needs_redraw = true;
                    }
                    AppEvent::Tick(now) => {
                        // Only the card and the spinner move on their own.
                        if state.on_tick(now) {
                            needs_redraw = true;
                        }
                    }
                }
            }

            Some((generation, update)) = load_rx.recv() => {
                if state.handle_decode_update(generation, update) {
                    needs_redraw = true;
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    state.cancel_decode();
    Ok(())
}
