//! Terminal and frame events.
//!
//! Two producers feed one channel: a blocking reader that forwards crossterm
//! input, and a ticker that emits a frame tick at a fixed interval so the
//! card animation advances even when no input arrives.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Animation frame; carries the time the tick fired.
    Tick(Instant),
}

/// Spawns the input reader and the frame ticker.  Both stop once the
/// returned receiver is dropped.
pub fn spawn_event_sources(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    let input_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
        // Poll with a timeout so a dropped receiver is noticed promptly.
        let has_event = event::poll(Duration::from_millis(250)).unwrap_or(false);
        if input_tx.is_closed() {
            break;
        }
        if !has_event {
            continue;
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        let app_event = match ev {
            CtEvent::Key(k) if k.kind != KeyEventKind::Release => AppEvent::Key(k),
            CtEvent::Mouse(m) => AppEvent::Mouse(m),
            CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
            _ => continue,
        };
        if input_tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick(Instant::now())).is_err() {
                break;
            }
        }
    });

    rx
}
