//! Terminal event pump.
//!
//! A background task polls crossterm and forwards the events the browser
//! cares about over a channel, so the main loop can `select!` between input
//! and decoded thumbnails.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Nothing happened within the poll interval.
    Tick,
}

/// Translate a raw crossterm event.  Key releases and repeats are dropped;
/// focus and paste events are not used.
fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Spawn the reader task.  It stops once the receiver is dropped.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let app_event = match event::poll(tick_rate) {
                Ok(true) => match event::read().map(translate) {
                    Ok(Some(ev)) => ev,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::warn!("terminal read failed: {e}");
                        continue;
                    }
                },
                Ok(false) => AppEvent::Tick,
                Err(e) => {
                    tracing::warn!("terminal poll failed: {e}");
                    break;
                }
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
