//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, a short UI tick and
//! the scheduled feed refresh timer.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::spawn_fetch;
use super::input::handle_input;
use super::render::render;

/// Timer for scheduled refreshes. The first tick lands one period after
/// start, since the initial fetch is spawned directly.
fn refresh_timer(period: Option<Duration>) -> Option<Interval> {
    let period = period?;
    match Instant::now().checked_add(period) {
        Some(start) => Some(tokio::time::interval_at(start, period)),
        None => {
            tracing::warn!(?period, "Refresh interval out of range, refreshing manually only");
            None
        }
    }
}

/// Result of handling a key press event.
pub enum Action {
    Continue,
    Quit,
}

/// Runs the TUI application event loop.
///
/// Starts the initial feed load, then uses `tokio::select!` over:
/// - **Signals**: SIGTERM/SIGINT for graceful shutdown
/// - **Terminal input**: crossterm's async event stream
/// - **Background tasks**: fetch and contact results via the `AppEvent` channel
/// - **UI tick**: 250ms timer for status expiry and debounced search
/// - **Refresh timer**: scheduled refresh, gated by elapsed time since the last fetch
///
/// A panic hook restores the terminal before unwinding.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));
    let mut refresh_interval = refresh_timer(app.controller.refresh_interval());

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    spawn_fetch(app, &event_tx);

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending task results before waiting on more input
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        if let Action::Quit = handle_input(app, key.code, key.modifiers, &event_tx) {
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }

            _ = next_refresh(&mut refresh_interval) => {
                handle_refresh_tick(app, &event_tx, Instant::now());
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Resolves on the next scheduled refresh tick; never resolves when refresh is manual.
async fn next_refresh(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Apply a debounced search once typing has paused.
fn handle_tick(app: &mut App) {
    if app.search_mode && app.apply_debounced_search() {
        app.needs_redraw = true;
    }
}

/// Fetch again only when a full interval has passed since the last success.
pub(super) fn handle_refresh_tick(app: &mut App, event_tx: &mpsc::Sender<AppEvent>, now: Instant) {
    if !app.controller.refresh_due(now) {
        tracing::debug!("Scheduled refresh skipped, feed is fresh");
        return;
    }
    tracing::info!("Scheduled refresh");
    spawn_fetch(app, event_tx);
    app.needs_redraw = true;
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
