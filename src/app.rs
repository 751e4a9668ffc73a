//! Application runtime: terminal lifecycle, background workers, and the
//! main event loop.
//!
//! All session state lives on the loop task. Three workers feed it over
//! channels: a thread polling terminal input, a debounce task collapsing
//! query bursts into filter projections, and a fetch task resolving detail
//! requests. Each message type carries an id the loop validates before
//! applying, so an arbitrary number of events may interleave with an
//! outstanding fetch without corrupting what the user sees.

use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::{select, sync::mpsc, time::sleep};

use crate::catalog::VersionCatalog;
use crate::logic::{apply_details, apply_filter_results};
use crate::net::fetch_version_details;
use crate::state::{AppState, DetailRequest, DetailResponse, FilterResults, QueryInput};
use crate::ui::ui;

/// Boxed error alias for the runtime.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Window during which successive keystrokes collapse into one filter pass.
const DEBOUNCE_MS: u64 = 150;

/// Put the terminal into raw mode on the alternate screen.
fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Restore the terminal to its cooked state.
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the explorer session until the user quits.
///
/// `catalog` is the full version set resolved at bootstrap; it is shared
/// read-only with the debounce worker, which computes every filtered
/// projection off the loop task.
pub async fn run(
    package: String,
    scope: Option<String>,
    registry: String,
    catalog: VersionCatalog,
) -> Result<()> {
    setup_terminal()?;
    let result = run_session(package, scope, registry, catalog).await;
    restore_terminal()?;
    result
}

/// The event loop proper, separated so terminal restoration always runs.
async fn run_session(
    package: String,
    scope: Option<String>,
    registry: String,
    catalog: VersionCatalog,
) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    let catalog = Arc::new(catalog);

    let mut app = AppState::new(package, scope);
    app.options = catalog.filter("");
    if !app.options.is_empty() {
        app.list_state.select(Some(0));
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<CEvent>();
    let (query_tx, mut query_rx) = mpsc::unbounded_channel::<QueryInput>();
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<FilterResults>();
    let (details_req_tx, mut details_req_rx) = mpsc::unbounded_channel::<DetailRequest>();
    let (details_res_tx, mut details_res_rx) = mpsc::unbounded_channel::<DetailResponse>();

    // Input thread: crossterm's blocking poll stays off the async runtime.
    std::thread::spawn(move || {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(50))
                && let Ok(ev) = event::read()
                && event_tx.send(ev).is_err()
            {
                break;
            }
        }
    });

    // Debounce worker: only the last query of a burst is filtered.
    let filter_catalog = Arc::clone(&catalog);
    tokio::spawn(async move {
        loop {
            let mut latest = match query_rx.recv().await {
                Some(q) => q,
                None => break,
            };
            loop {
                select! {
                    Some(next) = query_rx.recv() => { latest = next; }
                    _ = sleep(Duration::from_millis(DEBOUNCE_MS)) => { break; }
                }
            }
            let options = filter_catalog.filter(latest.text.trim());
            if results_tx
                .send(FilterResults {
                    id: latest.id,
                    options,
                })
                .is_err()
            {
                break;
            }
        }
    });

    // Fetch worker: requests run to completion one at a time; relevance is
    // decided by the loop's ticket check, not here.
    let fetch_package = app.package.clone();
    tokio::spawn(async move {
        while let Some(req) = details_req_rx.recv().await {
            let result = fetch_version_details(
                registry.clone(),
                fetch_package.clone(),
                req.version.clone(),
            )
            .await
            .map_err(|e| e.to_string());
            if details_res_tx
                .send(DetailResponse {
                    ticket: req.ticket,
                    version: req.version,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
    });

    loop {
        let _ = terminal.draw(|f| ui(f, &mut app));

        select! {
            Some(ev) = event_rx.recv() => {
                if crate::events::handle_event(ev, &mut app, &query_tx, &details_req_tx) {
                    break;
                }
            }
            Some(results) = results_rx.recv() => {
                apply_filter_results(&mut app, results);
            }
            Some(response) = details_res_rx.recv() => {
                apply_details(&mut app, response);
            }
            else => break,
        }
    }

    Ok(())
}
