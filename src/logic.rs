//! Session logic: query dispatch, selection movement, and the
//! staleness-checked continuations for background work.
//!
//! Queries and detail requests both carry monotonically increasing
//! identifiers allocated here; the apply functions compare those against
//! the latest issued id and silently drop anything older. That comparison
//! is the only defense against out-of-order resolution, so every
//! continuation goes through it before touching [`AppState`].

use tokio::sync::mpsc;

use crate::format;
use crate::state::{
    AppState, DetailRequest, DetailResponse, DisplayMode, FilterResults, IDLE_MESSAGE,
    LOADING_MESSAGE, NO_MATCH_MESSAGE, QueryInput,
};

/// Send the current query text over the search channel with a fresh id.
///
/// The id lets the receiver tag its results so stale responses can be
/// discarded on arrival.
pub fn send_query(app: &mut AppState, query_tx: &mpsc::UnboundedSender<QueryInput>) {
    let id = app.next_query_id;
    app.next_query_id += 1;
    app.latest_query_id = id;
    let _ = query_tx.send(QueryInput {
        id,
        text: app.input.clone(),
    });
}

/// Move the list highlight by `delta` and commit to the newly highlighted
/// version when it differs from the current selection.
///
/// The first navigation keeps the highlight in place so the initially
/// highlighted row is what gets loaded. A changed selection clears the
/// stored blocks, shows the loading indicator, and issues a ticketed
/// detail request; an unchanged one is a pure cursor move.
pub fn move_selection(
    app: &mut AppState,
    delta: isize,
    details_tx: &mpsc::UnboundedSender<DetailRequest>,
) {
    if app.options.is_empty() {
        return;
    }
    let len = app.options.len() as isize;
    let mut idx = if app.selection.is_none() {
        app.selected as isize
    } else {
        app.selected as isize + delta
    };
    if idx < 0 {
        idx = 0;
    }
    if idx >= len {
        idx = len - 1;
    }
    app.selected = idx as usize;
    app.list_state.select(Some(app.selected));

    let value = app.options[app.selected].value.clone();
    if app.selection.as_deref() == Some(value.as_str()) {
        return;
    }
    app.selection = Some(value.clone());
    app.truncated_block = None;
    app.full_block = None;
    app.text = LOADING_MESSAGE.to_string();

    let ticket = app.next_ticket;
    app.next_ticket += 1;
    app.latest_ticket = ticket;
    let _ = details_tx.send(DetailRequest { ticket, version: value });
}

/// Switch the display mode, swapping in the already-computed block for
/// that mode. Never refetches; with no resolved block the current text
/// (loading, error, or message) stays put.
pub fn set_display_mode(app: &mut AppState, mode: DisplayMode) {
    app.display_mode = mode;
    if let Some(block) = app.block_for_mode().cloned() {
        app.text = block;
    }
}

/// Apply a filtered projection from the debounce worker.
///
/// Results tagged with anything but the latest query id are dropped. The
/// highlight is preserved by version value when it survives the filter,
/// clamped otherwise; the committed selection itself is never cleared
/// here. A non-empty query with zero matches swaps in the no-match
/// message, and leaving that state restores the stored block or the idle
/// message.
pub fn apply_filter_results(app: &mut AppState, results: FilterResults) {
    if results.id != app.latest_query_id {
        tracing::debug!(id = results.id, latest = app.latest_query_id, "dropping stale filter results");
        return;
    }
    let highlighted = app.options.get(app.selected).map(|o| o.value.clone());
    app.options = results.options;

    if app.options.is_empty() {
        app.selected = 0;
        app.list_state.select(None);
    } else {
        app.selected = highlighted
            .and_then(|value| app.options.iter().position(|o| o.value == value))
            .unwrap_or(0)
            .min(app.options.len() - 1);
        app.list_state.select(Some(app.selected));
    }

    if app.options.is_empty() && !app.input.trim().is_empty() {
        app.text = NO_MATCH_MESSAGE.to_string();
    } else if app.text == NO_MATCH_MESSAGE {
        app.text = app
            .block_for_mode()
            .cloned()
            .unwrap_or_else(|| IDLE_MESSAGE.to_string());
    }
}

/// Apply a resolved detail fetch.
///
/// A response whose ticket is not the latest issued is discarded whether
/// it succeeded or failed; the selection has moved on and its own fetch is
/// outstanding. A relevant success computes and stores both display
/// blocks, then shows the one for the active mode; a relevant failure
/// replaces the text with an explicit error message.
pub fn apply_details(app: &mut AppState, response: DetailResponse) {
    if response.ticket != app.latest_ticket {
        tracing::debug!(
            ticket = response.ticket,
            latest = app.latest_ticket,
            version = %response.version,
            "dropping stale detail response"
        );
        return;
    }
    match response.result {
        Ok(details) => {
            let scope = app.scope.as_deref();
            app.truncated_block = Some(format::truncated_block(&details, &app.package, scope));
            app.full_block = Some(format::full_block(&details, &app.package, scope));
            if let Some(block) = app.block_for_mode().cloned() {
                app.text = block;
            }
        }
        Err(msg) => {
            tracing::warn!(version = %response.version, error = %msg, "detail fetch failed");
            app.text = format!("Failed to load {}@{}: {msg}", app.package, response.version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{VersionDetails, VersionOption};

    fn app_with_options(versions: &[&str]) -> AppState {
        let mut app = AppState::new("mycli".into(), None);
        app.options = versions
            .iter()
            .map(|v| VersionOption {
                label: (*v).to_string(),
                value: (*v).to_string(),
            })
            .collect();
        if !app.options.is_empty() {
            app.list_state.select(Some(0));
        }
        app
    }

    fn details(version: &str) -> VersionDetails {
        VersionDetails {
            version: version.to_string(),
            ..VersionDetails::default()
        }
    }

    #[test]
    fn send_query_allocates_monotonic_ids() {
        let mut app = app_with_options(&[]);
        app.input = "2".into();
        let (tx, mut rx) = mpsc::unbounded_channel();
        send_query(&mut app, &tx);
        send_query(&mut app, &tx);
        assert_eq!(app.latest_query_id, 2);
        let first = rx.try_recv().expect("first query sent");
        let second = rx.try_recv().expect("second query sent");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.text, "2");
    }

    #[test]
    fn first_navigation_selects_the_highlighted_row() {
        let mut app = app_with_options(&["2.0.0", "1.0.0"]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        move_selection(&mut app, 1, &tx);
        assert_eq!(app.selected, 0);
        assert_eq!(app.selection.as_deref(), Some("2.0.0"));
        assert_eq!(app.text, LOADING_MESSAGE);
        let req = rx.try_recv().expect("detail request issued");
        assert_eq!(req.version, "2.0.0");
        assert_eq!(req.ticket, app.latest_ticket);
    }

    #[test]
    fn repeated_navigation_moves_and_refetches_only_on_change() {
        let mut app = app_with_options(&["3.0.0", "2.0.0", "1.0.0"]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        move_selection(&mut app, 1, &tx); // commits 3.0.0
        move_selection(&mut app, 1, &tx); // moves to 2.0.0
        move_selection(&mut app, -1, &tx); // back to 3.0.0
        assert_eq!(app.selection.as_deref(), Some("3.0.0"));
        let tickets: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|r| r.ticket)
            .collect();
        assert_eq!(tickets, vec![1, 2, 3]);
        // Navigating up at the top edge changes nothing and sends nothing.
        move_selection(&mut app, -1, &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn toggle_swaps_stored_blocks_without_refetching() {
        let mut app = app_with_options(&["1.0.0"]);
        app.truncated_block = Some("short".into());
        app.full_block = Some("long".into());
        app.text = "short".into();
        set_display_mode(&mut app, DisplayMode::Full);
        assert_eq!(app.text, "long");
        set_display_mode(&mut app, DisplayMode::Truncated);
        assert_eq!(app.text, "short");
    }

    #[test]
    fn toggle_without_blocks_keeps_current_text() {
        let mut app = app_with_options(&["1.0.0"]);
        app.text = LOADING_MESSAGE.to_string();
        set_display_mode(&mut app, DisplayMode::Full);
        assert_eq!(app.display_mode, DisplayMode::Full);
        assert_eq!(app.text, LOADING_MESSAGE);
    }

    #[test]
    fn stale_filter_results_are_dropped() {
        let mut app = app_with_options(&["1.0.0"]);
        app.latest_query_id = 5;
        apply_filter_results(
            &mut app,
            FilterResults {
                id: 4,
                options: Vec::new(),
            },
        );
        assert_eq!(app.options.len(), 1);
    }

    #[test]
    fn empty_results_for_a_query_show_the_no_match_message() {
        let mut app = app_with_options(&["1.0.0"]);
        app.input = "zzz".into();
        app.latest_query_id = 1;
        apply_filter_results(
            &mut app,
            FilterResults {
                id: 1,
                options: Vec::new(),
            },
        );
        assert_eq!(app.text, NO_MATCH_MESSAGE);
        assert!(app.list_state.selected().is_none());
        // Focus and committed selection are untouched by the message.
        assert!(app.selection.is_none());
    }

    #[test]
    fn leaving_the_no_match_state_restores_block_or_idle() {
        let mut app = app_with_options(&[]);
        app.input = "1".into();
        app.latest_query_id = 1;
        app.text = NO_MATCH_MESSAGE.to_string();
        apply_filter_results(
            &mut app,
            FilterResults {
                id: 1,
                options: vec![VersionOption {
                    label: "1.0.0".into(),
                    value: "1.0.0".into(),
                }],
            },
        );
        assert_eq!(app.text, IDLE_MESSAGE);
    }

    #[test]
    fn highlight_is_preserved_by_value_across_filters() {
        let mut app = app_with_options(&["3.0.0", "2.0.0", "1.0.0"]);
        app.selected = 1;
        app.list_state.select(Some(1));
        app.latest_query_id = 1;
        apply_filter_results(
            &mut app,
            FilterResults {
                id: 1,
                options: vec![
                    VersionOption {
                        label: "2.0.0".into(),
                        value: "2.0.0".into(),
                    },
                    VersionOption {
                        label: "1.0.0".into(),
                        value: "1.0.0".into(),
                    },
                ],
            },
        );
        assert_eq!(app.selected, 0);
        assert_eq!(app.options[app.selected].value, "2.0.0");
    }

    #[test]
    fn stale_detail_responses_are_discarded_in_either_order() {
        let mut app = app_with_options(&["2.0.0", "1.0.0"]);
        let (tx, _rx) = mpsc::unbounded_channel();
        move_selection(&mut app, 1, &tx); // selection A, ticket 1
        move_selection(&mut app, 1, &tx); // selection B, ticket 2

        // A resolves after B: B applies, A is dropped.
        apply_details(
            &mut app,
            DetailResponse {
                ticket: 2,
                version: "1.0.0".into(),
                result: Ok(details("1.0.0")),
            },
        );
        apply_details(
            &mut app,
            DetailResponse {
                ticket: 1,
                version: "2.0.0".into(),
                result: Ok(details("2.0.0")),
            },
        );
        assert!(app.text.starts_with("mycli@1.0.0"));
    }

    #[test]
    fn relevant_failure_shows_an_explicit_error() {
        let mut app = app_with_options(&["1.0.0"]);
        let (tx, _rx) = mpsc::unbounded_channel();
        move_selection(&mut app, 1, &tx);
        apply_details(
            &mut app,
            DetailResponse {
                ticket: 1,
                version: "1.0.0".into(),
                result: Err("registry connection failed or timed out".into()),
            },
        );
        assert_eq!(
            app.text,
            "Failed to load mycli@1.0.0: registry connection failed or timed out"
        );
    }

    #[test]
    fn stale_failure_is_discarded_silently() {
        let mut app = app_with_options(&["2.0.0", "1.0.0"]);
        let (tx, _rx) = mpsc::unbounded_channel();
        move_selection(&mut app, 1, &tx); // ticket 1
        move_selection(&mut app, 1, &tx); // ticket 2
        apply_details(
            &mut app,
            DetailResponse {
                ticket: 1,
                version: "2.0.0".into(),
                result: Err("boom".into()),
            },
        );
        assert_eq!(app.text, LOADING_MESSAGE);
    }
}
