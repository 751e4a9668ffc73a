//! Core application state for the pkghist TUI.
//!
//! This module defines the data carried across the application: the npm
//! packument snapshot fetched at startup, the channel payload types used to
//! coordinate background work, the focus and display enums, and the central
//! [`AppState`] container mutated by the event loop. All mutation happens on
//! the main loop task; background workers only ever see owned copies.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Text shown in the detail pane before any version has been chosen.
pub const IDLE_MESSAGE: &str = "Select a version or search for one in the input above";

/// Text shown when a non-empty query matches no versions.
pub const NO_MATCH_MESSAGE: &str = "No versions found based on input";

/// Text shown while a detail fetch for the current selection is outstanding.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Top-level npm packument as returned by `npm view <name> --json`.
///
/// Only the fields the explorer consumes are modeled; everything else in the
/// document is ignored during deserialization.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Packument {
    /// Canonical package name.
    pub name: String,
    /// All published version strings, in registry order.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Map of version string to ISO-8601 publish timestamp.
    #[serde(default)]
    pub time: HashMap<String, String>,
    /// Plugin-introspection metadata. Its absence means the package cannot
    /// be explored by this tool and is rejected at bootstrap.
    #[serde(default)]
    pub oclif: Option<serde_json::Value>,
}

/// Metadata for a single published version, resolved on demand.
///
/// Owned by the fetch worker while the lookup runs and handed to the session
/// as an immutable snapshot once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDetails {
    /// The version this record describes.
    pub version: String,
    /// Publish timestamp from the packument `time` map, when parseable.
    pub published: Option<DateTime<Utc>>,
    /// Full commit hash the release was built from (may be empty).
    pub git_head: String,
    /// Raw repository URL as declared in the manifest (may be malformed).
    pub repository_url: String,
    /// Registry tarball URL.
    pub tarball: String,
    /// Unpacked size in bytes, if the registry reported one.
    pub unpacked_size: Option<u64>,
    /// Direct dependencies, name to version range, sorted by name.
    pub dependencies: Vec<(String, String)>,
    /// Declared ahead-of-time plugin dependency names.
    pub plugins: Vec<String>,
    /// Declared just-in-time plugins, name to version, sorted by name.
    pub jit_plugins: Vec<(String, String)>,
    /// Node engine constraint, if declared.
    pub engines_node: String,
}

/// Search query sent to the debounce worker.
#[derive(Clone, Debug)]
pub struct QueryInput {
    /// Monotonic identifier used to correlate responses.
    pub id: u64,
    /// Raw query text entered by the user.
    pub text: String,
}

/// Filtered catalog projection corresponding to a prior [`QueryInput`].
#[derive(Clone, Debug)]
pub struct FilterResults {
    /// Echoed identifier from the originating query.
    pub id: u64,
    /// Matching versions in descending semver order.
    pub options: Vec<VersionOption>,
}

/// One selectable row in the version list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionOption {
    /// Display label: the version plus its short-form publish date.
    pub label: String,
    /// The bare version string.
    pub value: String,
}

/// Ticketed detail request sent to the fetch worker.
///
/// The ticket is compared against the latest issued one when the response
/// arrives; anything older is discarded unapplied.
#[derive(Clone, Debug)]
pub struct DetailRequest {
    /// Monotonic ticket identifying the request.
    pub ticket: u64,
    /// Target version to look up.
    pub version: String,
}

/// Outcome of a detail fetch, echoing the originating ticket.
#[derive(Clone, Debug)]
pub struct DetailResponse {
    /// Echoed ticket from the originating [`DetailRequest`].
    pub ticket: u64,
    /// Version the lookup targeted.
    pub version: String,
    /// Resolved metadata, or a human-readable failure description.
    pub result: Result<VersionDetails, String>,
}

/// Which interactive surface currently receives keyboard input.
///
/// Exactly one surface is focused at any instant; the transition rules live
/// in [`crate::events::advance_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The search text input.
    Search,
    /// The selectable version list.
    Select,
}

/// Level of detail shown for the selected version.
///
/// Both blocks are computed from the same [`VersionDetails`] snapshot, so
/// toggling never refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Title, publish dates, commit, tarball, size, and declared plugins.
    Truncated,
    /// Everything in the truncated block plus JIT plugins, remaining
    /// dependencies, and engine constraints.
    Full,
}

/// Global session state owned by the event loop.
///
/// The renderer consumes this as a consistent snapshot each frame; channel
/// continuations re-validate their tickets against the counters here before
/// mutating anything.
#[derive(Debug)]
pub struct AppState {
    /// Canonical npm package name being explored.
    pub package: String,
    /// Friendly-name scope stripped from plugin dependency names.
    pub scope: Option<String>,

    /// Current search input text.
    pub input: String,
    /// Filtered version options, newest first.
    pub options: Vec<VersionOption>,
    /// Index into `options` that is currently highlighted.
    pub selected: usize,
    /// Version whose details the pane is committed to, if any.
    pub selection: Option<String>,
    /// List widget selection state for the version list.
    pub list_state: ListState,

    /// Which surface has keyboard focus.
    pub focus: Focus,
    /// Which detail block variant is shown.
    pub display_mode: DisplayMode,
    /// Text currently shown in the detail pane.
    pub text: String,
    /// Precomputed truncated block for the resolved selection.
    pub truncated_block: Option<String>,
    /// Precomputed full block for the resolved selection.
    pub full_block: Option<String>,

    /// Identifier of the latest query whose results may be applied.
    pub latest_query_id: u64,
    /// Next query identifier to allocate.
    pub next_query_id: u64,
    /// Ticket of the latest detail request; older responses are stale.
    pub latest_ticket: u64,
    /// Next detail ticket to allocate.
    pub next_ticket: u64,
}

impl AppState {
    /// Construct the initial session state for `package`.
    ///
    /// Focus starts on the search field, the display mode is truncated, and
    /// the detail pane shows the idle message until a version is chosen.
    pub fn new(package: String, scope: Option<String>) -> Self {
        Self {
            package,
            scope,
            input: String::new(),
            options: Vec::new(),
            selected: 0,
            selection: None,
            list_state: ListState::default(),
            focus: Focus::Search,
            display_mode: DisplayMode::Truncated,
            text: IDLE_MESSAGE.to_string(),
            truncated_block: None,
            full_block: None,
            latest_query_id: 0,
            next_query_id: 1,
            latest_ticket: 0,
            next_ticket: 1,
        }
    }

    /// The stored detail block matching the active display mode, if the
    /// current selection has resolved.
    pub fn block_for_mode(&self) -> Option<&String> {
        match self.display_mode {
            DisplayMode::Truncated => self.truncated_block.as_ref(),
            DisplayMode::Full => self.full_block.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_idle_in_search_focus() {
        let app = AppState::new("mycli".into(), None);
        assert_eq!(app.focus, Focus::Search);
        assert_eq!(app.display_mode, DisplayMode::Truncated);
        assert_eq!(app.text, IDLE_MESSAGE);
        assert!(app.selection.is_none());
        assert!(app.block_for_mode().is_none());
    }

    #[test]
    fn packument_tolerates_missing_optional_fields() {
        let doc: Packument =
            serde_json::from_str(r#"{"name":"mycli"}"#).expect("minimal packument parses");
        assert_eq!(doc.name, "mycli");
        assert!(doc.versions.is_empty());
        assert!(doc.time.is_empty());
        assert!(doc.oclif.is_none());
    }
}
