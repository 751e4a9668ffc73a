//! Pure display formatting for the detail pane.
//!
//! Everything here is a stateless function from resolved metadata to text.
//! The truncated and full blocks are both computed as soon as a detail
//! record resolves, so the display-mode toggle is a plain swap.

use chrono::{DateTime, Local, Utc};

use crate::state::VersionDetails;

/// Placeholder rendered when a field the block names is absent.
const UNKNOWN: &str = "unknown";

/// Short-form date used in version list labels, e.g. `Jan 5, 2024`.
pub fn short_date(t: DateTime<Utc>) -> String {
    t.format("%b %-d, %Y").to_string()
}

/// Publish date rendered in the machine's local timezone,
/// e.g. `Fri, January 5, 2024, 3:04 PM +01:00`.
pub fn locale_date(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local)
        .format("%a, %B %-d, %Y, %-I:%M %p %:z")
        .to_string()
}

/// Publish date rendered as a UTC string, e.g. `Fri, 05 Jan 2024 15:04:05 GMT`.
pub fn utc_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Convert a byte count to megabytes with two decimal places, trailing
/// zeros trimmed, and an `mb` suffix.
pub fn bytes_to_mb(bytes: u64) -> String {
    let mb = bytes as f64 / 1_048_576.0;
    let mut s = format!("{mb:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    format!("{s}mb")
}

/// Derive the friendly display name for a plugin dependency.
///
/// Strips the `@<scope>/plugin-` prefix when the configured scope matches;
/// any other name passes through unchanged.
pub fn friendly_name(name: &str, scope: Option<&str>) -> String {
    if let Some(scope) = scope
        && let Some(rest) = name.strip_prefix(&format!("@{scope}/plugin-"))
        && !rest.is_empty()
    {
        return rest.to_string();
    }
    name.to_string()
}

/// Normalize a repository URL into `https://<host><path>` with any `git+`
/// scheme prefix and `.git` suffix removed.
///
/// Returns `None` for strings that do not look like URLs (e.g. ssh
/// shorthand), which the commit line degrades around.
pub fn normalize_repo_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("git+").unwrap_or(trimmed);
    let (_, rest) = trimmed.split_once("://")?;
    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let (host, path) = match rest.split_once('/') {
        Some((h, p)) => (h, format!("/{p}")),
        None => (rest, String::new()),
    };
    if host.is_empty() {
        return None;
    }
    Some(format!("https://{host}{path}"))
}

/// The commit line: a short hash plus the commit URL when the repository
/// URL is well-formed, the hash alone otherwise.
fn commit_line(d: &VersionDetails) -> String {
    if d.git_head.is_empty() {
        return format!("Commit {UNKNOWN}");
    }
    let short: String = d.git_head.chars().take(7).collect();
    match normalize_repo_url(&d.repository_url) {
        Some(base) => format!("Commit {short} {base}/commit/{}", d.git_head),
        None => format!("Commit {short}"),
    }
}

/// Append a named list section to `out`, keeping the heading even when the
/// list is empty.
fn push_section(out: &mut String, heading: &str, lines: &[String]) {
    out.push('\n');
    out.push_str(heading);
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
}

/// Declared ahead-of-time plugins as display lines, sorted by name.
fn plugin_lines(d: &VersionDetails, scope: Option<&str>) -> Vec<String> {
    let mut names = d.plugins.clone();
    names.sort();
    names
        .iter()
        .map(|name| {
            let friendly = friendly_name(name, scope);
            let version = d
                .dependencies
                .iter()
                .find(|(dep, _)| dep == name)
                .map(|(_, range)| range.as_str())
                .unwrap_or_default();
            if version.is_empty() {
                format!("{friendly} (core)")
            } else {
                format!("{friendly} {version} (core)")
            }
        })
        .collect()
}

/// Build the truncated detail block: title, publish dates, commit, tarball,
/// unpacked size, and the declared-plugin list.
pub fn truncated_block(d: &VersionDetails, display_name: &str, scope: Option<&str>) -> String {
    let (locale, utc) = match d.published {
        Some(t) => (locale_date(t), utc_date(t)),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };
    let tarball = if d.tarball.is_empty() {
        UNKNOWN.to_string()
    } else {
        d.tarball.clone()
    };
    let size = d.unpacked_size.map_or_else(|| UNKNOWN.to_string(), bytes_to_mb);

    let mut out = format!(
        "{display_name}@{version}\nLocale publish date {locale}\nUTC publish date {utc}\n{commit}\nTarball {tarball}\nUnpacked Size {size}",
        version = d.version,
        commit = commit_line(d),
    );
    push_section(&mut out, "Plugins", &plugin_lines(d, scope));
    out
}

/// Build the full detail block: the truncated block plus just-in-time
/// plugins, remaining direct dependencies, and engine constraints.
pub fn full_block(d: &VersionDetails, display_name: &str, scope: Option<&str>) -> String {
    let mut out = truncated_block(d, display_name, scope);

    let jit: Vec<String> = d
        .jit_plugins
        .iter()
        .map(|(name, version)| format!("{} {version} (jit)", friendly_name(name, scope)))
        .collect();
    push_section(&mut out, "JIT Plugins", &jit);

    let deps: Vec<String> = d
        .dependencies
        .iter()
        .filter(|(name, _)| !d.plugins.contains(name))
        .map(|(name, range)| format!("{name} {range}"))
        .collect();
    push_section(&mut out, "Dependencies", &deps);

    let engines: Vec<String> = if d.engines_node.is_empty() {
        Vec::new()
    } else {
        vec![format!("node {}", d.engines_node)]
    };
    push_section(&mut out, "Engines", &engines);
    out
}
