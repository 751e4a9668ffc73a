//! Registry lookups via the `npm` CLI.
//!
//! All metadata comes from `npm view <spec> --json --registry <url>` run as
//! a subprocess; stdout is parsed with `serde_json`. The subprocess runs on
//! the blocking pool so the event loop never stalls on the network.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::state::{Packument, VersionDetails};
use crate::util::{arrs, nested, s, smap, ss, u64_of};

/// Boxed error alias used throughout the networking layer.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Verify that the `npm` binary is reachable on `PATH`.
///
/// Called once at bootstrap so a missing toolchain fails with a clear
/// message instead of a per-fetch subprocess error.
pub fn ensure_npm() -> Result<()> {
    which::which("npm")
        .map(|_| ())
        .map_err(|e| format!("npm executable not found on PATH: {e}").into())
}

/// Map an `npm view` failure to a user-facing message.
///
/// npm reports registry errors on stderr with `Exxx` codes rather than
/// distinct exit statuses, so the mapping inspects the captured stderr.
fn map_npm_error(stderr: &str, status: &std::process::ExitStatus) -> String {
    if stderr.contains("E404") {
        "package or version not found in the registry".to_string()
    } else if stderr.contains("ENOTFOUND") || stderr.contains("EAI_AGAIN") {
        "could not resolve registry host (DNS/network issue)".to_string()
    } else if stderr.contains("ETIMEDOUT") || stderr.contains("ECONNRESET") {
        "registry connection failed or timed out".to_string()
    } else {
        let last = stderr.lines().rev().find(|l| !l.trim().is_empty());
        match last {
            Some(line) => format!("npm view failed: {}", line.trim()),
            None => format!("npm view failed: {status:?}"),
        }
    }
}

/// Run `npm view <spec> --json` against `registry` and parse the body.
fn npm_view_json(registry: &str, spec: &str) -> Result<Value> {
    let out = std::process::Command::new("npm")
        .args(["view", spec, "--json", "--registry", registry])
        .output()
        .map_err(|e| format!("npm failed to execute: {e} (is npm installed and in PATH?)"))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(map_npm_error(&stderr, &out.status).into());
    }
    let body = String::from_utf8(out.stdout)?;
    let v: Value = serde_json::from_str(&body)?;
    Ok(v)
}

/// Fetch the full packument for `name` at bootstrap.
pub async fn fetch_packument(registry: &str, name: &str) -> Result<Packument> {
    let registry = registry.to_string();
    let name = name.to_string();
    let v = tokio::task::spawn_blocking(move || npm_view_json(&registry, &name)).await??;
    let doc: Packument = serde_json::from_value(v)?;
    Ok(doc)
}

/// Fetch the metadata record for one published version.
///
/// Runs to completion even when the caller has moved on; relevance is the
/// caller's staleness check, not a transport-level cancellation.
pub async fn fetch_version_details(
    registry: String,
    name: String,
    version: String,
) -> Result<VersionDetails> {
    let spec = format!("{name}@{version}");
    let reg = registry.clone();
    let v = tokio::task::spawn_blocking(move || npm_view_json(&reg, &spec)).await??;
    Ok(details_from_value(&v, &version))
}

/// Extract a [`VersionDetails`] snapshot from a per-version npm document.
///
/// Every field is optional at the wire level; absent or malformed values
/// degrade to empty fields rather than errors.
pub fn details_from_value(v: &Value, version: &str) -> VersionDetails {
    // A range spec can make npm return an array; the newest match is last.
    let v = match v.as_array() {
        Some(arr) => arr.last().unwrap_or(v),
        None => v,
    };
    let published = nested(v, &["time", version])
        .and_then(Value::as_str)
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc));
    let repository_url = match v.get("repository") {
        Some(Value::String(url)) => url.clone(),
        Some(obj) => ss(obj, &["url"]).unwrap_or_default(),
        None => String::new(),
    };
    let oclif = nested(v, &["oclif"]);
    VersionDetails {
        version: version.to_string(),
        published,
        git_head: s(v, "gitHead"),
        repository_url,
        tarball: nested(v, &["dist", "tarball"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        unpacked_size: v.get("dist").and_then(|d| u64_of(d, &["unpackedSize"])),
        dependencies: smap(v, "dependencies"),
        plugins: oclif.map(|o| arrs(o, &["plugins"])).unwrap_or_default(),
        jit_plugins: oclif.map(|o| smap(o, "jitPlugins")).unwrap_or_default(),
        engines_node: nested(v, &["engines", "node"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}
