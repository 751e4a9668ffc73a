//! Version catalog: the full set of published versions with publish
//! timestamps, ordered by semantic-version precedence.
//!
//! The catalog is built once from the bootstrap packument and never mutated
//! afterwards; [`VersionCatalog::filter`] produces fresh projections for the
//! list widget. Identical inputs always yield identical output.

use chrono::{DateTime, Utc};
use semver::Version;

use crate::format::short_date;
use crate::state::{Packument, VersionOption};

/// One catalog row: a version string, its parsed semver form, and its
/// publish timestamp when the packument carried one.
#[derive(Debug, Clone)]
struct CatalogEntry {
    /// Version string exactly as published.
    version: String,
    /// Parsed form used for ordering.
    parsed: Version,
    /// Publish timestamp from the packument `time` map.
    published: Option<DateTime<Utc>>,
}

/// Immutable, semver-descending set of published versions.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    /// Entries sorted newest-first by semver precedence.
    entries: Vec<CatalogEntry>,
}

impl VersionCatalog {
    /// Build the catalog from a bootstrap packument.
    ///
    /// Versions that fail to parse as semantic versions have no defined
    /// position in the ordering and are dropped with a debug log entry.
    pub fn from_packument(doc: &Packument) -> Self {
        let mut entries: Vec<CatalogEntry> = doc
            .versions
            .iter()
            .filter_map(|v| match Version::parse(v) {
                Ok(parsed) => Some(CatalogEntry {
                    version: v.clone(),
                    parsed,
                    published: doc
                        .time
                        .get(v)
                        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                        .map(|t| t.with_timezone(&Utc)),
                }),
                Err(e) => {
                    tracing::debug!(version = %v, error = %e, "skipping unparseable version");
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| b.parsed.cmp(&a.parsed));
        Self { entries }
    }

    /// Number of versions in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no versions at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produce the filtered, labeled projection for `query`.
    ///
    /// An empty query returns the full catalog. A query that parses as a
    /// number keeps versions whose string form starts with the query
    /// literal; any other query keeps versions containing it as a
    /// case-sensitive substring. Descending semver order is preserved in
    /// every projection.
    pub fn filter(&self, query: &str) -> Vec<VersionOption> {
        self.entries
            .iter()
            .filter(|e| matches_query(query, &e.version))
            .map(|e| VersionOption {
                label: match e.published {
                    Some(t) => format!("{} {}", e.version, short_date(t)),
                    None => e.version.clone(),
                },
                value: e.version.clone(),
            })
            .collect()
    }
}

/// Filtering policy for a single version string.
///
/// Numeric queries are prefix searches on version components ("2" matches
/// "2.0.0" but not "1.2.0"); everything else is a substring search.
fn matches_query(query: &str, version: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    if query.trim().parse::<f64>().is_ok() {
        version.starts_with(query)
    } else {
        version.contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn catalog(versions: &[&str]) -> VersionCatalog {
        let mut time = HashMap::new();
        for (i, v) in versions.iter().enumerate() {
            time.insert(
                (*v).to_string(),
                format!("2024-01-{:02}T12:00:00.000Z", i + 1),
            );
        }
        VersionCatalog::from_packument(&Packument {
            name: "mycli".into(),
            versions: versions.iter().map(|v| (*v).to_string()).collect(),
            time,
            oclif: None,
        })
    }

    fn values(options: &[VersionOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_full_catalog_newest_first() {
        let cat = catalog(&["1.2.0", "2.0.0", "2.0.0-beta.1", "10.0.0"]);
        assert_eq!(
            values(&cat.filter("")),
            vec!["10.0.0", "2.0.0", "2.0.0-beta.1", "1.2.0"]
        );
    }

    #[test]
    fn numeric_query_is_a_prefix_search() {
        let cat = catalog(&["1.2.0", "2.0.0", "2.0.0-beta.1", "10.0.0"]);
        // "10.0.0" starts with "1" but not with "2"; "1.2.0" contains a 2
        // yet does not start with it.
        assert_eq!(values(&cat.filter("2")), vec!["2.0.0", "2.0.0-beta.1"]);
    }

    #[test]
    fn non_numeric_query_is_a_substring_search() {
        let cat = catalog(&["1.2.0", "2.0.0", "2.0.0-beta.1", "10.0.0"]);
        assert_eq!(values(&cat.filter("beta")), vec!["2.0.0-beta.1"]);
    }

    #[test]
    fn filter_output_is_a_subsequence_of_the_full_ordering() {
        let cat = catalog(&["3.1.4", "0.9.0", "2.0.0", "2.1.0", "10.0.0"]);
        let full_filter = cat.filter("");
        let full = values(&full_filter);
        for query in ["2", "1", "0", ".", "x"] {
            let filtered = cat.filter(query);
            let mut cursor = 0usize;
            for opt in &filtered {
                let pos = full[cursor..]
                    .iter()
                    .position(|v| *v == opt.value)
                    .expect("filtered option present in full ordering");
                cursor += pos + 1;
            }
        }
    }

    #[test]
    fn no_match_yields_an_empty_projection() {
        let cat = catalog(&["1.0.0", "2.0.0"]);
        assert!(cat.filter("zzz").is_empty());
    }

    #[test]
    fn labels_carry_short_publish_dates() {
        let cat = catalog(&["1.0.0"]);
        let opts = cat.filter("");
        assert_eq!(opts[0].label, "1.0.0 Jan 1, 2024");
        assert_eq!(opts[0].value, "1.0.0");
    }

    #[test]
    fn unparseable_versions_are_dropped_at_construction() {
        let cat = catalog(&["1.0.0", "not-a-version", "2.0.0"]);
        assert_eq!(cat.len(), 2);
        assert_eq!(values(&cat.filter("")), vec!["2.0.0", "1.0.0"]);
    }
}
