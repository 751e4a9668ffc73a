//! Small JSON extraction helpers shared by the registry parsing code.

use serde_json::Value;

/// Extract a string field, defaulting to empty when absent or non-string.
pub fn s(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Extract the first present string field among `keys`.
pub fn ss(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str()) {
            return Some(s.to_owned());
        }
    }
    None
}

/// Extract an array of strings from the first present key, skipping
/// non-string elements.
pub fn arrs(v: &Value, keys: &[&str]) -> Vec<String> {
    for k in keys {
        if let Some(arr) = v.get(*k).and_then(|x| x.as_array()) {
            return arr
                .iter()
                .filter_map(|e| e.as_str().map(|s| s.to_owned()))
                .collect();
        }
    }
    Vec::new()
}

/// Extract an unsigned integer, accepting signed and stringified forms.
pub fn u64_of(v: &Value, keys: &[&str]) -> Option<u64> {
    for k in keys {
        if let Some(n) = v.get(*k) {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            if let Some(i) = n.as_i64()
                && let Ok(u) = u64::try_from(i)
            {
                return Some(u);
            }
            if let Some(s) = n.as_str()
                && let Ok(p) = s.parse::<u64>()
            {
                return Some(p);
            }
        }
    }
    None
}

/// Extract a string-to-string object as name-sorted pairs.
///
/// Non-string values are skipped; a missing or non-object field yields an
/// empty list rather than an error.
pub fn smap(v: &Value, key: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = v
        .get(key)
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, val)| val.as_str().map(|s| (k.clone(), s.to_owned())))
                .collect()
        })
        .unwrap_or_default();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

/// Walk a path of object keys, returning the value at the end if every
/// segment is present.
pub fn nested<'a>(v: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = v;
    for seg in path {
        cur = cur.get(*seg)?;
    }
    Some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_array_extractors() {
        let v: Value = serde_json::json!({
            "a": "str",
            "b": ["x", 1, "y"],
            "c": 42u64,
            "d": -5,
            "e": "123",
        });
        assert_eq!(s(&v, "a"), "str");
        assert_eq!(s(&v, "missing"), "");
        assert_eq!(ss(&v, &["z", "a"]).as_deref(), Some("str"));
        assert_eq!(arrs(&v, &["b", "missing"]), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(u64_of(&v, &["c"]), Some(42));
        assert_eq!(u64_of(&v, &["d"]), None); // negative not convertible
        assert_eq!(u64_of(&v, &["e"]), Some(123));
        assert_eq!(u64_of(&v, &["missing"]), None);
    }

    #[test]
    fn smap_sorts_by_name_and_skips_non_strings() {
        let v: Value = serde_json::json!({
            "deps": {"zeta": "^1.0.0", "alpha": "~2.0.0", "broken": 7}
        });
        assert_eq!(
            smap(&v, "deps"),
            vec![
                ("alpha".to_string(), "~2.0.0".to_string()),
                ("zeta".to_string(), "^1.0.0".to_string()),
            ]
        );
        assert!(smap(&v, "missing").is_empty());
    }

    #[test]
    fn nested_walks_object_paths() {
        let v: Value = serde_json::json!({"dist": {"tarball": "https://x/t.tgz"}});
        assert_eq!(
            nested(&v, &["dist", "tarball"]).and_then(Value::as_str),
            Some("https://x/t.tgz")
        );
        assert!(nested(&v, &["dist", "missing"]).is_none());
    }
}
