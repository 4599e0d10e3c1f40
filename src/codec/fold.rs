//! Key folding (encode-time) and path expansion (decode-time) — §4.3/§4.6.
//!
//! Folding collapses a chain of single-key objects, `{a: {b: {c: V}}}`, into
//! one key `"a.b.c"` with value `V`. Expansion is the inverse, applied after
//! the value tree is fully materialized (never during streaming — see §9).

use crate::{Error, Result, ToonMap, ToonValue};

/// Returns `true` if `key` is safe to participate in folding/expansion: no
/// dot, no whitespace, and no character that would otherwise require quoting.
fn is_foldable_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains('.')
        && !key.chars().any(char::is_whitespace)
        && !crate::codec::quote::needs_quotes(key, ',')
}

/// Folds `value`'s object chains according to `flatten_depth` (`None` = unbounded).
/// Only objects are folded; arrays terminate a chain (the array itself is kept as-is
/// at the folded key), matching §4.3's array-terminal case.
#[must_use]
pub fn fold_keys(value: &ToonValue, flatten_depth: Option<usize>) -> ToonValue {
    match value {
        ToonValue::Object(obj) => {
            let mut out = ToonMap::new();
            for (key, v) in obj.iter() {
                let (folded_key, folded_value) = fold_chain(key.clone(), v, flatten_depth, 1);
                out.insert(folded_key, folded_value);
            }
            ToonValue::Object(out)
        }
        ToonValue::Array(arr) => {
            ToonValue::Array(arr.iter().map(|v| fold_keys(v, flatten_depth)).collect())
        }
        other => other.clone(),
    }
}

fn fold_chain(
    prefix: String,
    value: &ToonValue,
    flatten_depth: Option<usize>,
    depth: usize,
) -> (String, ToonValue) {
    if let Some(max) = flatten_depth {
        if depth >= max {
            return (prefix, fold_keys(value, flatten_depth));
        }
    }

    if let ToonValue::Object(obj) = value {
        if obj.len() == 1 {
            let (only_key, only_value) = obj.iter().next().expect("len == 1 has one entry");
            if is_foldable_key(only_key) {
                let new_prefix = format!("{}.{}", prefix, only_key);
                return fold_chain(new_prefix, only_value, flatten_depth, depth + 1);
            }
        }
    }

    (prefix, fold_keys(value, flatten_depth))
}

/// Expands dotted keys back into nested objects. Only object keys are
/// expanded; array elements are never inspected for dots (§4.6).
pub fn expand_paths(value: &ToonValue, strict: bool) -> Result<ToonValue> {
    match value {
        ToonValue::Object(obj) => {
            let mut root = ToonValue::Object(ToonMap::new());
            for (key, v) in obj.iter() {
                let expanded_value = expand_paths(v, strict)?;
                let segments: Vec<&str> = key.split('.').collect();
                insert_path(&mut root, &segments, expanded_value, strict)?;
            }
            Ok(root)
        }
        ToonValue::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for v in arr {
                out.push(expand_paths(v, strict)?);
            }
            Ok(ToonValue::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn insert_path(
    root: &mut ToonValue,
    segments: &[&str],
    value: ToonValue,
    strict: bool,
) -> Result<()> {
    let ToonValue::Object(map) = root else {
        unreachable!("insert_path root is always constructed as Object")
    };

    let (head, rest) = segments
        .split_first()
        .expect("path always has at least one segment");

    if rest.is_empty() {
        match map.get(*head) {
            Some(ToonValue::Object(_)) if matches!(value, ToonValue::Object(_)) => {
                merge_object(map, head, value, strict)?;
            }
            Some(existing) if !matches!(existing, ToonValue::Object(_)) || !matches!(value, ToonValue::Object(_)) => {
                if strict && (matches!(existing, ToonValue::Object(_)) != matches!(value, ToonValue::Object(_))) {
                    return Err(Error::expansion_conflict(
                        head.to_string(),
                        kind_name(&value),
                    ));
                }
                map.insert(head.to_string(), value);
            }
            _ => {
                map.insert(head.to_string(), value);
            }
        }
        return Ok(());
    }

    let existing_is_object = matches!(map.get(*head), Some(ToonValue::Object(_)));
    let existing_is_non_object = map.get(*head).is_some() && !existing_is_object;

    if existing_is_non_object {
        if strict {
            return Err(Error::expansion_conflict(head.to_string(), "object"));
        }
        map.insert(head.to_string(), ToonValue::Object(ToonMap::new()));
    } else if !existing_is_object {
        map.insert(head.to_string(), ToonValue::Object(ToonMap::new()));
    }

    let mut child = map.get(*head).cloned().unwrap_or(ToonValue::Object(ToonMap::new()));
    insert_path(&mut child, rest, value, strict)?;
    map.insert(head.to_string(), child);
    Ok(())
}

fn merge_object(map: &mut ToonMap, key: &str, value: ToonValue, strict: bool) -> Result<()> {
    let ToonValue::Object(incoming) = value else {
        unreachable!("merge_object only called when value is Object")
    };
    let mut merged = match map.get(key) {
        Some(ToonValue::Object(existing)) => existing.clone(),
        _ => ToonMap::new(),
    };
    for (k, v) in incoming.iter() {
        merged.insert(k.clone(), v.clone());
    }
    let _ = strict;
    map.insert(key.to_string(), ToonValue::Object(merged));
    Ok(())
}

fn kind_name(value: &ToonValue) -> &'static str {
    match value {
        ToonValue::Object(_) => "object",
        ToonValue::Array(_) => "array",
        ToonValue::Null => "null",
        ToonValue::Bool(_) => "bool",
        ToonValue::Number(_) => "number",
        ToonValue::String(_) => "string",
        ToonValue::Table { .. } => "table",
        ToonValue::Date(_) => "date",
        ToonValue::BigInt(_) => "bigint",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    #[test]
    fn folds_single_key_chain() {
        let mut metadata = ToonMap::new();
        metadata.insert(
            "items".to_string(),
            ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")]),
        );
        let mut inner = ToonMap::new();
        inner.insert("metadata".to_string(), ToonValue::Object(metadata));
        let mut data = ToonMap::new();
        data.insert("data".to_string(), ToonValue::Object(inner));
        let root = ToonValue::Object(data);

        let folded = fold_keys(&root, None);
        let ToonValue::Object(obj) = folded else {
            panic!("expected object")
        };
        assert_eq!(obj.len(), 1);
        assert!(obj.get("data.metadata.items").is_some());
    }

    #[test]
    fn expands_dotted_keys() {
        let mut obj = ToonMap::new();
        obj.insert(
            "data.metadata.items".to_string(),
            ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")]),
        );
        let expanded = expand_paths(&ToonValue::Object(obj), true).unwrap();
        let ToonValue::Object(top) = expanded else {
            panic!("expected object")
        };
        let ToonValue::Object(data) = top.get("data").unwrap() else {
            panic!("expected nested object")
        };
        let ToonValue::Object(metadata) = data.get("metadata").unwrap() else {
            panic!("expected nested object")
        };
        assert!(metadata.get("items").unwrap().is_array());
    }

    #[test]
    fn expansion_conflict_is_strict() {
        let mut obj = ToonMap::new();
        obj.insert("a.b".to_string(), ToonValue::Number(Number::Integer(1)));
        obj.insert("a".to_string(), ToonValue::Number(Number::Integer(2)));
        let result = expand_paths(&ToonValue::Object(obj), true);
        assert!(result.is_err());
    }

    #[test]
    fn expansion_conflict_lenient_last_write_wins() {
        let mut obj = ToonMap::new();
        obj.insert("a".to_string(), ToonValue::Number(Number::Integer(1)));
        obj.insert("a.b".to_string(), ToonValue::Number(Number::Integer(2)));
        let expanded = expand_paths(&ToonValue::Object(obj), false).unwrap();
        let ToonValue::Object(top) = expanded else {
            panic!("expected object")
        };
        assert!(top.get("a").is_some());
    }
}
