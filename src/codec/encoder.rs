//! Codec-layer encoder (§4.1-§4.3): `value → normalize → fold → lines`.
//!
//! The public entry point is [`encode_lines_vec`], which realizes the lazy
//! line sequence described in the design notes as a materialized `Vec` —
//! cheaper to get right than a hand-rolled generator, and observationally
//! identical to a caller pulling one line at a time (recorded as an open
//! decision in the design notes).

use crate::codec::fold::fold_keys;
use crate::codec::normalize::normalize;
use crate::codec::options::{EncodeOptions, KeyFolding};
use crate::codec::quote::{canonical_float, quote_if_needed};
use crate::value::Number;
use crate::{Delimiter, ToonMap, ToonValue};

pub fn encode_lines_vec(value: &ToonValue, options: &EncodeOptions) -> Vec<String> {
    let normalized = normalize(value);
    let materialized = materialize_tables(&normalized);
    let prepared = match options.key_folding {
        KeyFolding::Off => materialized,
        KeyFolding::Safe => {
            tracing::trace!(flatten_depth = ?options.flatten_depth, "folding single-key object chains");
            fold_keys(&materialized, options.flatten_depth)
        }
    };
    let mut lines = Vec::new();
    emit_root(&prepared, options, &mut lines);
    lines
}

fn materialize_tables(value: &ToonValue) -> ToonValue {
    match value {
        ToonValue::Table { headers, rows } => {
            let elements = rows
                .iter()
                .map(|row| {
                    let mut map = ToonMap::new();
                    for (h, v) in headers.iter().zip(row.iter()) {
                        map.insert(h.clone(), materialize_tables(v));
                    }
                    ToonValue::Object(map)
                })
                .collect();
            ToonValue::Array(elements)
        }
        ToonValue::Array(arr) => ToonValue::Array(arr.iter().map(materialize_tables).collect()),
        ToonValue::Object(obj) => {
            let mut out = ToonMap::new();
            for (k, v) in obj.iter() {
                out.insert(k.clone(), materialize_tables(v));
            }
            ToonValue::Object(out)
        }
        other => other.clone(),
    }
}

fn delim_char(d: &Delimiter) -> char {
    d.as_str().chars().next().expect("Delimiter::as_str is never empty")
}

fn indent_str(options: &EncodeOptions, level: usize) -> String {
    " ".repeat(options.indent * level)
}

fn format_key(key: &str, delim: char) -> String {
    quote_if_needed(key, delim)
}

fn format_primitive(value: &ToonValue, delim: char) -> String {
    match value {
        ToonValue::Null => "null".to_string(),
        ToonValue::Bool(b) => b.to_string(),
        ToonValue::Number(Number::Integer(i)) => i.to_string(),
        ToonValue::Number(Number::Float(f)) => canonical_float(*f),
        ToonValue::Number(_) => "null".to_string(),
        ToonValue::String(s) => quote_if_needed(s, delim),
        _ => unreachable!("tables/dates/bigints are removed before encoding"),
    }
}

fn is_primitive_value(v: &ToonValue) -> bool {
    matches!(v, ToonValue::Null | ToonValue::Bool(_) | ToonValue::Number(_) | ToonValue::String(_))
}

enum ArrayForm {
    Empty,
    Inline,
    Tabular { fields: Vec<String>, rows: Vec<Vec<ToonValue>> },
    List,
}

fn classify_array(elements: &[ToonValue]) -> ArrayForm {
    if elements.is_empty() {
        return ArrayForm::Empty;
    }
    if elements.iter().all(is_primitive_value) {
        return ArrayForm::Inline;
    }
    if let Some((fields, rows)) = try_tabular(elements) {
        return ArrayForm::Tabular { fields, rows };
    }
    ArrayForm::List
}

fn try_tabular(elements: &[ToonValue]) -> Option<(Vec<String>, Vec<Vec<ToonValue>>)> {
    let first_obj = match &elements[0] {
        ToonValue::Object(m) => m,
        _ => return None,
    };
    let field_names: Vec<String> = first_obj.keys().cloned().collect();
    if field_names.is_empty() {
        return None;
    }
    let mut rows = Vec::with_capacity(elements.len());
    for el in elements {
        let obj = match el {
            ToonValue::Object(m) => m,
            _ => return None,
        };
        if obj.len() != field_names.len() {
            return None;
        }
        let mut row = Vec::with_capacity(field_names.len());
        for name in &field_names {
            let v = obj.get(name)?;
            if !is_primitive_value(v) {
                return None;
            }
            row.push(v.clone());
        }
        rows.push(row);
    }
    Some((field_names, rows))
}

fn emit_root(value: &ToonValue, options: &EncodeOptions, lines: &mut Vec<String>) {
    match value {
        ToonValue::Object(map) => {
            for (k, v) in map.iter() {
                emit_object_field(k, v, options, 0, lines);
            }
        }
        ToonValue::Array(elements) => emit_array(None, elements, options, 0, lines),
        primitive => lines.push(format_primitive(primitive, delim_char(&options.delimiter))),
    }
}

fn emit_object_field(key: &str, value: &ToonValue, options: &EncodeOptions, level: usize, lines: &mut Vec<String>) {
    let delim = delim_char(&options.delimiter);
    match value {
        ToonValue::Array(elements) => emit_array(Some(key), elements, options, level, lines),
        ToonValue::Object(map) => {
            let indent = indent_str(options, level);
            let key_tok = format_key(key, delim);
            lines.push(format!("{indent}{key_tok}:"));
            for (k, v) in map.iter() {
                emit_object_field(k, v, options, level + 1, lines);
            }
        }
        primitive => {
            let indent = indent_str(options, level);
            let key_tok = format_key(key, delim);
            lines.push(format!("{indent}{key_tok}: {}", format_primitive(primitive, delim)));
        }
    }
}

fn emit_array(key: Option<&str>, elements: &[ToonValue], options: &EncodeOptions, level: usize, lines: &mut Vec<String>) {
    let indent = indent_str(options, level);
    let delim = delim_char(&options.delimiter);
    let key_part = key.map(|k| format_key(k, delim)).unwrap_or_default();
    let n = elements.len();
    match classify_array(elements) {
        ArrayForm::Empty => lines.push(format!("{indent}{key_part}[0]:")),
        ArrayForm::Inline => {
            let tokens: Vec<String> = elements.iter().map(|v| format_primitive(v, delim)).collect();
            lines.push(format!("{indent}{key_part}[{n}]: {}", tokens.join(&delim.to_string())));
        }
        ArrayForm::Tabular { fields, rows } => emit_tabular_body(&key_part, &fields, &rows, options, level, lines),
        ArrayForm::List => {
            lines.push(format!("{indent}{key_part}[{n}]:"));
            for el in elements {
                emit_list_entry(el, options, level + 1, lines);
            }
        }
    }
}

fn emit_tabular_body(
    key_part: &str,
    fields: &[String],
    rows: &[Vec<ToonValue>],
    options: &EncodeOptions,
    level: usize,
    lines: &mut Vec<String>,
) {
    let indent = indent_str(options, level);
    let delim = delim_char(&options.delimiter);
    let n = rows.len();
    let header_fields = fields.iter().map(|f| format_key(f, delim)).collect::<Vec<_>>().join(&delim.to_string());
    lines.push(format!("{indent}{key_part}[{n}]{{{header_fields}}}:"));
    let row_indent = indent_str(options, level + 1);
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format_primitive(v, delim)).collect();
        lines.push(format!("{row_indent}{}", cells.join(&delim.to_string())));
    }
}

fn emit_list_entry(value: &ToonValue, options: &EncodeOptions, level: usize, lines: &mut Vec<String>) {
    let indent = indent_str(options, level);
    let delim = delim_char(&options.delimiter);
    match value {
        ToonValue::Object(map) => {
            if map.is_empty() {
                lines.push(format!("{indent}-"));
                return;
            }
            let mut iter = map.iter();
            let (first_key, first_val) = iter.next().expect("checked non-empty");
            let first_key_tok = format_key(first_key, delim);
            match first_val {
                ToonValue::Array(elements) => emit_list_array_field(&indent, &first_key_tok, elements, options, level, lines),
                ToonValue::Object(inner) => {
                    lines.push(format!("{indent}- {first_key_tok}:"));
                    for (k, v) in inner.iter() {
                        emit_object_field(k, v, options, level + 2, lines);
                    }
                }
                primitive => lines.push(format!("{indent}- {first_key_tok}: {}", format_primitive(primitive, delim))),
            }
            for (k, v) in iter {
                emit_object_field(k, v, options, level + 1, lines);
            }
        }
        ToonValue::Array(elements) => emit_list_array_field(&indent, "", elements, options, level, lines),
        primitive => lines.push(format!("{indent}- {}", format_primitive(primitive, delim))),
    }
}

fn emit_list_array_field(
    indent: &str,
    key_part: &str,
    elements: &[ToonValue],
    options: &EncodeOptions,
    level: usize,
    lines: &mut Vec<String>,
) {
    let delim = delim_char(&options.delimiter);
    let n = elements.len();
    match classify_array(elements) {
        ArrayForm::Empty => lines.push(format!("{indent}- {key_part}[0]:")),
        ArrayForm::Inline => {
            let tokens: Vec<String> = elements.iter().map(|v| format_primitive(v, delim)).collect();
            lines.push(format!("{indent}- {key_part}[{n}]: {}", tokens.join(&delim.to_string())));
        }
        ArrayForm::Tabular { fields, rows } => {
            let header_fields = fields.iter().map(|f| format_key(f, delim)).collect::<Vec<_>>().join(&delim.to_string());
            lines.push(format!("{indent}- {key_part}[{n}]{{{header_fields}}}:"));
            let row_indent = " ".repeat(options.indent * (level + 2));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|v| format_primitive(v, delim)).collect();
                lines.push(format!("{row_indent}{}", cells.join(&delim.to_string())));
            }
        }
        ArrayForm::List => {
            lines.push(format!("{indent}- {key_part}[{n}]:"));
            for el in elements {
                emit_list_entry(el, options, level + 2, lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    fn obj(pairs: Vec<(&str, ToonValue)>) -> ToonValue {
        let mut map = ToonMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v);
        }
        ToonValue::Object(map)
    }

    #[test]
    fn encodes_flat_object() {
        let value = obj(vec![("name", ToonValue::from("Alice")), ("age", ToonValue::Number(Number::Integer(30)))]);
        let lines = encode_lines_vec(&value, &EncodeOptions::default());
        assert_eq!(lines, vec!["name: Alice".to_string(), "age: 30".to_string()]);
    }

    #[test]
    fn encodes_inline_primitive_array() {
        let value = obj(vec![("tags", ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")]))]);
        let lines = encode_lines_vec(&value, &EncodeOptions::default());
        assert_eq!(lines, vec!["tags[2]: a,b".to_string()]);
    }

    #[test]
    fn encodes_tabular_array_of_uniform_objects() {
        let row = |sku: &str, qty: i64| obj(vec![("sku", ToonValue::from(sku)), ("qty", ToonValue::Number(Number::Integer(qty)))]);
        let value = obj(vec![("items", ToonValue::Array(vec![row("A1", 2), row("B2", 5)]))]);
        let lines = encode_lines_vec(&value, &EncodeOptions::default());
        assert_eq!(lines[0], "items[2]{sku,qty}:");
        assert_eq!(lines[1], "  A1,2");
        assert_eq!(lines[2], "  B2,5");
    }

    #[test]
    fn encodes_mixed_list_array() {
        let value = obj(vec![(
            "items",
            ToonValue::Array(vec![ToonValue::from("a"), obj(vec![("x", ToonValue::Number(Number::Integer(1)))])]),
        )]);
        let lines = encode_lines_vec(&value, &EncodeOptions::default());
        assert_eq!(lines[0], "items[2]:");
        assert_eq!(lines[1], "  - a");
        assert_eq!(lines[2], "  - x: 1");
    }
}
