//! Structural decoder (§4.5): turns a sequence of lines into a sequence of
//! [`ToonEvent`]s, without building a value tree. The event stream produced
//! here is what both [`crate::codec::decode_stream_sync`] and
//! [`crate::codec::decode_stream`] expose to callers, and what
//! [`crate::codec::builder`] consumes to materialize a [`ToonValue`].
//!
//! Nesting is walked with ordinary function recursion rather than an
//! explicit indent-stack machine: inputs are TOON documents, not untrusted
//! depth-adversarial payloads, so the simpler shape was chosen over a hand
//! rolled driver stack (recorded as an open decision in the design notes).

use crate::codec::line::{
    dash_rest, parse_header, parse_token_value, split_top_level, Header, Line,
};
use crate::codec::options::StreamDecodeOptions;
use crate::codec::{event::ToonEvent, line::split_lines};
use crate::{Error, Result};

/// Decodes `raw_lines` (already split, blank lines ignored) into a flat
/// event vector. On error, the vector contains every event emitted before
/// the failure followed by exactly one `Err`; no events are emitted after it.
pub fn decode_events(raw_lines: &[&str], opts: &StreamDecodeOptions) -> Vec<Result<ToonEvent>> {
    let filtered: Vec<&str> = raw_lines.iter().copied().filter(|l| !l.trim().is_empty()).collect();
    let mut events = Vec::new();
    let lines = match split_lines(&filtered, opts.indent) {
        Ok(lines) => lines,
        Err(e) => {
            events.push(Err(e));
            return events;
        }
    };
    if let Err(e) = decode_root(&lines, &mut events, opts) {
        events.push(Err(e));
    }
    events
}

fn decode_root(lines: &[Line], events: &mut Vec<Result<ToonEvent>>, opts: &StreamDecodeOptions) -> Result<()> {
    if lines.is_empty() {
        events.push(Ok(ToonEvent::StartObject));
        events.push(Ok(ToonEvent::EndObject));
        return Ok(());
    }
    let first = &lines[0];
    if first.indent != 0 {
        return Err(Error::indentation_error(first.line_no, 1, 0, first.indent, first.content));
    }
    if dash_rest(first.content).is_some() {
        return Err(Error::malformed_header(first.line_no, "unexpected list entry at document root"));
    }

    let mut idx = 0usize;
    match parse_header(first.content, first.line_no)? {
        Some(h) if h.key.is_none() && h.array_len.is_some() => {
            idx = 1;
            decode_array_with_header(lines, &mut idx, 0, &h, events, opts)?;
        }
        Some(h) if h.key.is_some() => {
            events.push(Ok(ToonEvent::StartObject));
            while idx < lines.len() {
                if lines[idx].indent != 0 {
                    return Err(Error::indentation_error(lines[idx].line_no, 1, 0, lines[idx].indent, lines[idx].content));
                }
                decode_object_entry(lines, &mut idx, 0, events, opts)?;
            }
            events.push(Ok(ToonEvent::EndObject));
        }
        Some(_) => return Err(Error::malformed_header(first.line_no, "empty header at document root")),
        None => {
            if lines.len() != 1 {
                return Err(Error::malformed_header(first.line_no, "unexpected trailing content after root primitive"));
            }
            let value = parse_token_value(first.content, first.line_no)?;
            events.push(Ok(ToonEvent::Primitive { value }));
            idx = 1;
        }
    }

    if idx != lines.len() {
        return Err(Error::malformed_header(lines[idx].line_no, "unexpected trailing content"));
    }
    Ok(())
}

/// Decodes one `key: ...` entry of an object body, starting at `lines[*idx]`
/// (whose own indent must equal `level`). Advances `*idx` past everything consumed.
fn decode_object_entry(
    lines: &[Line],
    idx: &mut usize,
    level: usize,
    events: &mut Vec<Result<ToonEvent>>,
    opts: &StreamDecodeOptions,
) -> Result<()> {
    let line = &lines[*idx];
    let line_no = line.line_no;
    let h = parse_header(line.content, line_no)?
        .ok_or_else(|| Error::malformed_header(line_no, format!("expected 'key:' header, found '{}'", line.content)))?;
    if h.key.is_none() {
        return Err(Error::malformed_header(line_no, "expected a key"));
    }
    *idx += 1;
    emit_key_and_value(&h, line_no, level, lines, idx, events, opts)
}

/// Pushes the `Key` event for `h` and whatever events its value requires.
/// `own_level` is the conceptual indent level of the line carrying `h` (used
/// to compute where a nested object/array body must sit).
fn emit_key_and_value(
    h: &Header,
    line_no: usize,
    own_level: usize,
    lines: &[Line],
    idx: &mut usize,
    events: &mut Vec<Result<ToonEvent>>,
    opts: &StreamDecodeOptions,
) -> Result<()> {
    let (key_text, was_quoted) = h.key.clone().expect("caller checked key is present");
    events.push(Ok(ToonEvent::Key { key: key_text, was_quoted }));
    if h.array_len.is_some() {
        decode_array_with_header(lines, idx, own_level, h, events, opts)
    } else if let Some(v) = &h.trailing {
        events.push(Ok(ToonEvent::Primitive { value: parse_token_value(v, line_no)? }));
        Ok(())
    } else if *idx < lines.len() && lines[*idx].indent > own_level {
        let child_level = lines[*idx].indent;
        if child_level != own_level + 1 {
            return Err(Error::indentation_error(lines[*idx].line_no, 1, own_level + 1, child_level, lines[*idx].content));
        }
        events.push(Ok(ToonEvent::StartObject));
        while *idx < lines.len() && lines[*idx].indent == child_level {
            decode_object_entry(lines, idx, child_level, events, opts)?;
        }
        events.push(Ok(ToonEvent::EndObject));
        Ok(())
    } else {
        events.push(Ok(ToonEvent::StartObject));
        events.push(Ok(ToonEvent::EndObject));
        Ok(())
    }
}

/// Decodes an array body (inline, list, or tabular) for a header whose own
/// line sits at `level`. Assumes the `StartArray` event has not yet been pushed.
fn decode_array_with_header(
    lines: &[Line],
    idx: &mut usize,
    level: usize,
    h: &Header,
    events: &mut Vec<Result<ToonEvent>>,
    opts: &StreamDecodeOptions,
) -> Result<()> {
    let len = h.array_len.expect("caller checked array_len is present");
    events.push(Ok(ToonEvent::StartArray { length: len }));
    tracing::trace!(declared_len = len, level, "decoding array body");

    if let Some(fields) = &h.fields {
        let delim = h.fields_delimiter.unwrap_or(',');
        let child_level = level + 1;
        let mut count = 0usize;
        while *idx < lines.len() && lines[*idx].indent == child_level {
            let row = &lines[*idx];
            let cells = split_row(row.content, delim, fields.len(), opts.strict, row.line_no)?;
            events.push(Ok(ToonEvent::StartObject));
            for (field, cell) in fields.iter().zip(cells.iter()) {
                events.push(Ok(ToonEvent::Key { key: field.0.clone(), was_quoted: field.1 }));
                events.push(Ok(ToonEvent::Primitive { value: parse_token_value(cell, row.line_no)? }));
            }
            events.push(Ok(ToonEvent::EndObject));
            *idx += 1;
            count += 1;
        }
        if opts.strict && count != len {
            let anchor = lines.get(*idx).map(|l| l.line_no).unwrap_or(lines.last().map(|l| l.line_no).unwrap_or(0));
            tracing::debug!(declared = len, actual = count, "tabular array length mismatch");
            return Err(Error::length_mismatch(anchor, len, count));
        }
    } else if let Some(trailing) = &h.trailing {
        let delim = crate::codec::line::detect_inline_delimiter(trailing);
        let anchor_line = lines.get(idx.saturating_sub(1)).map(|l| l.line_no).unwrap_or(0);
        let tokens = split_top_level(trailing, delim, anchor_line)?;
        for tok in &tokens {
            events.push(Ok(ToonEvent::Primitive { value: parse_token_value(tok, anchor_line)? }));
        }
        if opts.strict && tokens.len() != len {
            tracing::debug!(declared = len, actual = tokens.len(), "inline array length mismatch");
            return Err(Error::length_mismatch(anchor_line, len, tokens.len()));
        }
    } else {
        let child_level = level + 1;
        let mut count = 0usize;
        while *idx < lines.len() && lines[*idx].indent == child_level {
            decode_list_entry(lines, idx, child_level, events, opts)?;
            count += 1;
        }
        if opts.strict && count != len {
            let anchor = lines.get(*idx).map(|l| l.line_no).unwrap_or(lines.last().map(|l| l.line_no).unwrap_or(0));
            tracing::debug!(declared = len, actual = count, "list array length mismatch");
            return Err(Error::length_mismatch(anchor, len, count));
        } else if !opts.strict {
            tracing::trace!(declared = len, actual = count, "lenient mode accepted actual array length");
        }
    }

    events.push(Ok(ToonEvent::EndArray));
    Ok(())
}

fn split_row(content: &str, delimiter: char, expected_len: usize, strict: bool, line_no: usize) -> Result<Vec<String>> {
    let toks = split_top_level(content, delimiter, line_no)?;
    if toks.len() == expected_len {
        return Ok(toks);
    }
    if strict {
        for alt in [',', '|', '\t'] {
            if alt != delimiter {
                if let Ok(alt_toks) = split_top_level(content, alt, line_no) {
                    if alt_toks.len() == expected_len {
                        tracing::debug!(line = line_no, expected = %delimiter, found = %alt, "row used a different delimiter than its header");
                        return Err(Error::delimiter_mismatch(line_no, delimiter, alt));
                    }
                }
            }
        }
        Err(Error::length_mismatch(line_no, expected_len, toks.len()))
    } else {
        Ok(toks)
    }
}

/// Decodes one list-entry (`- ...`) at `lines[*idx]`, whose dash sits at `level`.
fn decode_list_entry(
    lines: &[Line],
    idx: &mut usize,
    level: usize,
    events: &mut Vec<Result<ToonEvent>>,
    opts: &StreamDecodeOptions,
) -> Result<()> {
    let line = &lines[*idx];
    let line_no = line.line_no;
    let rest = dash_rest(line.content)
        .ok_or_else(|| Error::malformed_header(line_no, "expected list entry starting with '- '"))?;
    *idx += 1;

    if rest.is_empty() {
        if *idx < lines.len() && lines[*idx].indent > level {
            let child_level = lines[*idx].indent;
            if child_level != level + 1 {
                return Err(Error::indentation_error(lines[*idx].line_no, 1, level + 1, child_level, lines[*idx].content));
            }
            events.push(Ok(ToonEvent::StartObject));
            while *idx < lines.len() && lines[*idx].indent == child_level {
                decode_object_entry(lines, idx, child_level, events, opts)?;
            }
            events.push(Ok(ToonEvent::EndObject));
        } else {
            // A bare "-" with no deeper body is how the encoder represents an
            // empty object list entry (an actual `null` element is always
            // written as "- null"), so mirror that here rather than reading
            // it back as `Null`.
            events.push(Ok(ToonEvent::StartObject));
            events.push(Ok(ToonEvent::EndObject));
        }
        return Ok(());
    }

    match parse_header(rest, line_no)? {
        Some(h) if h.key.is_none() && h.array_len.is_some() => {
            decode_array_with_header(lines, idx, level, &h, events, opts)
        }
        Some(h) if h.key.is_some() => decode_dash_object(&h, line_no, level, lines, idx, events, opts),
        _ => {
            let value = parse_token_value(rest, line_no)?;
            events.push(Ok(ToonEvent::Primitive { value }));
            Ok(())
        }
    }
}

/// Decodes a list entry that is an object whose first key sits inline on
/// the dash line (`- key: value`), with any remaining keys aligned one
/// level deeper than the dash.
fn decode_dash_object(
    h: &Header,
    line_no: usize,
    level: usize,
    lines: &[Line],
    idx: &mut usize,
    events: &mut Vec<Result<ToonEvent>>,
    opts: &StreamDecodeOptions,
) -> Result<()> {
    events.push(Ok(ToonEvent::StartObject));
    emit_key_and_value(h, line_no, level + 1, lines, idx, events, opts)?;
    let field_level = level + 1;
    while *idx < lines.len() && lines[*idx].indent == field_level && dash_rest(lines[*idx].content).is_none() {
        decode_object_entry(lines, idx, field_level, events, opts)?;
    }
    events.push(Ok(ToonEvent::EndObject));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_opts() -> StreamDecodeOptions {
        StreamDecodeOptions::new()
    }

    fn ok_events(lines: &[&str]) -> Vec<ToonEvent> {
        decode_events(lines, &strict_opts())
            .into_iter()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn decodes_flat_object() {
        let events = ok_events(&["name: Alice", "age: 30"]);
        assert_eq!(events[0], ToonEvent::StartObject);
        assert_eq!(events[1], ToonEvent::key("name"));
        assert!(matches!(&events[2], ToonEvent::Primitive { value } if value.as_str() == Some("Alice")));
        assert_eq!(events.last().unwrap(), &ToonEvent::EndObject);
    }

    #[test]
    fn decodes_inline_array() {
        let events = ok_events(&["tags[2]: a,b"]);
        assert_eq!(events[0], ToonEvent::StartObject);
        assert_eq!(events[1], ToonEvent::key("tags"));
        assert_eq!(events[2], ToonEvent::StartArray { length: 2 });
    }

    #[test]
    fn decodes_tabular_array() {
        let lines = ["items[2]{sku,qty}:", "  A1,2", "  B2,5"];
        let events = ok_events(&lines);
        assert!(events.iter().any(|e| matches!(e, ToonEvent::StartArray { length: 2 })));
        assert!(events.iter().filter(|e| matches!(e, ToonEvent::StartObject)).count() >= 3);
    }

    #[test]
    fn strict_mode_rejects_length_mismatch() {
        let lines = ["items[2]:", "  - a"];
        let events = decode_events(&lines, &strict_opts());
        assert!(events.last().unwrap().is_err());
    }

    #[test]
    fn lenient_mode_accepts_length_mismatch() {
        let lines = ["items[2]:", "  - a"];
        let opts = StreamDecodeOptions::new().with_strict(false);
        let events = decode_events(&lines, &opts);
        assert!(events.iter().all(|e| e.is_ok()));
    }
}
