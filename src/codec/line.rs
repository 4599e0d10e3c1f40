//! Line- and header-level parsing shared by the structural decoder (§4.4).
//!
//! A decoded line is split into an indent level and a content slice; the
//! content is then parsed as either a list-entry dash, a header
//! (`KEY? ([N])? ({fields})? :`), or a bare scalar token when no top-level
//! colon is present.

use crate::codec::quote::is_numeric_literal;
use crate::value::Number;
use crate::{Error, Result, ToonValue};

/// One physical line of TOON text, with leading-whitespace indentation
/// already resolved to a level (`indent / indent_width`).
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub indent: usize,
    pub content: &'a str,
    pub line_no: usize,
}

/// Splits raw (non-blank) lines into [`Line`]s, validating that indentation
/// is always an exact multiple of `indent_width` and never uses tabs.
pub fn split_lines<'a>(raw: &[&'a str], indent_width: usize) -> Result<Vec<Line<'a>>> {
    let mut out = Vec::with_capacity(raw.len());
    for (i, line) in raw.iter().enumerate() {
        let line_no = i + 1;
        let spaces = line.len() - line.trim_start_matches(' ').len();
        let rest = &line[spaces..];
        if rest.starts_with('\t') || line.starts_with('\t') {
            return Err(Error::indentation_error(line_no, 1, indent_width, spaces, line));
        }
        let level = if indent_width == 0 {
            if spaces != 0 {
                return Err(Error::indentation_error(line_no, 1, 0, spaces, line));
            }
            0
        } else {
            if spaces % indent_width != 0 {
                return Err(Error::indentation_error(line_no, 1, indent_width, spaces, line));
            }
            spaces / indent_width
        };
        out.push(Line { indent: level, content: rest, line_no });
    }
    Ok(out)
}

/// Returns the remainder of a list-entry line after its `"- "` marker, or
/// `None` if `content` is not a list entry. `"-"` alone yields an empty rest.
pub fn dash_rest(content: &str) -> Option<&str> {
    if content == "-" {
        Some("")
    } else {
        content.strip_prefix("- ")
    }
}

/// A parsed header: optional key, optional declared array length, optional
/// tabular field list, and whatever trails the terminating colon on the
/// same line (the inline value, if any).
#[derive(Debug, Clone)]
pub struct Header {
    pub key: Option<(String, bool)>,
    pub array_len: Option<usize>,
    pub fields: Option<Vec<(String, bool)>>,
    pub fields_delimiter: Option<char>,
    pub trailing: Option<String>,
}

/// Parses `content` as a header line. Returns `None` when no top-level,
/// unquoted colon is present (i.e. `content` is a bare scalar token).
pub fn parse_header(content: &str, line_no: usize) -> Result<Option<Header>> {
    let colon_idx = find_top_level_colon(content, line_no)?;
    let Some(colon_idx) = colon_idx else {
        return Ok(None);
    };
    let header_part = &content[..colon_idx];
    let after = &content[colon_idx + 1..];
    let trailing = after.strip_prefix(' ').unwrap_or(after);
    let trailing = if trailing.is_empty() { None } else { Some(trailing.to_string()) };

    let mut rest = header_part;
    let mut key = None;
    if rest.starts_with('"') {
        let (k, consumed) = read_quoted_str(rest, line_no)?;
        key = Some((k, true));
        rest = &rest[consumed..];
    } else {
        let cut = rest.find(['[', '{']).unwrap_or(rest.len());
        let bare = &rest[..cut];
        if !bare.is_empty() {
            key = Some((bare.to_string(), false));
        }
        rest = &rest[cut..];
    }

    let mut array_len = None;
    if let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped
            .find(']')
            .ok_or_else(|| Error::malformed_header(line_no, "unbalanced '[' in header"))?;
        let digits = &stripped[..close];
        let n: usize = digits
            .parse()
            .map_err(|_| Error::malformed_header(line_no, format!("non-numeric array length '{digits}'")))?;
        array_len = Some(n);
        rest = &stripped[close + 1..];
    }

    let mut fields = None;
    let mut fields_delimiter = None;
    if let Some(stripped) = rest.strip_prefix('{') {
        let close = find_matching_brace(stripped, line_no)?;
        let inner = &stripped[..close];
        let delim = detect_inline_delimiter(inner);
        let tokens = split_top_level(inner, delim, line_no)?;
        let mut parsed = Vec::with_capacity(tokens.len());
        for t in &tokens {
            parsed.push(parse_field_name(t, line_no)?);
        }
        fields_delimiter = Some(delim);
        fields = Some(parsed);
        rest = &stripped[close + 1..];
    }

    if !rest.is_empty() {
        return Err(Error::malformed_header(line_no, format!("unexpected trailing characters '{rest}' in header")));
    }

    Ok(Some(Header { key, array_len, fields, fields_delimiter, trailing }))
}

fn parse_field_name(tok: &str, line_no: usize) -> Result<(String, bool)> {
    if tok.starts_with('"') {
        let (k, consumed) = read_quoted_str(tok, line_no)?;
        if consumed != tok.len() {
            return Err(Error::malformed_header(line_no, "trailing content after quoted field name"));
        }
        Ok((k, true))
    } else {
        Ok((tok.to_string(), false))
    }
}

fn find_top_level_colon(content: &str, line_no: usize) -> Result<Option<usize>> {
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut chars = content.char_indices();
    while let Some((i, c)) = chars.next() {
        if in_quotes {
            if c == '\\' {
                chars.next();
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            ':' if depth == 0 => return Ok(Some(i)),
            _ => {}
        }
    }
    if in_quotes {
        return Err(Error::unterminated_string(line_no, 0));
    }
    Ok(None)
}

fn find_matching_brace(s: &str, line_no: usize) -> Result<usize> {
    let mut depth = 1i32;
    let mut in_quotes = false;
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if in_quotes {
            if c == '\\' {
                chars.next();
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(Error::malformed_header(line_no, "unbalanced '{' in header"))
}

/// Detects the delimiter a field list or inline array value uses, by
/// scanning for the first occurrence of `,`, `|`, or a literal tab outside
/// quotes. Defaults to `,` for single-element lists.
pub fn detect_inline_delimiter(s: &str) -> char {
    let mut in_quotes = false;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '\\' {
                chars.next();
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' | '|' | '\t' => return c,
            _ => {}
        }
    }
    ','
}

/// Splits `s` on `delimiter`, respecting quoted spans and bracket nesting.
/// Trims one space on either side of each split when `delimiter` is `,` or
/// `|` (never for tab, per §4.2).
pub fn split_top_level(s: &str, delimiter: char, line_no: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut cur_start = 0usize;
    let mut in_quotes = false;
    let mut depth = 0i32;
    let mut chars = s.char_indices();
    while let Some((byte_idx, c)) = chars.next() {
        if in_quotes {
            if c == '\\' {
                chars.next();
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            ch if ch == delimiter && depth == 0 => {
                tokens.push(s[cur_start..byte_idx].to_string());
                cur_start = byte_idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err(Error::unterminated_string(line_no, 0));
    }
    tokens.push(s[cur_start..].to_string());
    if delimiter == ',' || delimiter == '|' {
        for t in tokens.iter_mut() {
            *t = t.trim_matches(' ').to_string();
        }
    }
    Ok(tokens)
}

/// Reads a double-quoted string starting at `s[0]` (which must be `"`).
/// Returns the decoded contents and the number of bytes of `s` consumed,
/// including both quote characters.
pub fn read_quoted_str(s: &str, line_no: usize) -> Result<(String, usize)> {
    let mut chars = s.char_indices();
    let (_, first) = chars.next().expect("caller checked for a leading quote");
    debug_assert_eq!(first, '"');
    let mut out = String::new();
    for (i, c) in chars.by_ref() {
        match c {
            '"' => return Ok((out, i + 1)),
            '\\' => {
                let (_, esc) = chars.next().ok_or_else(|| Error::unterminated_string(line_no, 0))?;
                match esc {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{0008}'),
                    'f' => out.push('\u{000C}'),
                    'u' => {
                        let mut hex = String::with_capacity(4);
                        for _ in 0..4 {
                            let (_, h) = chars.next().ok_or_else(|| Error::unterminated_string(line_no, 0))?;
                            hex.push(h);
                        }
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|_| Error::bad_escape(line_no, 0, 'u'))?;
                        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                    }
                    other => return Err(Error::bad_escape(line_no, 0, other)),
                }
            }
            _ => out.push(c),
        }
    }
    Err(Error::unterminated_string(line_no, 0))
}

/// Parses a single (already delimiter-split) token into its scalar value,
/// handling both quoted strings and the bare literal grammar (numbers,
/// `true`/`false`/`null`, and everything else as a string).
pub fn parse_token_value(tok: &str, line_no: usize) -> Result<ToonValue> {
    let t = tok.trim();
    if t.starts_with('"') {
        let (s, consumed) = read_quoted_str(t, line_no)?;
        if consumed != t.len() {
            return Err(Error::malformed_header(line_no, "trailing content after quoted string"));
        }
        Ok(ToonValue::String(s))
    } else {
        Ok(parse_scalar_token(t))
    }
}

fn parse_scalar_token(t: &str) -> ToonValue {
    match t {
        "true" => ToonValue::Bool(true),
        "false" => ToonValue::Bool(false),
        "null" => ToonValue::Null,
        _ if is_numeric_literal(t) => {
            if !t.contains('.') && !t.contains('e') && !t.contains('E') {
                match t.parse::<i64>() {
                    Ok(i) => ToonValue::Number(Number::Integer(i)),
                    Err(_) => t
                        .parse::<f64>()
                        .map(|f| ToonValue::Number(Number::Float(f)))
                        .unwrap_or_else(|_| ToonValue::String(t.to_string())),
                }
            } else {
                t.parse::<f64>()
                    .map(|f| ToonValue::Number(Number::Float(f)))
                    .unwrap_or_else(|_| ToonValue::String(t.to_string()))
            }
        }
        _ => ToonValue::String(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_key_value_header() {
        let h = parse_header("name: Alice", 1).unwrap().unwrap();
        assert_eq!(h.key, Some(("name".to_string(), false)));
        assert_eq!(h.trailing.as_deref(), Some("Alice"));
    }

    #[test]
    fn parses_tabular_header_with_fields() {
        let h = parse_header("items[2]{sku,qty,price}:", 1).unwrap().unwrap();
        assert_eq!(h.key, Some(("items".to_string(), false)));
        assert_eq!(h.array_len, Some(2));
        let fields: Vec<_> = h.fields.unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["sku", "qty", "price"]);
    }

    #[test]
    fn parses_root_array_header() {
        let h = parse_header("[3]:", 1).unwrap().unwrap();
        assert!(h.key.is_none());
        assert_eq!(h.array_len, Some(3));
    }

    #[test]
    fn non_header_line_returns_none() {
        assert!(parse_header("42", 1).unwrap().is_none());
        assert!(parse_header("hello world", 1).unwrap().is_none());
    }

    #[test]
    fn dash_rest_strips_marker() {
        assert_eq!(dash_rest("- foo"), Some("foo"));
        assert_eq!(dash_rest("-"), Some(""));
        assert_eq!(dash_rest("foo"), None);
    }

    #[test]
    fn split_top_level_respects_quotes() {
        let toks = split_top_level(r#"a,"b,c",d"#, ',', 1).unwrap();
        assert_eq!(toks, vec!["a", "\"b,c\"", "d"]);
    }

    #[test]
    fn rejects_leading_zero_as_string() {
        assert_eq!(parse_scalar_token("007"), ToonValue::String("007".to_string()));
    }
}
