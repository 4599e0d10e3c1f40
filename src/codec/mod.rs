//! Codec layer: the language-agnostic `encode`/`decode` surface (§6).
//!
//! This sits alongside the serde-based [`crate::to_string`]/[`crate::from_str`]
//! family rather than replacing it. Where the serde layer maps Rust types to
//! and from TOON through `Serialize`/`Deserialize`, the codec layer operates
//! directly on [`crate::ToonValue`] (or, for streaming, on the structural
//! [`ToonEvent`]s that make one up) — the shape a caller reaches for when it
//! wants exact control over array-form selection, key folding, or low-level
//! event access instead of a derived mapping.

mod builder;
mod decoder;
mod encoder;
pub mod event;
pub mod fold;
mod line;
pub mod normalize;
pub mod options;
pub mod quote;
mod stream;

pub use event::ToonEvent;
pub use options::{DecodeOptions, EncodeOptions, ExpandPaths, KeyFolding, StreamDecodeOptions};
pub use stream::{ToonEventIter, ToonEventStream};

use crate::{Result, ToonValue};

/// Encodes `value` to a complete TOON document.
#[must_use]
pub fn encode(value: &ToonValue, options: &EncodeOptions) -> String {
    encoder::encode_lines_vec(value, options).join("\n")
}

/// Encodes `value` as a lazily-iterable sequence of lines (no trailing newline per line).
#[must_use]
pub fn encode_lines(value: &ToonValue, options: &EncodeOptions) -> std::vec::IntoIter<String> {
    encoder::encode_lines_vec(value, options).into_iter()
}

/// Decodes a complete TOON document into a [`ToonValue`].
pub fn decode(text: &str, options: &DecodeOptions) -> Result<ToonValue> {
    let lines = split_text_lines(text);
    decode_from_lines(lines, options)
}

/// Decodes a TOON value from an already-split sequence of lines.
pub fn decode_from_lines<I, S>(lines: I, options: &DecodeOptions) -> Result<ToonValue>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<String> = lines.into_iter().map(|s| s.as_ref().to_string()).collect();
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let stream_opts: StreamDecodeOptions = options.clone().into_stream_unchecked();
    let events = decoder::decode_events(&refs, &stream_opts);
    let value = builder::build_from_events(events)?;
    match options.expand_paths {
        ExpandPaths::Off => Ok(value),
        ExpandPaths::Safe => fold::expand_paths(&value, options.strict),
    }
}

/// Decodes a known, finite sequence of lines into a pull-based event iterator.
#[must_use]
pub fn decode_stream_sync<I, S>(lines: I, options: &StreamDecodeOptions) -> ToonEventIter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<String> = lines.into_iter().map(|s| s.as_ref().to_string()).collect();
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let events = decoder::decode_events(&refs, options);
    ToonEventIter::new(events)
}

/// Decodes events from an asynchronous line source.
///
/// The returned stream pulls every line from `lines` (suspending whenever
/// the source is pending) before decoding; see [`ToonEventStream`].
pub fn decode_stream<S>(lines: S, options: StreamDecodeOptions) -> ToonEventStream<S>
where
    S: futures_core::Stream<Item = String> + Unpin,
{
    ToonEventStream::new(lines, options)
}

fn split_text_lines(text: &str) -> Vec<&str> {
    let mut v: Vec<&str> = text.split('\n').collect();
    if matches!(v.last(), Some(&"")) {
        v.pop();
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_and_decode() {
        let toon = "name: Alice\nage: 30";
        let value = decode(toon, &DecodeOptions::default()).unwrap();
        let back = encode(&value, &EncodeOptions::default());
        assert_eq!(back, toon);
    }

    #[test]
    fn decode_from_lines_accepts_owned_strings() {
        let lines = vec!["a: 1".to_string(), "b: 2".to_string()];
        let value = decode_from_lines(lines, &DecodeOptions::default()).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn decode_stream_sync_yields_events_lazily() {
        let lines = ["items[1]:", "  - x"];
        let mut iter = decode_stream_sync(lines, &StreamDecodeOptions::default());
        assert!(iter.next().is_some());
    }

    #[test]
    fn key_folding_round_trips_with_expand_paths() {
        let mut inner = crate::ToonMap::new();
        inner.insert("b".to_string(), ToonValue::from(1i64));
        let mut mid = crate::ToonMap::new();
        mid.insert("a".to_string(), ToonValue::Object(inner));
        let value = ToonValue::Object(mid);

        let encode_opts = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
        let text = encode(&value, &encode_opts);
        assert_eq!(text, "a.b: 1");

        let decode_opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
        let decoded = decode(&text, &decode_opts).unwrap();
        assert_eq!(decoded, value);
    }
}
