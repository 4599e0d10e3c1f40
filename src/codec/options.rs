//! Option structs for the codec-layer `encode`/`decode` operations.
//!
//! These are distinct from [`crate::ToonOptions`] (the serde-layer formatting
//! options) because the codec surface carries a broader option set: key
//! folding, strictness, and path expansion have no equivalent in the serde
//! layer. Builder style follows [`crate::ToonOptions`]: `::new()`, `Default`,
//! consuming `with_*` methods.

use crate::Delimiter;

/// Key-folding mode for the encoder: whether single-key object chains are
/// collapsed into dotted paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyFolding {
    #[default]
    Off,
    Safe,
}

/// Path-expansion mode for the decoder: the inverse of [`KeyFolding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExpandPaths {
    #[default]
    Off,
    Safe,
}

/// Options for [`crate::codec::encode`] and [`crate::codec::encode_lines`].
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
    pub key_folding: KeyFolding,
    pub flatten_depth: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::Comma,
            key_folding: KeyFolding::Off,
            flatten_depth: None,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    /// Maximum chain length folded into a single dotted key. `None` means unbounded.
    #[must_use]
    pub fn with_flatten_depth(mut self, depth: usize) -> Self {
        self.flatten_depth = Some(depth);
        self
    }
}

/// Options for [`crate::codec::decode`] and [`crate::codec::decode_from_lines`].
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub indent: usize,
    pub strict: bool,
    pub expand_paths: ExpandPaths,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: true,
            expand_paths: ExpandPaths::Off,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: ExpandPaths) -> Self {
        self.expand_paths = expand_paths;
        self
    }

    /// Drops `expand_paths` without checking it, for callers (like
    /// [`crate::codec::decode_from_lines`]) that apply path expansion themselves
    /// after materializing a value and only need the shared `indent`/`strict`
    /// fields for the underlying event decode.
    pub(crate) fn into_stream_unchecked(self) -> StreamDecodeOptions {
        StreamDecodeOptions {
            indent: self.indent,
            strict: self.strict,
        }
    }
}

/// Options for [`crate::codec::decode_stream_sync`] and [`crate::codec::decode_stream`].
///
/// Identical to [`DecodeOptions`] minus `expand_paths`: path expansion
/// requires materializing the full value tree and has no meaning against a
/// live event stream (see §4.6/§9 of the design notes).
#[derive(Clone, Debug)]
pub struct StreamDecodeOptions {
    pub indent: usize,
    pub strict: bool,
}

impl Default for StreamDecodeOptions {
    fn default() -> Self {
        StreamDecodeOptions {
            indent: 2,
            strict: true,
        }
    }
}

impl StreamDecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Converts a [`DecodeOptions`] into the narrower [`StreamDecodeOptions`], rejecting it
/// when `expand_paths` is anything but `Off` (§6/§7: `expandPaths` has no meaning against
/// a live event stream, and streaming entry points must reject it rather than silently
/// drop it).
impl std::convert::TryFrom<DecodeOptions> for StreamDecodeOptions {
    type Error = crate::Error;

    fn try_from(options: DecodeOptions) -> crate::Result<Self> {
        if options.expand_paths != ExpandPaths::Off {
            return Err(crate::Error::unsupported_option(
                "expandPaths is not supported in streaming mode",
            ));
        }
        Ok(options.into_stream_unchecked())
    }
}

impl From<EncodeOptions> for crate::ToonOptions {
    fn from(options: EncodeOptions) -> Self {
        crate::ToonOptions::new()
            .with_indent(options.indent)
            .with_delimiter(options.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn stream_options_reject_expand_paths() {
        let opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
        let err = StreamDecodeOptions::try_from(opts).unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedOption(_)));
    }

    #[test]
    fn stream_options_accept_expand_paths_off() {
        let opts = DecodeOptions::new().with_indent(4).with_strict(false);
        let stream = StreamDecodeOptions::try_from(opts).unwrap();
        assert_eq!(stream.indent, 4);
        assert!(!stream.strict);
    }
}
