//! Structural events emitted by the streaming decoder.
//!
//! A well-formed event stream matches the grammar `value := object | array
//! | primitive`, `object := StartObject (Key value)* EndObject`, `array :=
//! StartArray value{N} EndArray`. The value layer's [`crate::ToonValue`] is
//! one possible materialization of such a stream; callers that only need to
//! observe structure (without building a tree) can consume events directly.

use crate::ToonValue;

/// A single structural event from the decoder.
#[derive(Clone, Debug, PartialEq)]
pub enum ToonEvent {
    StartObject,
    EndObject,
    StartArray { length: usize },
    EndArray,
    Key { key: String, was_quoted: bool },
    Primitive { value: ToonValue },
}

impl ToonEvent {
    /// Convenience constructor for a field key that was not quoted on the wire.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        ToonEvent::Key {
            key: key.into(),
            was_quoted: false,
        }
    }

    /// Convenience constructor for a primitive event wrapping any value convertible to [`ToonValue`].
    #[must_use]
    pub fn primitive(value: impl Into<ToonValue>) -> Self {
        ToonEvent::Primitive {
            value: value.into(),
        }
    }
}
