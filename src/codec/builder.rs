//! Materializes a [`ToonValue`] tree from a [`ToonEvent`] stream (§4.6).
//!
//! This is the inverse of the encoder's traversal: it never looks at the
//! original text, only at the structural events, so it works identically
//! whether the events came from [`crate::codec::decode_events`] or any other
//! conforming producer.

use crate::codec::event::ToonEvent;
use crate::{Error, Result, ToonMap, ToonValue};

enum Frame {
    Object(ToonMap, Option<String>),
    Array(Vec<ToonValue>),
}

/// Consumes an event stream and returns the single value it describes.
/// Stops at the first `Err` (if any), matching the contract that decode
/// operations never return a partial value on failure.
pub fn build_from_events<I: IntoIterator<Item = Result<ToonEvent>>>(events: I) -> Result<ToonValue> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<ToonValue> = None;

    for event in events {
        match event? {
            ToonEvent::StartObject => stack.push(Frame::Object(ToonMap::new(), None)),
            ToonEvent::EndObject => {
                let frame = stack.pop().ok_or_else(|| Error::incomplete_stream("unmatched EndObject"))?;
                let Frame::Object(map, pending) = frame else {
                    return Err(Error::incomplete_stream("EndObject did not match an object frame"));
                };
                if pending.is_some() {
                    return Err(Error::incomplete_stream("object closed with a key but no value"));
                }
                complete(&mut stack, &mut root, ToonValue::Object(map))?;
            }
            ToonEvent::StartArray { length } => {
                stack.push(Frame::Array(Vec::with_capacity(length.min(4096))));
            }
            ToonEvent::EndArray => {
                let frame = stack.pop().ok_or_else(|| Error::incomplete_stream("unmatched EndArray"))?;
                let Frame::Array(items) = frame else {
                    return Err(Error::incomplete_stream("EndArray did not match an array frame"));
                };
                complete(&mut stack, &mut root, ToonValue::Array(items))?;
            }
            ToonEvent::Key { key, .. } => match stack.last_mut() {
                Some(Frame::Object(_, pending)) => *pending = Some(key),
                _ => return Err(Error::incomplete_stream("key event outside an object context")),
            },
            ToonEvent::Primitive { value } => complete(&mut stack, &mut root, value)?,
        }
    }

    if !stack.is_empty() {
        return Err(Error::incomplete_stream("event stream ended with open structures"));
    }
    root.ok_or_else(|| Error::incomplete_stream("event stream produced no value"))
}

fn complete(stack: &mut Vec<Frame>, root: &mut Option<ToonValue>, value: ToonValue) -> Result<()> {
    match stack.last_mut() {
        Some(Frame::Object(map, pending)) => {
            let key = pending.take().ok_or_else(|| Error::incomplete_stream("value with no preceding key"))?;
            map.insert(key, value);
            Ok(())
        }
        Some(Frame::Array(items)) => {
            items.push(value);
            Ok(())
        }
        None => {
            *root = Some(value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    #[test]
    fn builds_flat_object() {
        let events = vec![
            Ok(ToonEvent::StartObject),
            Ok(ToonEvent::key("name")),
            Ok(ToonEvent::primitive("Alice")),
            Ok(ToonEvent::key("age")),
            Ok(ToonEvent::primitive(30i64)),
            Ok(ToonEvent::EndObject),
        ];
        let value = build_from_events(events).unwrap();
        let ToonValue::Object(map) = value else { panic!("expected object") };
        assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert_eq!(map.get("age"), Some(&ToonValue::Number(Number::Integer(30))));
    }

    #[test]
    fn builds_nested_array_of_objects() {
        let events = vec![
            Ok(ToonEvent::StartArray { length: 1 }),
            Ok(ToonEvent::StartObject),
            Ok(ToonEvent::key("sku")),
            Ok(ToonEvent::primitive("A1")),
            Ok(ToonEvent::EndObject),
            Ok(ToonEvent::EndArray),
        ];
        let value = build_from_events(events).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn error_halts_the_build() {
        let events: Vec<Result<ToonEvent>> = vec![
            Ok(ToonEvent::StartObject),
            Err(Error::incomplete_stream("boom")),
        ];
        assert!(build_from_events(events).is_err());
    }
}
