//! Integration tests for the codec layer (`serde_toon::codec`): the
//! `encode`/`decode`/`decode_stream_sync` surface operating directly on
//! `ToonValue`/`ToonEvent`, independent of the serde derive path.

use serde_toon::codec::{
    decode, decode_from_lines, decode_stream_sync, encode, encode_lines, DecodeOptions,
    EncodeOptions, ExpandPaths, KeyFolding, StreamDecodeOptions, ToonEvent,
};
use serde_toon::{Number, ToonMap, ToonValue};

fn obj(pairs: Vec<(&str, ToonValue)>) -> ToonValue {
    let mut map = ToonMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    ToonValue::Object(map)
}

fn int(n: i64) -> ToonValue {
    ToonValue::Number(Number::Integer(n))
}

fn float(f: f64) -> ToonValue {
    ToonValue::Number(Number::Float(f))
}

// Scenario 1: uniform-object array encodes to a tabular header plus rows.
#[test]
fn scenario_tabular_array_encodes_exactly() {
    let row = |sku: &str, qty: i64, price: f64| {
        obj(vec![("sku", ToonValue::from(sku)), ("qty", int(qty)), ("price", float(price))])
    };
    let value = obj(vec![("items", ToonValue::Array(vec![row("A1", 2, 9.99), row("B2", 1, 14.5)]))]);

    let text = encode(&value, &EncodeOptions::default());
    assert_eq!(text, "items[2]{sku,qty,price}:\n  A1,2,9.99\n  B2,1,14.5");
}

// Scenario 2: a root-level list array with no header fields decodes to a
// plain string array.
#[test]
fn scenario_list_array_decodes_to_string_array() {
    let value = decode("items[2]:\n  - Apple\n  - Banana", &DecodeOptions::default()).unwrap();
    let expected = obj(vec![("items", ToonValue::Array(vec![ToonValue::from("Apple"), ToonValue::from("Banana")]))]);
    assert_eq!(value, expected);
}

// Scenario 3: key folding on encode, path expansion on decode, round trip.
#[test]
fn scenario_key_folding_round_trips_with_expand_paths() {
    let mut items = ToonMap::new();
    items.insert(
        "items".to_string(),
        ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")]),
    );
    let mut metadata = ToonMap::new();
    metadata.insert("metadata".to_string(), ToonValue::Object(items));
    let value = obj(vec![("data", ToonValue::Object(metadata))]);

    let encode_opts = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
    let text = encode(&value, &encode_opts);
    assert_eq!(text, "data.metadata.items[2]: a,b");

    let decode_opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
    let decoded = decode(&text, &decode_opts).unwrap();
    assert_eq!(decoded, value);
}

// Scenario 4: strict vs. lenient handling of a declared-vs-actual length mismatch.
#[test]
fn scenario_length_mismatch_strict_vs_lenient() {
    let text = "items[2]:\n  - Apple";

    let strict_err = decode(text, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(strict_err, serde_toon::Error::LengthMismatch { .. }));

    let lenient_opts = DecodeOptions::new().with_strict(false);
    let value = decode(text, &lenient_opts).unwrap();
    let expected = obj(vec![("items", ToonValue::Array(vec![ToonValue::from("Apple")]))]);
    assert_eq!(value, expected);
}

// Scenario 5: expansion conflict between a dotted key and a bare key sharing
// a prefix, strict raises, lenient keeps the last write.
#[test]
fn scenario_expansion_conflict_strict_vs_lenient() {
    let text = "a.b: 1\na: 2";

    let strict_opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
    let err = decode(text, &strict_opts).unwrap_err();
    assert!(matches!(err, serde_toon::Error::ExpansionConflict { .. }));

    let lenient_opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe).with_strict(false);
    let value = decode(text, &lenient_opts).unwrap();
    assert_eq!(value, obj(vec![("a", int(2))]));
}

// Scenario 6: decode_stream_sync yields the exact event sequence for a flat object.
#[test]
fn scenario_stream_sync_exact_event_sequence() {
    let events: Vec<ToonEvent> = decode_stream_sync(["name: Alice", "age: 30"], &StreamDecodeOptions::default())
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(
        events,
        vec![
            ToonEvent::StartObject,
            ToonEvent::key("name"),
            ToonEvent::primitive("Alice"),
            ToonEvent::key("age"),
            ToonEvent::primitive(30i64),
            ToonEvent::EndObject,
        ]
    );
}

// Boundary: empty input decodes to an empty object.
#[test]
fn boundary_empty_input_decodes_to_empty_object() {
    let value = decode("", &DecodeOptions::default()).unwrap();
    assert_eq!(value, ToonValue::Object(ToonMap::new()));
}

// Boundary: an empty array at the root emits the `[0]:` header with no body.
#[test]
fn boundary_empty_array_header() {
    let value = obj(vec![("items", ToonValue::Array(vec![]))]);
    let text = encode(&value, &EncodeOptions::default());
    assert_eq!(text, "items[0]:");

    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// Boundary: a single root primitive round trips without a header line.
#[test]
fn boundary_root_primitive_round_trips() {
    let value = int(42);
    let text = encode(&value, &EncodeOptions::default());
    assert_eq!(text, "42");
    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// Boundary: a string containing the active delimiter is quoted.
#[test]
fn boundary_string_containing_delimiter_is_quoted() {
    let value = obj(vec![("note", ToonValue::from("a,b"))]);
    let text = encode(&value, &EncodeOptions::default());
    assert_eq!(text, "note: \"a,b\"");
    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// A list element that is an empty object round-trips through the bare "-"
// line the encoder uses for it, and is kept distinct from a `null` element
// (which the encoder always spells out as "- null").
#[test]
fn round_trip_empty_object_list_entry_distinct_from_null() {
    let value = obj(vec![(
        "items",
        ToonValue::Array(vec![ToonValue::Object(ToonMap::new()), ToonValue::Null]),
    )]);
    let text = encode(&value, &EncodeOptions::default());
    assert_eq!(text, "items[2]:\n  -\n  - null");

    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// `encode(V)` joined on LF equals `encode_lines(V)` joined on LF.
#[test]
fn encode_matches_encode_lines_joined() {
    let value = obj(vec![
        ("name", ToonValue::from("Alice")),
        ("tags", ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")])),
    ]);
    let options = EncodeOptions::default();
    let whole = encode(&value, &options);
    let lines: Vec<String> = encode_lines(&value, &options).collect();
    assert_eq!(whole, lines.join("\n"));
}

// `decode(encode(V)) == V` for a representative nested structure with folding off.
#[test]
fn round_trip_nested_structure() {
    let value = obj(vec![
        ("name", ToonValue::from("Alice")),
        ("active", ToonValue::Bool(true)),
        ("balance", float(12.5)),
        ("tags", ToonValue::Array(vec![ToonValue::from("admin"), ToonValue::from("user")])),
        (
            "address",
            obj(vec![("city", ToonValue::from("Springfield")), ("zip", ToonValue::from("00000"))]),
        ),
    ]);
    let text = encode(&value, &EncodeOptions::default());
    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// The event stream decode_stream_sync produces for a tabular array matches
// the value decode_from_lines builds from the same lines, field by field.
#[test]
fn stream_sync_events_match_shape_of_decode_from_lines_value() {
    let lines = ["items[2]{sku,qty}:", "  A1,2", "  B2,5"];
    let via_lines = decode_from_lines(lines, &DecodeOptions::default()).unwrap();
    let expected = obj(vec![(
        "items",
        ToonValue::Array(vec![
            obj(vec![("sku", ToonValue::from("A1")), ("qty", int(2))]),
            obj(vec![("sku", ToonValue::from("B2")), ("qty", int(5))]),
        ]),
    )]);
    assert_eq!(via_lines, expected);

    let events: Vec<ToonEvent> = decode_stream_sync(lines, &StreamDecodeOptions::default())
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(
        events,
        vec![
            ToonEvent::StartObject,
            ToonEvent::key("items"),
            ToonEvent::StartArray { length: 2 },
            ToonEvent::StartObject,
            ToonEvent::key("sku"),
            ToonEvent::primitive("A1"),
            ToonEvent::key("qty"),
            ToonEvent::primitive(2i64),
            ToonEvent::EndObject,
            ToonEvent::StartObject,
            ToonEvent::key("sku"),
            ToonEvent::primitive("B2"),
            ToonEvent::key("qty"),
            ToonEvent::primitive(5i64),
            ToonEvent::EndObject,
            ToonEvent::EndArray,
            ToonEvent::EndObject,
        ]
    );
}

// Lists mixing non-uniform objects still decode back to equivalent values.
#[test]
fn round_trip_mixed_list_array() {
    let value = obj(vec![(
        "items",
        ToonValue::Array(vec![ToonValue::from("a"), obj(vec![("x", int(1))])]),
    )]);
    let text = encode(&value, &EncodeOptions::default());
    let decoded = decode(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

// Custom delimiter and indent both survive a round trip.
#[test]
fn round_trip_with_tab_delimiter_and_custom_indent() {
    let value = obj(vec![("tags", ToonValue::Array(vec![ToonValue::from("a"), ToonValue::from("b")]))]);
    let options = EncodeOptions::new()
        .with_delimiter(serde_toon::Delimiter::Tab)
        .with_indent(4);
    let text = encode(&value, &options);
    assert_eq!(text, "tags[2]: a\tb");

    let decode_opts = DecodeOptions::new().with_indent(4);
    let decoded = decode(&text, &decode_opts).unwrap();
    assert_eq!(decoded, value);
}
