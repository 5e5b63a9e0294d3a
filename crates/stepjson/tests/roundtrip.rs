use serde_json::json;
use stepjson::{
    encode_to_string, encode_to_string_with, encode_to_writer, BufferEncoder, CallbackSink,
    Encoder, EncodingOptions, JsonToken, Value, WriterEncoder,
};

#[test]
fn compact_output_decodes_back() -> Result<(), Box<dyn std::error::Error>> {
    let original = json!({
        "name": "roundtrip",
        "count": 3,
        "ratio": 0.25,
        "flags": [true, false, null],
        "nested": {"empty": [], "deep": [[1], [2, [3]]]}
    });

    let out = encode_to_string(Value::from(original.clone()))?;
    let decoded: serde_json::Value = serde_json::from_str(&out)?;
    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn pretty_output_decodes_back() -> Result<(), Box<dyn std::error::Error>> {
    let original = json!({"key 1": "value 1", "key 2": ["a", "b"]});

    let mut encoder = BufferEncoder::new(Value::from(original.clone()));
    encoder.set_options(EncodingOptions::new().pretty_print(true))?;
    let decoded: serde_json::Value = serde_json::from_str(&encoder.encode()?)?;
    assert_eq!(decoded, original);
    Ok(())
}

// Pretty-printing only adds whitespace: dropping every whitespace fragment
// must reproduce the compact encoding byte for byte.
#[test]
fn pretty_minus_whitespace_equals_compact() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(json!({
        "key 1": "value 1",
        "key 2": ["a", {"x": 1}, []],
        "key 3": null
    }));

    let compact = encode_to_string(value.clone())?;

    let mut stripped = String::new();
    {
        let mut encoder = Encoder::with_sink(
            value,
            CallbackSink::new(|fragment: &str, token| {
                if token != JsonToken::Whitespace {
                    stripped.push_str(fragment);
                }
            }),
        );
        encoder.set_options(EncodingOptions::new().pretty_print(true))?;
        encoder.reset()?;
        while encoder.is_active() {
            encoder.step()?;
        }
    }

    assert_eq!(stripped, compact);
    Ok(())
}

#[test]
fn reset_and_reencode_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(json!({"a": [1, 2], "b": {"c": "d"}}));
    let mut encoder = BufferEncoder::new(value);

    let first = encoder.encode()?;
    let second = encoder.encode()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn step_fragments_concatenate_to_full_output() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(json!({"list": [1, 2, 3], "done": true}));
    let expected = encode_to_string(value.clone())?;

    let fragments: Vec<String> = BufferEncoder::new(value).collect::<Result<_, _>>()?;
    assert!(fragments.len() > 1);
    assert_eq!(fragments.concat(), expected);
    Ok(())
}

#[test]
fn writer_encoder_reports_byte_total() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(json!({"key 1": "value 1", "key 2": ["a", "b"]}));
    let expected = encode_to_string(value.clone())?;

    let mut out = Vec::new();
    let total = encode_to_writer(&mut out, value, &EncodingOptions::default())?;

    assert_eq!(out, expected.as_bytes());
    assert_eq!(total, expected.len() as u64);
    Ok(())
}

#[test]
fn writer_encoder_tracks_step_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(json!(["ab", "cdef"]));
    let mut out = Vec::new();
    let mut encoder = WriterEncoder::new(value, &mut out);

    encoder.reset()?;
    let mut total = 0;
    while encoder.is_active() {
        total += encoder.step_bytes().unwrap_or(0);
        encoder.step()?;
    }
    drop(encoder);

    assert_eq!(total, out.len() as u64);
    assert_eq!(out, b"[\"ab\",\"cdef\"]");
    Ok(())
}

#[test]
fn encoder_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = BufferEncoder::new("value");

    assert_eq!(encoder.step_index(), None);
    assert!(!encoder.is_active());
    assert_eq!(encoder.fragment(), None);

    encoder.reset()?;
    assert_eq!(encoder.step_index(), Some(0));
    assert!(encoder.is_active());
    assert_eq!(encoder.fragment(), Some("\"value\""));

    encoder.step()?;
    assert_eq!(encoder.step_index(), None);
    assert!(!encoder.is_active());
    assert_eq!(encoder.fragment(), None);
    Ok(())
}

// The frame stack grows with nesting depth, not document size, so input far
// deeper than any native call stack could recurse through still encodes.
#[test]
fn deeply_nested_input_does_not_recurse() -> Result<(), Box<dyn std::error::Error>> {
    let depth = 10_000;
    let mut value = Value::Array(Vec::new());
    for _ in 0..depth {
        value = Value::Array(vec![value]);
    }

    let out = encode_to_string(value)?;
    assert_eq!(out.len(), (depth + 1) * 2);
    assert!(out.starts_with("[[[["));
    assert!(out.ends_with("]]]]"));
    Ok(())
}

#[test]
fn force_object_with_pretty_print() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(vec!["a"]);
    let options = EncodingOptions::new().force_object(true).pretty_print(true);
    let out = encode_to_string_with(value, &options)?;
    assert_eq!(out, "{\n    \"0\": \"a\"\n}");
    Ok(())
}
