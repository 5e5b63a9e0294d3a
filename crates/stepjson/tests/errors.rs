use stepjson::{BufferEncoder, EncodingOptions, Error, Key, Value};

#[test]
fn unsupported_value_aborts_by_default() {
    let mut encoder = BufferEncoder::new(Value::Unsupported("file handle"));

    match encoder.encode() {
        Err(Error::Aborted(message)) => {
            assert_eq!(message, "Line 1, column 1: Type is not supported");
        }
        other => panic!("expected Aborted, got {:?}", other.map(|_| ())),
    }

    assert!(!encoder.is_active());
    assert_eq!(encoder.errors().len(), 1);
}

#[test]
fn unsupported_value_inside_object_aborts_with_position() {
    let value = Value::Object(vec![(
        Key::from("key 1"),
        Value::Unsupported("file handle"),
    )]);
    let mut encoder = BufferEncoder::new(value);

    match encoder.encode() {
        Err(Error::Aborted(message)) => {
            assert_eq!(message, "Line 1, column 10: Type is not supported");
        }
        other => panic!("expected Aborted, got {:?}", other.map(|_| ())),
    }
    assert!(!encoder.is_active());
    assert_eq!(encoder.fragment(), None);
}

#[test]
fn partial_output_substitutes_null_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::Object(vec![
        (Key::from("key 1"), Value::Unsupported("file handle")),
        (
            Key::from("key 2"),
            Value::stream(|| {
                vec![
                    (Key::from("one"), Value::from("two")),
                    (Key::Unsupported("array"), Value::from("bar")),
                ]
                .into_iter()
            }),
        ),
    ]);

    let mut encoder = BufferEncoder::new(value);
    encoder.set_options(EncodingOptions::new().partial_output_on_error(true))?;

    assert_eq!(encoder.encode()?, r#"{"key 1":null,"key 2":{"one":"two"}}"#);
    assert_eq!(
        encoder.errors(),
        [
            "Line 1, column 10: Type is not supported",
            "Line 1, column 35: Only string or integer keys are supported",
        ]
    );
    Ok(())
}

#[test]
fn invalid_key_aborts_by_default() {
    let value = Value::Object(vec![(Key::Unsupported("array"), Value::from("bar"))]);
    let mut encoder = BufferEncoder::new(value);

    match encoder.encode() {
        Err(Error::Aborted(message)) => {
            assert_eq!(
                message,
                "Line 1, column 2: Only string or integer keys are supported"
            );
        }
        other => panic!("expected Aborted, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn non_finite_numbers_fail_literal_encoding() -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = BufferEncoder::new(f64::INFINITY);
    match encoder.encode() {
        Err(Error::Aborted(message)) => {
            assert_eq!(
                message,
                "Line 1, column 1: Inf and NaN cannot be JSON encoded"
            );
        }
        other => panic!("expected Aborted, got {:?}", other.map(|_| ())),
    }

    let mut encoder = BufferEncoder::new(f64::NAN);
    encoder.set_options(EncodingOptions::new().partial_output_on_error(true))?;
    assert_eq!(encoder.encode()?, "null");
    assert_eq!(encoder.errors().len(), 1);
    Ok(())
}

#[test]
fn options_are_frozen_during_encoding() -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = BufferEncoder::new("string");
    encoder.reset()?;

    assert!(matches!(
        encoder.set_options(EncodingOptions::new()),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        encoder.set_indent(4),
        Err(Error::InvalidState(_))
    ));

    // A finished pass unlocks the configuration again.
    encoder.step()?;
    assert!(!encoder.is_active());
    encoder.set_options(EncodingOptions::new().pretty_print(true))?;
    encoder.set_indent(2)?;
    Ok(())
}

#[test]
fn errors_are_cleared_on_reset() -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::Object(vec![
        (Key::from("bad"), Value::Unsupported("file handle")),
        (Key::from("good"), Value::from(1)),
    ]);
    let mut encoder = BufferEncoder::new(value);
    encoder.set_options(EncodingOptions::new().partial_output_on_error(true))?;

    encoder.encode()?;
    assert_eq!(encoder.errors().len(), 1);

    encoder.encode()?;
    assert_eq!(encoder.errors().len(), 1);
    Ok(())
}
