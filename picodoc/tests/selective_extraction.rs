// Demo of selective extraction of data from a JSON document, using filters
// and nesting limits.
use picodoc::{
    decode_json, decode_json_with, decode_msgpack_with, encode_json, DecodeError, DecodeOptions,
    Document, Filter, NestingLimit,
};
use test_log::test;

// A more complex, "real-world" JSON document
const REAL_WORLD_JSON: &str = r#"
{
    "user_id": "u-12345",
    "username": "jdoe",
    "email": "jdoe@example.com",
    "is_active": true,
    "feature_flags": {
        "new_dashboard": true,
        "beta_access": false,
        "experimental_api": null
    },
    "products": [
        {
            "product_id": "p-001",
            "name": "Widget A",
            "stock": 99,
            "tags": ["gadget", "tech"]
        },
        {
            "product_id": "p-002",
            "name": "Widget B",
            "stock": 150,
            "tags": ["gadget", "classic"]
        },
        {
            "product_id": "p-003",
            "name": "Widget C",
            "stock": 42,
            "tags": ["new", "tech"]
        }
    ],
    "metadata": {
        "last_login": "2025-06-29T10:00:00Z",
        "notes": "A string with an escape sequence \n here."
    }
}
"#;

fn filter_doc(json: &str) -> Document {
    let mut doc = Document::new();
    decode_json(&mut doc, json.as_bytes()).unwrap();
    doc
}

fn extract(input: &str, filter: &str) -> String {
    let filter = filter_doc(filter);
    let mut doc = Document::new();
    decode_json_with(
        &mut doc,
        input.as_bytes(),
        DecodeOptions::new().filter(Filter::new(filter.root())),
    )
    .unwrap();
    let mut out = Vec::new();
    encode_json(doc.root(), &mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_selective_extraction() {
    let extracted = extract(
        REAL_WORLD_JSON,
        r#"{"email":true,"products":[{"product_id":true}],"feature_flags":{"new_dashboard":true}}"#,
    );
    assert_eq!(
        extracted,
        r#"{"email":"jdoe@example.com","feature_flags":{"new_dashboard":true},"products":[{"product_id":"p-001"},{"product_id":"p-002"},{"product_id":"p-003"}]}"#
    );
}

#[test]
fn test_filtered_values_use_no_pool() {
    let filter = filter_doc(r#"{"username":true}"#);
    let mut doc = Document::new();
    decode_json_with(
        &mut doc,
        REAL_WORLD_JSON.as_bytes(),
        DecodeOptions::new().filter(Filter::new(filter.root())),
    )
    .unwrap();
    assert_eq!(doc.slot_count(), 1);
    assert_eq!(doc.string_count(), 2);
    assert_eq!(doc.root().member("username").as_str(), Some("jdoe"));
    assert!(doc.root().member("email").is_unbound());
}

#[test]
fn test_wildcard_member() {
    let extracted = extract(
        r#"{"a":{"name":"x","v":1},"b":{"name":"y","v":2}}"#,
        r#"{"*":{"name":true}}"#,
    );
    assert_eq!(extracted, r#"{"a":{"name":"x"},"b":{"name":"y"}}"#);
}

#[test]
fn test_true_keeps_whole_subtree() {
    let extracted = extract(REAL_WORLD_JSON, r#"{"metadata":true}"#);
    assert_eq!(
        extracted,
        r#"{"metadata":{"last_login":"2025-06-29T10:00:00Z","notes":"A string with an escape sequence \n here."}}"#
    );
}

#[test]
fn test_filter_applies_to_msgpack() {
    // {"keep":1,"skip":[2,3]}
    let input = [
        0x82, 0xa4, b'k', b'e', b'e', b'p', 0x01, 0xa4, b's', b'k', b'i', b'p', 0x92, 0x02, 0x03,
    ];
    let filter = filter_doc(r#"{"keep":true}"#);
    let mut doc = Document::new();
    decode_msgpack_with(
        &mut doc,
        &input,
        DecodeOptions::new().filter(Filter::new(filter.root())),
    )
    .unwrap();
    assert_eq!(doc.root().size(), 1);
    assert_eq!(doc.root().member("keep").to::<u8>(), 1);
    assert_eq!(doc.slot_count(), 1);
}

fn nested_arrays(levels: usize) -> String {
    let mut json = "[".repeat(levels);
    json.push_str(&"]".repeat(levels));
    json
}

fn decode_with_limit(json: &str, limit: u8) -> Result<(), DecodeError> {
    let mut doc = Document::new();
    decode_json_with(
        &mut doc,
        json.as_bytes(),
        DecodeOptions::new().nesting_limit(NestingLimit::new(limit)),
    )
}

#[test]
fn test_nesting_limit_zero_admits_only_scalars() {
    assert_eq!(decode_with_limit("42", 0), Ok(()));
    assert_eq!(decode_with_limit(r#""text""#, 0), Ok(()));
    assert_eq!(decode_with_limit("[]", 0), Err(DecodeError::TooDeep));
    assert_eq!(decode_with_limit("{}", 0), Err(DecodeError::TooDeep));
}

#[test]
fn test_nesting_limit_counts_levels_below_root() {
    assert_eq!(decode_with_limit("[[[]]]", 2), Ok(()));
    assert_eq!(decode_with_limit("[[[[]]]]", 2), Err(DecodeError::TooDeep));
    assert_eq!(decode_with_limit(&nested_arrays(2), 1), Ok(()));
    assert_eq!(decode_with_limit(&nested_arrays(3), 1), Err(DecodeError::TooDeep));
    assert_eq!(decode_with_limit(r#"{"a":{"b":1}}"#, 1), Ok(()));
    assert_eq!(
        decode_with_limit(r#"{"a":{"b":[1]}}"#, 1),
        Err(DecodeError::TooDeep)
    );
}

#[test]
fn test_default_nesting_limit() {
    let mut doc = Document::new();
    assert_eq!(decode_json(&mut doc, nested_arrays(11).as_bytes()), Ok(()));
    assert_eq!(
        decode_json(&mut doc, nested_arrays(12).as_bytes()),
        Err(DecodeError::TooDeep)
    );
}

#[test]
fn test_filtered_out_input_still_counts_depth() {
    let filter = filter_doc(r#"{"keep":true}"#);
    let input = format!(r#"{{"keep":1,"skip":{}}}"#, nested_arrays(20));
    let mut doc = Document::new();
    let result = decode_json_with(
        &mut doc,
        input.as_bytes(),
        DecodeOptions::new().filter(Filter::new(filter.root())),
    );
    assert_eq!(result, Err(DecodeError::TooDeep));
}

#[test]
fn test_msgpack_nesting_limit() {
    let mut doc = Document::new();
    let options = DecodeOptions::new().nesting_limit(NestingLimit::new(1));
    assert_eq!(decode_msgpack_with(&mut doc, &[0x91, 0x90], options), Ok(()));
    assert_eq!(
        decode_msgpack_with(&mut doc, &[0x91, 0x91, 0x90], options),
        Err(DecodeError::TooDeep)
    );
}
