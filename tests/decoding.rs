use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lazy_json::{
    attach_str, attach_with_options, to_value, AttachOptions, BoxError, JsonDecoder,
};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{json, Value};

#[rstest]
#[case("{}")]
#[case("[]")]
#[case("3.1415926")]
#[case(r#""Hello world!""#)]
#[case("null")]
#[case(r#"{ "key" : 1 }"#)]
#[case(r#"{ "a" : { "b" : [1, 2, { "c" : null }] }, "d" : "e" }"#)]
#[case(r#"[ [1, 2], [3, 4], { "x" : true } ]"#)]
#[case("{ \"a\" : \"\u{2713}\", \"b\" : [false, -0.5, \"\\u00e9\"] }")]
fn full_decode_matches_a_standard_decode(#[case] input: &str) {
    let standard: Value = serde_json::from_str(input).unwrap();
    assert_eq!(to_value(input).unwrap(), standard);
}

#[rstest]
fn path_access_matches_standard_navigation() {
    let input = r#"{ "a" : { "b" : [10, { "c" : 20 }] } }"#;
    let standard: Value = serde_json::from_str(input).unwrap();

    let mut root = attach_str(input);
    let lazy = root
        .get("a")
        .unwrap()
        .unwrap()
        .get("b")
        .unwrap()
        .unwrap()
        .get(1)
        .unwrap()
        .unwrap()
        .get("c")
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(lazy, standard["a"]["b"][1]["c"]);
}

#[rstest]
fn object_decode_preserves_document_order() {
    let decoded = to_value(r#"{ "z" : 1, "a" : 2, "m" : 3 }"#).unwrap();
    let keys: Vec<&String> = decoded.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[derive(Default)]
struct CountingDecoder {
    calls: AtomicUsize,
}

impl CountingDecoder {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl JsonDecoder for CountingDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Value, BoxError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        serde_json::from_slice(bytes).map_err(Into::into)
    }
}

#[rstest]
fn repeated_lookups_do_not_rescan_cached_fields() {
    let decoder = Arc::new(CountingDecoder::default());
    let options = AttachOptions::new().with_decoder(decoder.clone());
    let mut root = attach_with_options(r#"{ "a" : 1, "b" : 2 }"#.as_bytes(), options);

    root.get("a").unwrap().unwrap();
    assert_eq!(decoder.calls(), 1); // the key "a" was decoded once

    root.get("a").unwrap().unwrap();
    root.get("a").unwrap().unwrap();
    assert_eq!(decoder.calls(), 1); // cache hits decode nothing

    root.get("b").unwrap().unwrap();
    assert_eq!(decoder.calls(), 2); // resuming the scan decodes only "b"

    assert!(root.get("missing").unwrap().is_none());
    assert_eq!(decoder.calls(), 2); // exhaustion scans bytes, decodes nothing
}

#[rstest]
fn container_decode_reuses_entries_found_by_earlier_lookups() {
    let decoder = Arc::new(CountingDecoder::default());
    let options = AttachOptions::new().with_decoder(decoder.clone());
    let mut root = attach_with_options(r#"{ "a" : 1, "b" : 2 }"#.as_bytes(), options);

    root.get("a").unwrap().unwrap();
    let before = decoder.calls();

    let decoded = root.decode().unwrap();
    assert_eq!(decoded, json!({ "a": 1, "b": 2 }));
    // Full decode discovered "b" (1 key) and decoded both values (2), without
    // re-decoding the already-cached key "a".
    assert_eq!(decoder.calls(), before + 3);
}

#[derive(Debug, Deserialize, PartialEq)]
struct CastingCost {
    red: u8,
    colorless: u8,
}

#[rstest]
fn decodes_into_concrete_types() {
    let input = r#"{ "name" : "Shivan Dragon", "casting_cost" : { "red" : 2, "colorless" : 4 } }"#;

    let mut root = attach_str(input);
    let cost: CastingCost = root
        .get("casting_cost")
        .unwrap()
        .unwrap()
        .decode_as()
        .unwrap();
    assert_eq!(
        cost,
        CastingCost {
            red: 2,
            colorless: 4
        }
    );

    #[derive(Debug, Deserialize)]
    struct Card {
        name: String,
        casting_cost: CastingCost,
    }
    let card: Card = lazy_json::from_str(input).unwrap();
    assert_eq!(card.name, "Shivan Dragon");
    assert_eq!(card.casting_cost.red, 2);
}

#[rstest]
fn decoder_failures_surface_verbatim() {
    let mut root = attach_str(r#"{ "a" : not_json }"#);
    let err = root.get("a").unwrap().unwrap().decode().unwrap_err();
    match err {
        lazy_json::Error::Decode { source, .. } => {
            assert!(source.is::<serde_json::Error>());
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}
