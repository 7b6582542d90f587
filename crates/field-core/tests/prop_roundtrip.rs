//! Property tests over arbitrary JSON-shaped values.

use std::collections::BTreeMap;

use field_core::{convert, Field};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use serde::Serialize;
use serde_json::Value;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-1_000_000i32..1_000_000).prop_map(|n| Value::from(f64::from(n) / 100.0)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

#[derive(Serialize, Debug, Clone)]
struct Reading {
    signed: i32,
    wide: i64,
    unsigned: u16,
    ratio: f64,
    label: String,
    flag: bool,
    samples: Vec<i64>,
    limits: BTreeMap<String, i8>,
    nested: Vec<BTreeMap<String, u32>>,
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        any::<i32>(),
        any::<i64>(),
        any::<u16>(),
        (-1_000_000i32..1_000_000).prop_map(|n| f64::from(n) / 100.0),
        "[a-z ]{0,8}",
        any::<bool>(),
        prop::collection::vec(any::<i64>(), 0..5),
        prop::collection::btree_map("[a-z]{1,4}", any::<i8>(), 0..4),
        prop::collection::vec(
            prop::collection::btree_map("[a-z]{1,4}", any::<u32>(), 0..3),
            0..3,
        ),
    )
        .prop_map(
            |(signed, wide, unsigned, ratio, label, flag, samples, limits, nested)| Reading {
                signed,
                wide,
                unsigned,
                ratio,
                label,
                flag,
                samples,
                limits,
                nested,
            },
        )
}

/// Walk a converted tree and the tree decoded from its JSON text side by
/// side. Shapes and values must match; the only tag allowed to differ is a
/// non-negative `int`, which JSON decoding reads back as `uint`.
fn assert_same_shape(direct: &Field, decoded: &Field, at: &str) -> Result<(), TestCaseError> {
    match (direct, decoded) {
        (Field::Map(a), Field::Map(b)) => {
            prop_assert_eq!(
                a.keys().collect::<Vec<_>>(),
                b.keys().collect::<Vec<_>>(),
                "keys at {}",
                at
            );
            for (key, child) in a {
                assert_same_shape(child, &b[key], &format!("{at}.{key}"))?;
            }
        }
        (Field::Array(a), Field::Array(b)) => {
            prop_assert_eq!(a.len(), b.len(), "length at {}", at);
            for (index, (x, y)) in a.iter().zip(b).enumerate() {
                assert_same_shape(x, y, &format!("{at}.{index}"))?;
            }
        }
        (Field::Int(i), Field::Uint(u)) => {
            prop_assert!(*i >= 0, "negative int {} came back unsigned at {}", i, at);
            prop_assert_eq!(decoded.int().unwrap(), *i);
            prop_assert_eq!(*i as u64, *u);
        }
        (Field::Float(_), _) => {
            prop_assert_eq!(decoded.field_type(), direct.field_type(), "tag at {}", at);
            prop_assert_eq!(decoded.float().unwrap(), direct.float().unwrap());
        }
        (Field::String(_), _) => {
            prop_assert_eq!(decoded.string().unwrap(), direct.string().unwrap());
        }
        _ => {
            prop_assert_eq!(decoded.field_type(), direct.field_type(), "tag at {}", at);
            prop_assert_eq!(decoded, direct);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn typed_records_keep_their_shape_through_raw_json(reading in arb_reading()) {
        let direct = convert(&reading).unwrap();
        let decoded = Field::Bytes(serde_json::to_vec(&reading).unwrap()).bytes_to_field();
        assert_same_shape(&direct, &decoded, "$")?;

        prop_assert_eq!(decoded.get(["signed"]).int().unwrap(), i64::from(reading.signed));
        prop_assert_eq!(decoded.get(["wide"]).int().unwrap(), reading.wide);
        prop_assert_eq!(decoded.get(["unsigned"]).uint().unwrap(), u64::from(reading.unsigned));
        prop_assert_eq!(decoded.get(["ratio"]).float().unwrap(), reading.ratio);
        let label = decoded.get(["label"]);
        prop_assert_eq!(label.string().unwrap(), reading.label.as_str());
        prop_assert_eq!(decoded.get(["flag"]).bool().unwrap(), reading.flag);
        prop_assert_eq!(decoded.get(["samples"]).len(), reading.samples.len());
    }

    #[test]
    fn converting_a_field_returns_it_unchanged(value in arb_json()) {
        let tree = convert(&value).unwrap();
        prop_assert_eq!(convert(&tree).unwrap(), tree);
    }

    #[test]
    fn fields_nested_in_containers_pass_through(value in arb_json()) {
        let tree = convert(&value).unwrap();
        let wrapped = convert(&vec![tree.clone()]).unwrap();
        prop_assert_eq!(wrapped, Field::Array(vec![tree]));
    }

    #[test]
    fn raw_json_decodes_like_the_parsed_value(value in arb_json()) {
        let raw = Field::Bytes(serde_json::to_vec(&value).unwrap());
        prop_assert_eq!(raw.bytes_to_field(), convert(&value).unwrap());
    }

    #[test]
    fn dump_parses_back_to_the_same_tree(value in arb_json()) {
        let tree = convert(&value).unwrap();
        let dumped = tree.to_json().unwrap();
        prop_assert_eq!(Field::from_json(&dumped).unwrap(), tree);
    }

    #[test]
    fn integer_coercion_is_total_and_agrees_on_zero(n in any::<i64>()) {
        let field = Field::Int(n);
        prop_assert_eq!(field.int().unwrap(), n);
        prop_assert_eq!(field.uint().unwrap(), n as u64);
        prop_assert_eq!(field.bool().unwrap(), n != 0);
        prop_assert_eq!(field.uint().unwrap() == 0, !field.bool().unwrap());
    }

    #[test]
    fn float_truthiness_matches_its_value(f in any::<f64>()) {
        let field = Field::Float(f);
        prop_assert!(field.int().is_ok());
        prop_assert!(field.uint().is_ok());
        prop_assert_eq!(field.float().unwrap() != 0.0, field.bool().unwrap());
    }

    #[test]
    fn multi_segment_get_equals_chained_gets(
        tree in prop::collection::btree_map(
            "[a-c]",
            prop::collection::btree_map("[a-c]", any::<i64>(), 0..3),
            0..3,
        ),
        outer in "[a-c]",
        inner in "[a-c]",
    ) {
        let field = convert(&tree).unwrap();
        let expected: Option<&i64> = tree.get(&outer).and_then(|m: &BTreeMap<String, i64>| m.get(&inner));

        let joined = field.get([outer.as_str(), inner.as_str()]);
        let chained = field.get([outer.as_str()]).get([inner.as_str()]);
        prop_assert_eq!(joined.int().ok(), expected.copied());
        prop_assert_eq!(joined.ok().ok(), chained.ok().ok());
    }
}
