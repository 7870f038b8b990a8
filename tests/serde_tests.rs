#![cfg(feature = "serde")]

//! Integration tests for serde support in ordtree.
//!
//! These tests verify that TreeMap and Pair serialize and deserialize
//! through serde_json.

use ordtree::map::TreeMap;
use ordtree::pair::Pair;
use ordtree::tree::Greater;
use rstest::rstest;

// =============================================================================
// TreeMap
// =============================================================================

#[rstest]
fn test_treemap_serializes_in_key_order() {
    let map: TreeMap<String, i32> = [("b", 2), ("c", 3), ("a", 1)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
}

#[rstest]
fn test_treemap_json_roundtrip() {
    let original: TreeMap<String, Vec<i32>> = (0..20)
        .map(|index| (format!("key{index:02}"), vec![index; 3]))
        .collect();
    let json = serde_json::to_string(&original).unwrap();
    let restored: TreeMap<String, Vec<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(original, restored);
    assert!(restored.validate().is_ok());
}

#[rstest]
fn test_treemap_deserialize_unsorted_input() {
    let json = r#"{"z":26,"m":13,"a":1}"#;
    let map: TreeMap<String, i32> = serde_json::from_str(json).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "m", "z"]);
    assert!(map.validate().is_ok());
}

#[rstest]
fn test_treemap_deserialize_duplicate_keeps_first() {
    let json = r#"{"a":1,"a":2}"#;
    let map: TreeMap<String, i32> = serde_json::from_str(json).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"a".to_string()), Some(&1));
}

#[rstest]
fn test_treemap_deserialize_empty() {
    let map: TreeMap<String, i32> = serde_json::from_str("{}").unwrap();
    assert!(map.is_empty());
}

#[rstest]
fn test_treemap_with_comparator_roundtrip() {
    let mut map = TreeMap::with_comparator(Greater);
    map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"3":"c","2":"b","1":"a"}"#);
    let restored: TreeMap<i32, char, Greater> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);
}

#[rstest]
fn test_treemap_rejects_sequence() {
    let result: Result<TreeMap<String, i32>, _> = serde_json::from_str("[1, 2]");
    assert!(result.is_err());
}

// =============================================================================
// Pair
// =============================================================================

#[rstest]
fn test_pair_is_a_tuple() {
    let pair = Pair::new("key".to_string(), 7);
    let json = serde_json::to_string(&pair).unwrap();
    assert_eq!(json, r#"["key",7]"#);
    let restored: Pair<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, pair);
}
