#![allow(clippy::unwrap_used)]

use serde_json::json;

use super::*;

#[test]
fn test_load_missing_key_returns_default() {
    let store = Store::open_in_memory();
    assert!(store.is_attached());
    assert_eq!(store.load("nope", 42_i64), 42);
    assert_eq!(store.load::<Vec<String>>("nope", Vec::new()), Vec::<String>::new());
}

#[test]
fn test_roundtrip_json_values() {
    let store = Store::open_in_memory();
    let values = [
        json!(null),
        json!(true),
        json!(1000),
        json!(12.5),
        json!("text with \"quotes\""),
        json!([1, "two", {"three": 3}]),
        json!({"nested": {"list": [], "empty": {}}}),
    ];
    for (i, v) in values.iter().enumerate() {
        let key = format!("k{i}");
        store.save(&key, v);
        let back: serde_json::Value = store.load(&key, json!("default"));
        assert_eq!(&back, v, "roundtrip failed for {v}");
    }
}

#[test]
fn test_save_overwrites() {
    let store = Store::open_in_memory();
    store.save("totalMoney", &100);
    store.save("totalMoney", &250);
    assert_eq!(store.load("totalMoney", 0), 250);
    assert_eq!(store.raw("totalMoney").as_deref(), Some("250"));
}

#[test]
fn test_corrupt_value_falls_back_to_default() {
    let store = Store::open_in_memory();
    store.put_raw("expenses", "{not json");
    let loaded: Vec<u32> = store.load("expenses", vec![7]);
    assert_eq!(loaded, vec![7]);
}

#[test]
fn test_wrong_shape_falls_back_to_default() {
    let store = Store::open_in_memory();
    store.save("totalMoney", &"a string");
    assert_eq!(store.load("totalMoney", 5_u32), 5);
}

#[test]
fn test_remove() {
    let store = Store::open_in_memory();
    store.save("expenses", &vec![1, 2, 3]);
    store.remove("expenses");
    assert_eq!(store.load::<Vec<i32>>("expenses", Vec::new()), Vec::<i32>::new());
    // Removing again is harmless
    store.remove("expenses");
}

#[test]
fn test_detached_store_is_inert() {
    let store = Store::detached();
    assert!(!store.is_attached());
    store.save("totalMoney", &10);
    store.remove("totalMoney");
    assert_eq!(store.load("totalMoney", 3), 3);
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendtui.db");
    {
        let store = Store::open(&path);
        store.save("totalMoney", &1000);
    }
    let store = Store::open(&path);
    assert_eq!(store.load("totalMoney", 0), 1000);
}

#[test]
fn test_unopenable_path_gives_detached_store() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a database file
    let store = Store::open(dir.path());
    assert!(!store.is_attached());
    assert_eq!(store.load("totalMoney", 9), 9);
}
