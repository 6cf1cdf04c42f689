use shared_handle::SharedHandle;
use test_case::test_case;

#[test_case(SharedHandle::new(42), "42"; "owning")]
#[test_case(SharedHandle::empty(), "null"; "empty")]
fn serialize(handle: SharedHandle<i64>, expected: &str) {
    assert_eq!(serde_json::to_string(&handle).unwrap(), expected);
}

#[test]
fn serialize_unsized() {
    let handle = SharedHandle::<[i64]>::from(vec![1, 2, 3]);

    assert_eq!(serde_json::to_string(&handle).unwrap(), "[1,2,3]");
}

#[test]
fn shared_values_are_serialized_by_each_handle() {
    let a = SharedHandle::new(String::from("shared"));
    let pair = vec![a.clone(), a];

    assert_eq!(serde_json::to_string(&pair).unwrap(), r#"["shared","shared"]"#);
}

#[test]
fn deserialize_owning() {
    let handle: SharedHandle<Vec<i64>> = serde_json::from_str("[1,2]").unwrap();

    assert_eq!(*handle, [1, 2]);
    assert_eq!(SharedHandle::refs(&handle), 1);
}

#[test]
fn deserialize_null_is_empty() {
    let handle: SharedHandle<i64> = serde_json::from_str("null").unwrap();

    assert!(SharedHandle::is_empty(&handle));
}

#[test]
fn null_value_comes_back_as_an_empty_handle() {
    let handle = SharedHandle::new(None::<i64>);

    let json = serde_json::to_string(&handle).unwrap();
    let deserialized: SharedHandle<Option<i64>> = serde_json::from_str(&json).unwrap();

    assert_eq!(json, "null");
    assert!(SharedHandle::is_empty(&deserialized));
    assert_eq!(SharedHandle::refs(&deserialized), 0);
}
