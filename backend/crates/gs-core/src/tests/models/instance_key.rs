use crate::{CoreError, InstanceKey, MAX_INSTANCE_KEY_LENGTH};

use std::str::FromStr;

#[test]
fn test_instance_key_accepts_valid_identifiers() {
    for value in ["eu-west_1", "A", "server01", "a-b_c-D"] {
        let key = InstanceKey::new(value).unwrap();
        assert_eq!(key.as_str(), value);
    }
}

#[test]
fn test_instance_key_rejects_empty() {
    let result = InstanceKey::new("");
    assert!(matches!(result, Err(CoreError::InvalidInstanceKey { .. })));
}

#[test]
fn test_instance_key_rejects_too_long() {
    let at_limit = "k".repeat(MAX_INSTANCE_KEY_LENGTH);
    assert!(InstanceKey::new(at_limit).is_ok());

    let over_limit = "k".repeat(MAX_INSTANCE_KEY_LENGTH + 1);
    assert!(InstanceKey::new(over_limit).is_err());
}

#[test]
fn test_instance_key_rejects_illegal_characters() {
    for value in ["has space", "dot.ted", "slash/key", "ünicode", "semi;colon"] {
        assert!(InstanceKey::new(value).is_err(), "{value} should be rejected");
    }
}

#[test]
fn test_instance_key_from_str() {
    let key = InstanceKey::from_str("lobby").unwrap();
    assert_eq!(key.to_string(), "lobby");
    assert!(InstanceKey::from_str("bad key").is_err());
}

#[test]
fn test_instance_key_deserialize_validates() {
    let key: InstanceKey = serde_json::from_str("\"arena-2\"").unwrap();
    assert_eq!(key.as_str(), "arena-2");

    let invalid: Result<InstanceKey, _> = serde_json::from_str("\"no/slashes\"");
    assert!(invalid.is_err());
}

#[test]
fn test_instance_key_serializes_as_plain_string() {
    let key = InstanceKey::new("arena").unwrap();
    assert_eq!(serde_json::to_string(&key).unwrap(), "\"arena\"");
}
