use crate::{CoreError, ReattachData};

#[test]
fn test_reattach_from_columns_empty() {
    assert_eq!(ReattachData::from_columns(None, None).unwrap(), None);
}

#[test]
fn test_reattach_from_columns_pid() {
    let data = ReattachData::from_columns(Some(4242), None).unwrap().unwrap();
    assert_eq!(data, ReattachData::Pid(4242));
    assert_eq!(data.pid(), Some(4242));
    assert_eq!(data.unit(), None);
}

#[test]
fn test_reattach_from_columns_unit() {
    let data = ReattachData::from_columns(None, Some("gs-arena.service".to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(data.unit(), Some("gs-arena.service"));
    assert_eq!(data.pid(), None);
}

#[test]
fn test_reattach_from_columns_rejects_both() {
    let result = ReattachData::from_columns(Some(1), Some("unit".to_string()));
    assert!(matches!(result, Err(CoreError::InvalidReattachData { .. })));
}

#[test]
fn test_reattach_from_columns_rejects_negative_pid() {
    assert!(ReattachData::from_columns(Some(-5), None).is_err());
}
