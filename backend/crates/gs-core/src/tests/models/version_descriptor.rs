use crate::VersionDescriptor;

#[test]
fn test_version_descriptor_artifact_lookup() {
    let version = VersionDescriptor::new("1.4.0").with_artifact(
        "linux-x86_64",
        "https://cdn.example.com/1.4.0/linux.zip",
        "ab12",
    );

    let artifact = version.artifact("linux-x86_64").unwrap();
    assert_eq!(artifact.url, "https://cdn.example.com/1.4.0/linux.zip");
    assert_eq!(artifact.checksum, "ab12");
    assert!(version.artifact("windows-x86_64").is_none());
}

#[test]
fn test_version_descriptor_deserializes_without_artifacts() {
    let version: VersionDescriptor = serde_json::from_str(r#"{"version":"2.0"}"#).unwrap();
    assert_eq!(version.version, "2.0");
    assert!(version.artifacts.is_empty());
    assert!(version.launch_overrides.is_empty());
}

#[test]
fn test_version_descriptor_omits_empty_launch_overrides() {
    let plain = serde_json::to_value(VersionDescriptor::new("1.0")).unwrap();
    assert!(plain.get("launch_overrides").is_none());

    let with_override =
        VersionDescriptor::new("1.0").with_launch_override("client_url", "https://cdn/c.zip");
    let json = serde_json::to_value(&with_override).unwrap();
    assert_eq!(json["launch_overrides"]["client_url"], "https://cdn/c.zip");
}

#[test]
fn test_host_platform_format() {
    let platform = VersionDescriptor::host_platform();
    assert!(platform.starts_with(std::env::consts::OS));
    assert!(platform.ends_with(std::env::consts::ARCH));
}
