#![allow(dead_code)]

use gs_core::PlatformArtifact;
use gs_supervisor::update::sha256_hex;

use std::io::{Cursor, Write};

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const PLATFORM: &str = "linux-x86_64";

/// Build an in-memory zip archive from `(name, contents)` pairs.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Artifact entry pointing at `{server}/{file}` with the checksum of `bytes`.
pub fn artifact(server: &MockServer, file: &str, bytes: &[u8]) -> PlatformArtifact {
    PlatformArtifact {
        url: format!("{}/{file}", server.uri()),
        checksum: sha256_hex(bytes),
    }
}

pub fn manifest(version: &str, artifact: &PlatformArtifact) -> Value {
    json!({
        "version": version,
        "artifacts": { PLATFORM: artifact },
        "launch_overrides": { "map": "dust" }
    })
}

/// Serve `manifest` at `/manifest.json` and `bytes` at `/{file}`.
pub async fn serve_release(server: &MockServer, manifest: Value, file: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{file}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

pub fn manifest_url(server: &MockServer) -> String {
    format!("{}/manifest.json", server.uri())
}
