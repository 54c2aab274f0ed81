#![allow(dead_code)]

use gs_core::{InstanceKey, VersionDescriptor};
use gs_db::{Database, InstanceRecordRepository};

/// In-memory database with migrations applied
pub async fn create_test_database() -> Database {
    Database::in_memory()
        .await
        .expect("Failed to create test database")
}

pub async fn create_test_repository() -> InstanceRecordRepository {
    let database = create_test_database().await;
    InstanceRecordRepository::new(database.pool().clone())
}

pub fn key(value: &str) -> InstanceKey {
    InstanceKey::new(value).expect("valid test key")
}

pub fn version(id: &str) -> VersionDescriptor {
    VersionDescriptor::new(id).with_artifact(
        "linux-x86_64",
        format!("https://cdn.example.com/{id}/server.zip"),
        "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
    )
}
