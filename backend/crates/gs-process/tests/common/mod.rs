#![allow(dead_code)]

use gs_core::{InstanceKey, LaunchSpec};
use gs_db::{Database, InstanceRecordRepository};

use std::path::Path;

pub async fn create_test_repository() -> (Database, InstanceRecordRepository) {
    let database = Database::in_memory()
        .await
        .expect("Failed to create test database");
    let repository = InstanceRecordRepository::new(database.pool().clone());
    (database, repository)
}

pub fn key(value: &str) -> InstanceKey {
    InstanceKey::new(value).expect("valid test key")
}

pub fn shell(script: &str, working_dir: &Path) -> LaunchSpec {
    LaunchSpec::new("/bin/sh", working_dir).arg("-c").arg(script)
}

pub fn sleeper(working_dir: &Path) -> LaunchSpec {
    LaunchSpec::new("/bin/sleep", working_dir).arg("30")
}
