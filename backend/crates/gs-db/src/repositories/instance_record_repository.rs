use crate::{DbError, Result};

use gs_core::{InstanceKey, InstanceRecord, ReattachData, VersionDescriptor};

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

const SELECT_COLUMNS: &str = r#"
    SELECT instance_key, version_json, secret_token, reattach_pid, reattach_unit, updated_at
    FROM gs_instance_records
"#;

#[derive(FromRow)]
struct InstanceRecordRow {
    instance_key: String,
    version_json: Option<String>,
    secret_token: Option<String>,
    reattach_pid: Option<i64>,
    reattach_unit: Option<String>,
    updated_at: i64,
}

impl InstanceRecordRow {
    fn into_record(self) -> Result<InstanceRecord> {
        let key = InstanceKey::new(&self.instance_key)
            .map_err(|e| DbError::corrupt(&self.instance_key, e.to_string()))?;

        let current_version = self
            .version_json
            .as_deref()
            .map(serde_json::from_str::<VersionDescriptor>)
            .transpose()?;

        let reattach = ReattachData::from_columns(self.reattach_pid, self.reattach_unit)
            .map_err(|e| DbError::corrupt(&self.instance_key, e.to_string()))?;

        let updated_at = DateTime::from_timestamp(self.updated_at, 0).ok_or_else(|| {
            DbError::corrupt(
                &self.instance_key,
                format!("invalid updated_at {}", self.updated_at),
            )
        })?;

        Ok(InstanceRecord {
            key,
            current_version,
            secret_token: self.secret_token,
            reattach,
            updated_at,
        })
    }
}

/// Per-instance persisted record. Every write is a single upsert so a row
/// is never observed half-updated.
#[derive(Clone)]
pub struct InstanceRecordRepository {
    pool: SqlitePool,
}

impl InstanceRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, key: &InstanceKey) -> Result<Option<InstanceRecord>> {
        let row = sqlx::query_as::<_, InstanceRecordRow>(&format!(
            "{SELECT_COLUMNS} WHERE instance_key = ?"
        ))
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(InstanceRecordRow::into_record).transpose()
    }

    /// Create an empty record if none exists, then return the stored record.
    pub async fn ensure(&self, key: &InstanceKey) -> Result<InstanceRecord> {
        sqlx::query(
            r#"
            INSERT INTO gs_instance_records (instance_key, updated_at)
            VALUES (?, ?)
            ON CONFLICT(instance_key) DO NOTHING
            "#,
        )
        .bind(key.as_str())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        self.find(key).await?.ok_or_else(|| {
            DbError::corrupt(key.as_str(), "record missing immediately after insert")
        })
    }

    pub async fn set_secret(&self, key: &InstanceKey, secret: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO gs_instance_records (instance_key, secret_token, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(instance_key) DO UPDATE SET
                secret_token = excluded.secret_token,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(secret)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_version(&self, key: &InstanceKey, version: &VersionDescriptor) -> Result<()> {
        let version_json = serde_json::to_string(version)?;

        sqlx::query(
            r#"
            INSERT INTO gs_instance_records (instance_key, current_version, version_json, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(instance_key) DO UPDATE SET
                current_version = excluded.current_version,
                version_json = excluded.version_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(&version.version)
        .bind(version_json)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_reattach(&self, key: &InstanceKey, data: &ReattachData) -> Result<()> {
        let pid = data.pid().map(i64::from);
        let unit = data.unit();

        sqlx::query(
            r#"
            INSERT INTO gs_instance_records (instance_key, reattach_pid, reattach_unit, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(instance_key) DO UPDATE SET
                reattach_pid = excluded.reattach_pid,
                reattach_unit = excluded.reattach_unit,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(pid)
        .bind(unit)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn clear_reattach(&self, key: &InstanceKey) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE gs_instance_records
            SET reattach_pid = NULL, reattach_unit = NULL, updated_at = ?
            WHERE instance_key = ?
            "#,
        )
        .bind(Utc::now().timestamp())
        .bind(key.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<InstanceRecord>> {
        let rows = sqlx::query_as::<_, InstanceRecordRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY instance_key ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(InstanceRecordRow::into_record)
            .collect()
    }
}
