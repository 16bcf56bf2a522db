//! SQLite implementation of `ZoneRepository`.
use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::repository::ZoneRepository;
use crate::zone::{Domain, Record, RecordKind, RecordTemplate, ZoneTemplate};

#[derive(Clone)]
pub struct SqliteZoneRepository {
    db: SqlitePool,
}

impl SqliteZoneRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn record_templates_of(&self, template_id: i64) -> AppResult<Vec<RecordTemplate>> {
        let rows = sqlx::query(
            r#"
            SELECT zone_template_id, kind, name, content, priority, ttl
            FROM record_templates
            WHERE zone_template_id = ?
            ORDER BY id
            "#,
        )
        .bind(template_id)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(record_template_from_row).collect()
    }

    async fn load_template(&self, row: Option<SqliteRow>) -> AppResult<Option<ZoneTemplate>> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut template = zone_template_from_row(&row)?;
        template.record_templates = self.record_templates_of(row.get("id")).await?;
        Ok(Some(template))
    }
}

/// Narrow an INTEGER column into the domain type.
fn narrow<T: TryFrom<i64>>(value: i64, column: &str) -> AppResult<T> {
    T::try_from(value).map_err(|_| AppError::Internal(anyhow!("{column} out of range: {value}")))
}

fn narrow_opt<T: TryFrom<i64>>(value: Option<i64>, column: &str) -> AppResult<Option<T>> {
    value.map(|v| narrow(v, column)).transpose()
}

fn kind_from_row(row: &SqliteRow) -> AppResult<RecordKind> {
    let kind: String = row.get("kind");
    kind.parse::<RecordKind>()
        .map_err(|e| AppError::Internal(anyhow!("stored record kind: {e}")))
}

fn zone_template_from_row(row: &SqliteRow) -> AppResult<ZoneTemplate> {
    Ok(ZoneTemplate {
        id: Some(row.get("id")),
        name: row.get("name"),
        ttl: Some(narrow(row.get("ttl"), "ttl")?),
        user: row.get("user_id"),
        record_templates: Vec::new(),
    })
}

fn record_template_from_row(row: &SqliteRow) -> AppResult<RecordTemplate> {
    Ok(RecordTemplate {
        kind: kind_from_row(row)?,
        name: row.get("name"),
        content: row.get("content"),
        priority: narrow_opt(row.get("priority"), "priority")?,
        ttl: narrow_opt(row.get("ttl"), "ttl")?,
    })
}

fn record_from_row(row: &SqliteRow) -> AppResult<Record> {
    Record::new(
        kind_from_row(row)?,
        row.get::<String, _>("name"),
        row.get::<String, _>("content"),
        narrow_opt(row.get("priority"), "priority")?,
        narrow_opt(row.get("ttl"), "ttl")?,
    )
    .map_err(|e| AppError::Internal(anyhow!("stored record: {e}")))
}

async fn insert_record_templates(
    tx: &mut Transaction<'_, Sqlite>,
    template_id: i64,
    records: &[RecordTemplate],
) -> sqlx::Result<()> {
    for rt in records {
        sqlx::query(
            r#"
            INSERT INTO record_templates (zone_template_id, kind, name, content, priority, ttl)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(template_id)
        .bind(rt.kind.as_str())
        .bind(&rt.name)
        .bind(&rt.content)
        .bind(rt.priority.map(i64::from))
        .bind(rt.ttl.map(i64::from))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ZoneRepository for SqliteZoneRepository {
    async fn find_zone_template_by_name(&self, name: &str) -> AppResult<Option<ZoneTemplate>> {
        let row = sqlx::query("SELECT id, name, ttl, user_id FROM zone_templates WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.db)
            .await?;
        self.load_template(row).await
    }

    async fn find_zone_template_by_id(&self, id: i64) -> AppResult<Option<ZoneTemplate>> {
        let row = sqlx::query("SELECT id, name, ttl, user_id FROM zone_templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        self.load_template(row).await
    }

    async fn save_zone_template(&self, template: &ZoneTemplate) -> AppResult<i64> {
        let ttl = template.ttl.map(i64::from);
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let id = match template.id {
            None => sqlx::query(
                r#"
                INSERT INTO zone_templates (name, ttl, user_id, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&template.name)
            .bind(ttl)
            .bind(template.user)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
            Some(id) => {
                let res = sqlx::query(
                    r#"
                    UPDATE zone_templates
                    SET name = ?, ttl = ?, user_id = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&template.name)
                .bind(ttl)
                .bind(template.user)
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
                if res.rows_affected() == 0 {
                    return Err(AppError::not_found(format!("zone template #{id}")));
                }
                sqlx::query("DELETE FROM record_templates WHERE zone_template_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                id
            }
        };

        insert_record_templates(&mut tx, id, &template.record_templates).await?;
        tx.commit().await?;

        debug!(template = %template.name, id, "saved zone template");
        Ok(id)
    }

    async fn delete_zone_template(&self, id: i64) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM zone_templates WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_zone_templates(&self) -> AppResult<Vec<ZoneTemplate>> {
        let rows = sqlx::query("SELECT id, name, ttl, user_id FROM zone_templates ORDER BY name")
            .fetch_all(&self.db)
            .await?;
        let mut templates = rows
            .iter()
            .map(zone_template_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        let rows = sqlx::query(
            r#"
            SELECT zone_template_id, kind, name, content, priority, ttl
            FROM record_templates
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_template: HashMap<i64, Vec<RecordTemplate>> = HashMap::new();
        for row in &rows {
            by_template
                .entry(row.get("zone_template_id"))
                .or_default()
                .push(record_template_from_row(row)?);
        }
        for template in &mut templates {
            if let Some(records) = template.id.and_then(|id| by_template.remove(&id)) {
                template.record_templates = records;
            }
        }

        Ok(templates)
    }

    async fn save_domain(&self, domain: &Domain) -> AppResult<i64> {
        let mut tx = self.db.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO domains (name, ttl, user_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&domain.name)
        .bind(i64::from(domain.ttl))
        .bind(domain.user)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for record in &domain.records {
            sqlx::query(
                r#"
                INSERT INTO records (domain_id, kind, name, content, priority, ttl)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(record.kind().as_str())
            .bind(&record.name)
            .bind(&record.content)
            .bind(record.priority.map(i64::from))
            .bind(record.ttl.map(i64::from))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(domain = %domain.name, id, records = domain.records.len(), "saved domain");
        Ok(id)
    }

    async fn find_domain_by_name(&self, name: &str) -> AppResult<Option<Domain>> {
        let row = sqlx::query("SELECT id, name, ttl, user_id FROM domains WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.db)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.get("id");
        let rows = sqlx::query(
            r#"
            SELECT kind, name, content, priority, ttl
            FROM records
            WHERE domain_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(Domain {
            id: Some(id),
            name: row.get("name"),
            ttl: narrow(row.get("ttl"), "ttl")?,
            user: row.get("user_id"),
            records: rows.iter().map(record_from_row).collect::<AppResult<_>>()?,
        }))
    }
}
