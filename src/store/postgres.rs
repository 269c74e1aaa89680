//! PostgreSQL-backed store. The table lives in the schema named by `TURKEY_SCHEMA`.

use super::TurkeyStore;
use crate::error::StoreError;
use crate::model::{parse_id, NewTurkey, Turkey, TurkeyPatch};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use tokio::sync::OnceCell;
use uuid::Uuid;

const COLUMNS: &str = "id, species, location, created_at, updated_at";

pub struct PgTurkeyStore {
    pool: PgPool,
    schema: String,
    table: String,
    initialized: OnceCell<()>,
}

impl PgTurkeyStore {
    /// `schema` must already be a validated identifier (see [`crate::config::Config`]).
    pub fn new(pool: PgPool, schema: &str) -> Self {
        Self {
            pool,
            schema: schema.to_string(),
            table: format!("{}.turkeys", schema),
            initialized: OnceCell::new(),
        }
    }

    async fn create_table(&self) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", self.schema))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                species TEXT NOT NULL UNIQUE CHECK (species <> ''),
                location TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await.map_err(map_db_error)?;
        tracing::info!(table = %self.table, "turkey table ready");
        Ok(())
    }
}

#[async_trait]
impl TurkeyStore for PgTurkeyStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.initialized
            .get_or_try_init(|| self.create_table())
            .await
            .map(|_| ())
    }

    async fn save(&self, draft: NewTurkey) -> Result<Turkey, StoreError> {
        draft.validate()?;
        let sql = format!(
            "INSERT INTO {} (id, species, location) VALUES ($1, $2, $3) RETURNING {}",
            self.table, COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Turkey>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.species)
            .bind(&draft.location)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_one(&self, id: Option<&str>) -> Result<Option<Turkey>, StoreError> {
        let row = match id {
            Some(id) => {
                let id = parse_id(id)?;
                let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, self.table);
                tracing::debug!(sql = %sql, id = %id, "query");
                sqlx::query_as::<_, Turkey>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM {} ORDER BY created_at, id LIMIT 1",
                    COLUMNS, self.table
                );
                tracing::debug!(sql = %sql, "query");
                sqlx::query_as::<_, Turkey>(&sql).fetch_optional(&self.pool).await
            }
        };
        row.map_err(map_db_error)
    }

    async fn update_by_id(&self, id: &str, patch: TurkeyPatch) -> Result<Option<Turkey>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let sql = format!(
            "UPDATE {} SET species = COALESCE($2, species), location = COALESCE($3, location), \
             updated_at = NOW() WHERE id = $1 RETURNING {}",
            self.table, COLUMNS
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, Turkey>(&sql)
            .bind(id)
            .bind(&patch.species)
            .bind(&patch.location)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn remove_by_id(&self, id: &str) -> Result<Option<Turkey>, StoreError> {
        let id = parse_id(id)?;
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", self.table, COLUMNS);
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, Turkey>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_db_error)
    }
}

/// Kind for a PostgreSQL SQLSTATE, if it has a fixed HTTP meaning.
fn kind_for_sqlstate(code: &str, message: &str) -> Option<StoreError> {
    match code {
        "23505" => Some(StoreError::DuplicateKey(message.to_string())),
        "23502" | "23514" => Some(StoreError::Validation(message.to_string())),
        "22P02" => Some(StoreError::InvalidId(message.to_string())),
        "28000" | "28P01" | "42501" => Some(StoreError::Unauthorized(message.to_string())),
        _ => None,
    }
}

/// Classify driver errors structurally; anything unrecognised stays a raw database error.
fn map_db_error(err: sqlx::Error) -> StoreError {
    let classified = match &err {
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| kind_for_sqlstate(&code, db.message())),
        _ => None,
    };
    classified.unwrap_or(StoreError::Database(err))
}

/// Create the database named in `database_url` if it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(map_db_error)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(map_db_error)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(map_db_error)?;
    }
    Ok(())
}

/// Split a connection URL into the admin URL (same server, `postgres` database) and
/// the target database name. A URL without a database path yields an empty name.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let authority_start = url
        .find("://")
        .map(|i| i + 3)
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL: missing scheme".into()))?;
    let rest = url.get(authority_start..).unwrap_or("");
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let base = url.get(..authority_start + authority_end).unwrap_or(url);
    let after_authority = rest.get(authority_end..).unwrap_or("");
    let db_name = after_authority
        .strip_prefix('/')
        .and_then(|path| path.split('?').next())
        .unwrap_or("")
        .trim();
    Ok((format!("{}/postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
