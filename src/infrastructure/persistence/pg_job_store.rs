use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobFilter, JobMutator, JobRepository, RepositoryError};
use crate::domain::{JobId, JobStatus, JobSummary, ResearchJob};

/// Postgres-backed job store. The full record lives in a JSONB column with
/// status/query/timestamps broken out for filtering; `update` runs a
/// read-modify-write inside a transaction with a row lock so concurrent
/// updates to the same job serialize.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS research_jobs (
                id UUID PRIMARY KEY,
                record JSONB NOT NULL,
                status TEXT NOT NULL,
                query TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    fn decode(value: serde_json::Value) -> Result<ResearchJob, RepositoryError> {
        serde_json::from_value(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    fn encode(job: &ResearchJob) -> Result<serde_json::Value, RepositoryError> {
        serde_json::to_value(job).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl JobRepository for PgJobStore {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &ResearchJob) -> Result<(), RepositoryError> {
        let record = Self::encode(job)?;
        sqlx::query(
            r#"
            INSERT INTO research_jobs (id, record, status, query, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(record)
        .bind(job.status.as_str())
        .bind(&job.request.query)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<ResearchJob>, RepositoryError> {
        let row = sqlx::query("SELECT record FROM research_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => {
                let record: serde_json::Value = row
                    .try_get("record")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                Ok(Some(Self::decode(record)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, mutator), fields(job_id = %id))]
    async fn update(&self, id: JobId, mutator: JobMutator) -> Result<ResearchJob, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let row = sqlx::query("SELECT record FROM research_jobs WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .ok_or(RepositoryError::NotFound(id))?;

        let record: serde_json::Value = row
            .try_get("record")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let mut job = Self::decode(record)?;

        mutator(&mut job)?;
        job.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE research_jobs
            SET record = $2, status = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(Self::encode(&job)?)
        .bind(job.status.as_str())
        .bind(job.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(job)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: JobFilter) -> Result<Vec<JobSummary>, RepositoryError> {
        let limit = filter.limit.map(|l| l as i64).unwrap_or(i64::MAX);
        let offset = filter.offset as i64;

        let rows = match filter.status {
            Some(status) => {
                sqlx::query(
                    r#"
                    SELECT id, query, status, created_at, updated_at
                    FROM research_jobs
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, query, status, created_at, updated_at
                    FROM research_jobs
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let query: String = row
                    .try_get("query")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let status: String = row
                    .try_get("status")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let created_at: DateTime<Utc> = row
                    .try_get("created_at")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let updated_at: DateTime<Utc> = row
                    .try_get("updated_at")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let status = status
                    .parse::<JobStatus>()
                    .map_err(RepositoryError::QueryFailed)?;

                Ok(JobSummary {
                    id: JobId::from_uuid(id),
                    query,
                    status,
                    created_at,
                    updated_at,
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn delete(&self, id: JobId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM research_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
