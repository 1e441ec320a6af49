use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use groundwork_application::{PolicyFilter, PolicyRecord, PolicyRepository};
use groundwork_core::{AppError, AppResult};
use groundwork_domain::{PolicyTuple, PolicyType};

use super::{PostgresBootstrapStore, row_count};

#[derive(Debug, FromRow)]
struct PolicyRow {
    id: Uuid,
    ptype: String,
    v0: String,
    v1: String,
    v2: String,
    v3: String,
    v4: String,
    v5: String,
}

impl TryFrom<PolicyRow> for PolicyRecord {
    type Error = AppError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        let ptype = PolicyType::parse(row.ptype.as_str()).ok_or_else(|| {
            AppError::Internal(format!(
                "policy '{}' has unknown type '{}'",
                row.id, row.ptype
            ))
        })?;

        Ok(Self {
            policy_id: row.id,
            tuple: PolicyTuple {
                ptype,
                v0: row.v0,
                v1: row.v1,
                v2: row.v2,
                v3: row.v3,
                v4: row.v4,
                v5: row.v5,
            },
        })
    }
}

#[async_trait]
impl PolicyRepository for PostgresBootstrapStore {
    async fn count_policies(&self, filter: &PolicyFilter) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM policy_rules
            WHERE ($1::TEXT IS NULL OR ptype = $1)
              AND ($2::TEXT IS NULL OR v0 = $2)
            "#,
        )
        .bind(filter.ptype.map(|ptype| ptype.as_str()))
        .bind(filter.subject.as_deref())
        .fetch_one(&self.pool)
        .await
        .map(row_count)
        .map_err(|error| AppError::Internal(format!("failed to count policies: {error}")))
    }

    async fn find_policy(&self, tuple: &PolicyTuple) -> AppResult<Option<PolicyRecord>> {
        sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, ptype, v0, v1, v2, v3, v4, v5
            FROM policy_rules
            WHERE ptype = $1
              AND v0 = $2 AND v1 = $3 AND v2 = $4
              AND v3 = $5 AND v4 = $6 AND v5 = $7
            LIMIT 1
            "#,
        )
        .bind(tuple.ptype.as_str())
        .bind(tuple.v0.as_str())
        .bind(tuple.v1.as_str())
        .bind(tuple.v2.as_str())
        .bind(tuple.v3.as_str())
        .bind(tuple.v4.as_str())
        .bind(tuple.v5.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find policy '{tuple}': {error}")))?
        .map(PolicyRecord::try_from)
        .transpose()
    }

    async fn create_policy(&self, tuple: PolicyTuple) -> AppResult<PolicyRecord> {
        let policy_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO policy_rules (id, ptype, v0, v1, v2, v3, v4, v5)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(policy_id)
        .bind(tuple.ptype.as_str())
        .bind(tuple.v0.as_str())
        .bind(tuple.v1.as_str())
        .bind(tuple.v2.as_str())
        .bind(tuple.v3.as_str())
        .bind(tuple.v4.as_str())
        .bind(tuple.v5.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create policy '{tuple}': {error}"))
        })?;

        Ok(PolicyRecord { policy_id, tuple })
    }

    async fn list_policies(&self, filter: &PolicyFilter) -> AppResult<Vec<PolicyRecord>> {
        sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, ptype, v0, v1, v2, v3, v4, v5
            FROM policy_rules
            WHERE ($1::TEXT IS NULL OR ptype = $1)
              AND ($2::TEXT IS NULL OR v0 = $2)
            ORDER BY ptype DESC, created_at, id
            "#,
        )
        .bind(filter.ptype.map(|ptype| ptype.as_str()))
        .bind(filter.subject.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list policies: {error}")))?
        .into_iter()
        .map(PolicyRecord::try_from)
        .collect()
    }
}
