use chrono::Utc;
use drill_core::model::{AttemptRecord, ModuleId, UserId, UserProgress};
use sqlx::Row;

use super::{
    SqliteRepository,
    mapping::{conn, decode_progress, encode_progress, map_attempt_row, u64_to_i64, user_key},
};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, user_id: UserId) -> Result<Option<UserProgress>, StorageError> {
        let row = sqlx::query("SELECT progress_json FROM user_progress WHERE user_id = ?1")
            .bind(user_key(user_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let json: String = row.try_get("progress_json").map_err(conn)?;
                decode_progress(&json).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn record_attempt(
        &self,
        user_id: UserId,
        attempt: &AttemptRecord,
    ) -> Result<UserProgress, StorageError> {
        let user = user_key(user_id);
        let time_spent = u64_to_i64("time_spent_seconds", attempt.time_spent_seconds())?;

        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO attempts (user_id, module_id, score, time_spent_seconds, completed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(&user)
        .bind(attempt.module_id().as_str())
        .bind(i64::from(attempt.score()))
        .bind(time_spent)
        .bind(attempt.completed_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        let existing = sqlx::query("SELECT progress_json FROM user_progress WHERE user_id = ?1")
            .bind(&user)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;

        let mut progress = match existing {
            Some(row) => {
                let json: String = row.try_get("progress_json").map_err(conn)?;
                decode_progress(&json)?
            }
            None => UserProgress::new(),
        };
        progress.record_attempt(attempt);

        sqlx::query(
            r"
                INSERT INTO user_progress (user_id, progress_json, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(user_id) DO UPDATE SET
                    progress_json = excluded.progress_json,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(&user)
        .bind(encode_progress(&progress)?)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;

        tracing::debug!(
            user = %user_id,
            module = %attempt.module_id(),
            score = attempt.score(),
            "attempt persisted"
        );
        Ok(progress)
    }

    async fn list_attempts(
        &self,
        user_id: UserId,
        module_id: Option<&ModuleId>,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT module_id, score, time_spent_seconds, completed_at
                FROM attempts
                WHERE user_id = ?1 AND (?2 IS NULL OR module_id = ?2)
                ORDER BY completed_at DESC, id DESC
                LIMIT ?3
            ",
        )
        .bind(user_key(user_id))
        .bind(module_id.map(ModuleId::as_str))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
