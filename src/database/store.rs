use chrono::Utc;

use super::*;

const LEADERBOARD_ORDER: &str = "score DESC, timeSurvived DESC, difficultyReached DESC, id ASC";

/// Hand-written queries over the `scores` table.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    pool: DatabasePool,
}

impl ScoreStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Writes `score` in its own transaction and returns the stored row,
    /// including the generated `id` and `createdAt`.
    pub async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError> {
        let mut transaction = self.pool.begin().await?;

        let record = sqlx::query_as::<_, ScoreRecord>(
            "INSERT INTO scores (playerName, score, timeSurvived, maxSnakeLength, difficultyReached, createdAt)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, playerName, score, timeSurvived, maxSnakeLength, difficultyReached, createdAt",
        )
        .bind(&score.player_name)
        .bind(score.score)
        .bind(score.time_survived)
        .bind(score.max_snake_length)
        .bind(score.difficulty_reached)
        .bind(Utc::now())
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;

        tracing::debug!(id = record.id, score = record.score, "stored score");
        Ok(record)
    }

    /// Returns at most `limit` records, best first: score, then time survived,
    /// then difficulty reached, all descending.
    pub async fn top_by_score(&self, limit: i64) -> Result<Vec<ScoreRecord>, StorageError> {
        let records = sqlx::query_as::<_, ScoreRecord>(&format!(
            "SELECT * FROM scores ORDER BY {} LIMIT ?",
            LEADERBOARD_ORDER
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// The whole table ordered by score, then time survived, both descending.
    pub async fn all_ordered_by_score_then_time(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            "SELECT * FROM scores ORDER BY score DESC, timeSurvived DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
