use crate::database::{NewScore, ScoreRecord, ScoreStore};
use crate::error::ServiceResult;
use crate::score::ScoreInput;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// Number of records on the leaderboard.
pub const LEADERBOARD_SIZE: i64 = 10;

#[derive(Clone, Debug)]
pub struct ScoreService {
    store: ScoreStore,
}

impl ScoreService {
    pub fn new(store: ScoreStore) -> Self {
        Self { store }
    }

    /// Stores a finished run and returns it with its generated fields.
    #[tracing::instrument(skip_all, fields(score = input.score))]
    pub async fn submit_score(&self, input: ScoreInput) -> ServiceResult<ScoreRecord> {
        let new_score = NewScore {
            player_name: resolve_player_name(input.player_name),
            score: input.score,
            time_survived: input.time_survived,
            max_snake_length: input.max_snake_length,
            difficulty_reached: input.difficulty_reached,
        };

        let record = self.store.insert(new_score).await.map_err(|error| {
            tracing::warn!(%error, "failed to store score");
            error
        })?;

        tracing::info!(id = record.id, player = %record.player_name, "score submitted");
        Ok(record)
    }

    /// The best [`LEADERBOARD_SIZE`] runs, best first.
    #[tracing::instrument(skip_all)]
    pub async fn get_leaderboard(&self) -> ServiceResult<Vec<ScoreRecord>> {
        let records = self
            .store
            .top_by_score(LEADERBOARD_SIZE)
            .await
            .map_err(|error| {
                tracing::warn!(%error, "failed to read leaderboard");
                error
            })?;
        Ok(records)
    }
}

/// Names are kept exactly as supplied; only blank ones are replaced.
pub fn resolve_player_name(player_name: Option<String>) -> String {
    match player_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => DEFAULT_PLAYER_NAME.to_owned(),
    }
}
