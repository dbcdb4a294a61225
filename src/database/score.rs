use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};

use super::ScoreId;

/// One stored game run. Rows are written once and never change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SimpleObject, sqlx::FromRow)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
#[graphql(name = "Score")]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub player_name: String,
    pub score: i32,
    pub time_survived: i32,
    pub max_snake_length: i32,
    pub difficulty_reached: i32,
    pub created_at: DateTime<Utc>,
}

/// A score ready to be written. `id` and `created_at` are left to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewScore {
    pub player_name: String,
    pub score: i32,
    pub time_survived: i32,
    pub max_snake_length: i32,
    pub difficulty_reached: i32,
}
