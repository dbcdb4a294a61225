use async_graphql::InputObject;

/// A finished run as submitted by the game client.
///
/// Numbers are taken as given: no range checks are applied to any of them.
#[derive(Clone, Debug, Default, PartialEq, InputObject)]
pub struct ScoreInput {
    /// Blank or missing names are stored as "Anonymous".
    pub player_name: Option<String>,
    pub score: i32,
    pub time_survived: i32,
    pub max_snake_length: i32,
    pub difficulty_reached: i32,
}
