use async_graphql::{EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema};
use async_graphql_rocket::{GraphQLQuery, GraphQLRequest, GraphQLResponse};
use rocket::State;

use crate::cors::CheckedOrigin;
use crate::database::ScoreRecord;
use crate::score::ScoreInput;
use crate::service::ScoreService;

pub type ScoreSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Served over `GET`, which must never write.
pub type ReadOnlySchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot {
    service: ScoreService,
}

#[Object]
impl QueryRoot {
    /// The ten best runs, ordered by score, time survived and difficulty reached.
    async fn get_leaderboard(&self) -> async_graphql::Result<Vec<ScoreRecord>> {
        self.service
            .get_leaderboard()
            .await
            .map_err(|error| error.extend())
    }
}

pub struct MutationRoot {
    service: ScoreService,
}

#[Object]
impl MutationRoot {
    /// Records a finished run and returns it as stored.
    async fn submit_score(&self, input: ScoreInput) -> async_graphql::Result<ScoreRecord> {
        self.service
            .submit_score(input)
            .await
            .map_err(|error| error.extend())
    }
}

pub fn build_schema(service: ScoreService) -> ScoreSchema {
    Schema::new(
        QueryRoot {
            service: service.clone(),
        },
        MutationRoot { service },
        EmptySubscription,
    )
}

pub fn build_read_only_schema(service: ScoreService) -> ReadOnlySchema {
    Schema::new(QueryRoot { service }, EmptyMutation, EmptySubscription)
}

#[rocket::post("/graphql", data = "<request>", format = "application/json")]
pub async fn graphql_request(
    _origin: CheckedOrigin,
    schema: &State<ScoreSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    request.execute(schema.inner()).await
}

#[rocket::get("/graphql?<query..>")]
pub async fn graphql_query(
    _origin: CheckedOrigin,
    schema: &State<ReadOnlySchema>,
    query: GraphQLQuery,
) -> GraphQLResponse {
    query.execute(schema.inner()).await
}
