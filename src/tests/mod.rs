use rocket::{
    http::{Header, Status},
    local::asynchronous::{Client, LocalResponse},
    serde::json::{json, serde_json, Value},
};

use crate::{config::ServerConfig, database::ScoreRecord};

const SUBMIT_SCORE: &str = "mutation SubmitScore($input: ScoreInput!) {
    submitScore(input: $input) {
        id playerName score timeSurvived maxSnakeLength difficultyReached createdAt
    }
}";

const GET_LEADERBOARD: &str = "query GetLeaderboard {
    getLeaderboard {
        id playerName score timeSurvived maxSnakeLength difficultyReached createdAt
    }
}";

const DEV_ORIGIN: &str = "http://localhost:8000";

async fn spawn_client() -> Client {
    let database_pool = crate::database::connect_in_memory().await;
    Client::tracked(super::build_rocket(database_pool, &ServerConfig::default()))
        .await
        .expect("valid rocket instance")
}

async fn deserialize_response(response: LocalResponse<'_>) -> Value {
    assert_eq!(response.status(), Status::Ok);
    response.into_json::<Value>().await.expect("json response")
}

/// Posts a GraphQL operation and returns the whole response envelope
async fn graphql(client: &Client, query: &str, variables: Value) -> Value {
    let response = client
        .post("/graphql")
        .json(&json!({ "query": query, "variables": variables }))
        .dispatch()
        .await;
    deserialize_response(response).await
}

/// Submits a score and returns the stored record
async fn submit_score(client: &Client, input: Value) -> ScoreRecord {
    let envelope = graphql(client, SUBMIT_SCORE, json!({ "input": input })).await;
    assert!(envelope.get("errors").is_none(), "{}", envelope);
    serde_json::from_value(envelope["data"]["submitScore"].clone()).unwrap()
}

async fn get_leaderboard(client: &Client) -> Vec<ScoreRecord> {
    let envelope = graphql(client, GET_LEADERBOARD, json!({})).await;
    assert!(envelope.get("errors").is_none(), "{}", envelope);
    serde_json::from_value(envelope["data"]["getLeaderboard"].clone()).unwrap()
}

fn run(player_name: Value, score: i32) -> Value {
    json!({
        "playerName": player_name,
        "score": score,
        "timeSurvived": 60,
        "maxSnakeLength": 12,
        "difficultyReached": 3,
    })
}

#[rocket::async_test]
async fn liveness() {
    let client = spawn_client().await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.unwrap(), "API is running");
}

/// Submits an anonymous run, then a better one, and reads the leaderboard
#[rocket::async_test]
async fn submit_and_rank() {
    let client = spawn_client().await;

    assert!(get_leaderboard(&client).await.is_empty());

    let first = submit_score(&client, run(Value::Null, 150)).await;
    assert_eq!(first.player_name, "Anonymous");
    assert_eq!(first.score, 150);
    assert_eq!(first.time_survived, 60);
    assert_eq!(first.max_snake_length, 12);
    assert_eq!(first.difficulty_reached, 3);

    let second = submit_score(&client, run(json!("Ana"), 200)).await;
    assert_ne!(first.id, second.id);

    let leaderboard = get_leaderboard(&client).await;
    assert_eq!(leaderboard, vec![second, first]);
}

#[rocket::async_test]
async fn missing_and_blank_names() {
    let client = spawn_client().await;

    let input = json!({
        "score": 1,
        "timeSurvived": 1,
        "maxSnakeLength": 1,
        "difficultyReached": 1,
    });
    assert_eq!(submit_score(&client, input).await.player_name, "Anonymous");
    assert_eq!(
        submit_score(&client, run(json!("   "), 1)).await.player_name,
        "Anonymous"
    );
    assert_eq!(
        submit_score(&client, run(json!(" Ana "), 1)).await.player_name,
        " Ana "
    );
}

#[rocket::async_test]
async fn leaderboard_is_capped_at_ten() {
    let client = spawn_client().await;

    for score in 0..12 {
        submit_score(&client, run(json!("p"), score)).await;
    }

    let scores: Vec<i32> = get_leaderboard(&client)
        .await
        .into_iter()
        .map(|record| record.score)
        .collect();
    assert_eq!(scores, (2..12).rev().collect::<Vec<_>>());
}

/// A storage failure becomes a GraphQL error and leaves nothing behind
#[rocket::async_test]
async fn storage_error_envelope() {
    let client = spawn_client().await;

    let name = "n".repeat(51);
    let envelope = graphql(&client, SUBMIT_SCORE, json!({ "input": run(json!(name), 5) })).await;
    assert_eq!(envelope["data"], Value::Null);
    assert_eq!(envelope["errors"][0]["extensions"]["code"], "STORAGE_ERROR");

    assert!(get_leaderboard(&client).await.is_empty());
}

#[rocket::async_test]
async fn missing_required_field_is_rejected() {
    let client = spawn_client().await;

    let input = json!({ "playerName": "Ana", "score": 3 });
    let envelope = graphql(&client, SUBMIT_SCORE, json!({ "input": input })).await;
    assert!(envelope["errors"].as_array().map_or(false, |errors| !errors.is_empty()));

    assert!(get_leaderboard(&client).await.is_empty());
}

#[rocket::async_test]
async fn query_over_get() {
    let client = spawn_client().await;
    submit_score(&client, run(json!("Ana"), 7)).await;

    let response = client
        .get("/graphql?query=%7BgetLeaderboard%7Bscore%7D%7D")
        .dispatch()
        .await;
    let envelope = deserialize_response(response).await;
    assert_eq!(envelope["data"]["getLeaderboard"][0]["score"], 7);
}

#[rocket::async_test]
async fn cors_allowed_origin() {
    let client = spawn_client().await;

    let response = client
        .options("/graphql")
        .header(Header::new("Origin", DEV_ORIGIN))
        .header(Header::new("Access-Control-Request-Method", "POST"))
        .header(Header::new("Access-Control-Request-Headers", "content-type"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let headers = response.headers();
    assert_eq!(headers.get_one("Access-Control-Allow-Origin"), Some(DEV_ORIGIN));
    assert_eq!(headers.get_one("Access-Control-Allow-Credentials"), Some("true"));
    assert_eq!(headers.get_one("Access-Control-Allow-Methods"), Some("POST"));
    assert_eq!(headers.get_one("Access-Control-Allow-Headers"), Some("content-type"));

    let response = client
        .post("/graphql")
        .header(Header::new("Origin", DEV_ORIGIN))
        .json(&json!({ "query": GET_LEADERBOARD }))
        .dispatch()
        .await;
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some(DEV_ORIGIN)
    );
}

/// Unknown origins are refused before any handler runs, writes included
#[rocket::async_test]
async fn cors_unknown_origin() {
    let client = spawn_client().await;
    let evil = Header::new("Origin", "https://evil.example");

    let response = client
        .options("/graphql")
        .header(evil.clone())
        .header(Header::new("Access-Control-Request-Method", "POST"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
    assert_eq!(response.into_string().await.unwrap(), "Invalid CORS request");

    let response = client
        .post("/graphql")
        .header(evil.clone())
        .json(&json!({
            "query": SUBMIT_SCORE,
            "variables": { "input": run(json!("evil"), 999) },
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
    assert_eq!(response.into_string().await.unwrap(), "Invalid CORS request");

    let response = client.get("/").header(evil).dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);

    assert!(get_leaderboard(&client).await.is_empty());
}

#[rocket::async_test]
async fn cors_same_origin() {
    let client = spawn_client().await;

    let response = client
        .get("/")
        .header(Header::new("Host", "api.example:8080"))
        .header(Header::new("Origin", "http://api.example:8080"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
}

#[rocket::async_test]
async fn mutation_over_get_is_refused() {
    let client = spawn_client().await;

    let response = client
        .get(
            "/graphql?query=mutation%7BsubmitScore(input:%7Bscore:1,timeSurvived:1,\
             maxSnakeLength:1,difficultyReached:1%7D)%7Bid%7D%7D",
        )
        .dispatch()
        .await;
    let envelope = deserialize_response(response).await;
    assert!(envelope["errors"].as_array().map_or(false, |errors| !errors.is_empty()));
    assert_eq!(envelope["data"], Value::Null);

    assert!(get_leaderboard(&client).await.is_empty());
}

#[rocket::async_test]
async fn no_origin_no_cors_headers() {
    let client = spawn_client().await;

    let response = client.get("/").dispatch().await;
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
    assert!(response.headers().get_one("Vary").is_none());
}
