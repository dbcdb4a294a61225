use rocket::{catchers, get, routes, Build, Rocket};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod cors;
pub mod database;
pub mod error;
pub mod schema;
pub mod score;
pub mod service;
#[cfg(test)]
mod tests;

use config::ServerConfig;
use cors::Cors;
use database::{DatabasePool, ScoreStore};
use service::ScoreService;

/// Installs the `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
/// Later calls are no-ops.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

/// Wires store, service and schema together and mounts every route.
pub fn build_rocket(database_pool: DatabasePool, config: &ServerConfig) -> Rocket<Build> {
    let service = ScoreService::new(ScoreStore::new(database_pool));
    let cors = Cors::new(config.allowed_origins.iter().cloned());

    rocket::build()
        .mount(
            "/",
            routes![
                index,
                cors::preflight,
                schema::graphql_request,
                schema::graphql_query
            ],
        )
        .register("/", catchers![cors::forbidden])
        .manage(schema::build_read_only_schema(service.clone()))
        .manage(schema::build_schema(service))
        .manage(cors.clone())
        .attach(cors)
}

#[get("/")]
fn index(_origin: cors::CheckedOrigin) -> &'static str {
    "API is running"
}
