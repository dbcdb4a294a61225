use bitesurvive_server::{build_rocket, config::ServerConfig, database, init_logging};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ServerConfig::from_env();
    tracing::info!(
        database = %config.database_url,
        origins = config.allowed_origins.len(),
        "starting score server"
    );

    // Connect to a database
    let database_pool = database::connect(&config.database_url).await?;
    database::migrate(&database_pool).await?;

    // Build and launch the rocket
    build_rocket(database_pool, &config)
        .launch()
        .await
        .map_err(|error| anyhow::anyhow!("server failed: {}", error))?;
    Ok(())
}
