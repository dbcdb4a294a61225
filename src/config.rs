pub const DEFAULT_DATABASE_URL: &str = "sqlite://scores.db";

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 5] = [
    // Local development
    "http://localhost:8000",
    "http://127.0.0.1:8000",
    // Production frontend and API
    "https://bitesurvive.ragingscout97.in",
    "http://api.ragingscout97.in",
    "https://api.ragingscout97.in",
];

/// Settings read once at startup. Rocket's own settings (port, address)
/// live in `Rocket.toml` and `ROCKET_*` variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Reads `DATABASE_URL` and `ALLOWED_ORIGINS`, loading a `.env` file first if present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_vars(
            dotenv::var("DATABASE_URL").ok(),
            dotenv::var("ALLOWED_ORIGINS").ok(),
        )
    }

    pub fn from_vars(database_url: Option<String>, allowed_origins: Option<String>) -> Self {
        let database_url = database_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
        let allowed_origins = match allowed_origins {
            Some(list) => parse_origins(&list),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|&origin| origin.to_owned()).collect(),
        };
        Self {
            database_url,
            allowed_origins,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

/// Splits a comma separated origin list, dropping empty entries.
pub fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
