use std::env;

/// Runtime configuration, read from the environment at startup.
///
/// Both values are optional: without `DATABASE_URL` the app serves the seed
/// habit catalog and rejects writes, without `GEMINI_API_KEY` suggestions are
/// disabled. Neither absence is fatal.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string, e.g. `sqlite:daily_tracker.db`
    pub database_url: Option<String>,
    /// API key for the external suggestion service
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: non_empty_var("DATABASE_URL"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
