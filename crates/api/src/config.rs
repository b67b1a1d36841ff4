use serde::{Deserialize, Serialize};

fn default_max_connections() -> u32 {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    /// Front-end endpoint that marks rendered paths stale. Signals are only
    /// logged when unset.
    #[serde(default)]
    pub revalidate_url: Option<String>,
    /// Shared secret sent with revalidation requests.
    #[serde(default)]
    pub revalidate_secret: Option<String>,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Sentry DSN for error tracking
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Config {
    /// Environment variable prefix, e.g. `OVERFLOW_DATABASE_URL`.
    pub const ENV_PREFIX: &'static str = "OVERFLOW_";

    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(Self::ENV_PREFIX).from_env::<Config>()
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
