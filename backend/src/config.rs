//! Runtime configuration, read once at startup from the environment.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "movies_acms.db";
const DEFAULT_MOVIES_CSV_PATH: &str = "Movies_dataset.csv";

/// Settings shared with every handler as `web::Data<AppConfig>`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding the catalog, templates, queries and archive.
    pub db_path: PathBuf,
    /// Dataset loaded by `POST /api/admin/import`.
    pub movies_csv_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            movies_csv_path: PathBuf::from(DEFAULT_MOVIES_CSV_PATH),
        }
    }
}

impl AppConfig {
    /// Reads `MOVIE_ACMS_HOST`, `MOVIE_ACMS_PORT`, `MOVIE_ACMS_DB` and
    /// `MOVIE_ACMS_CSV`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("MOVIE_ACMS_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("MOVIE_ACMS_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| format!("MOVIE_ACMS_PORT is not a valid port: {}", port))?;
        }
        if let Some(db) = lookup("MOVIE_ACMS_DB") {
            config.db_path = PathBuf::from(db);
        }
        if let Some(csv) = lookup("MOVIE_ACMS_CSV") {
            config.movies_csv_path = PathBuf::from(csv);
        }
        Ok(config)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
