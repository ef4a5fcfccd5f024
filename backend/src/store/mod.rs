//! SQLite persistence.
//!
//! There is no pool: every request calls [`open`] and drops the connection
//! when it is done, so concurrent requests only contend on SQLite's own file
//! lock.

mod defaults;
mod schema;

pub use defaults::seed_defaults;
pub use schema::init_schema;

use rusqlite::Connection;
use std::path::Path;

/// Opens (creating if needed) the database file with foreign keys enforced.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Startup hook: schema plus default rows.
pub fn bootstrap(path: &Path) -> rusqlite::Result<()> {
    let mut conn = open(path)?;
    init_schema(&conn)?;
    seed_defaults(&mut conn)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    /// In-memory store with schema and default rows.
    pub fn memory() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        seed_defaults(&mut conn).unwrap();
        conn
    }

    /// File-backed store for handler tests, which open their own connections.
    /// Keep the `TempDir` alive for the duration of the test.
    pub fn temp_config() -> (TempDir, AppConfig) {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("movies_acms.db"),
            movies_csv_path: dir.path().join("Movies_dataset.csv"),
            ..AppConfig::default()
        };
        bootstrap(&config.db_path).unwrap();
        (dir, config)
    }

    pub fn insert_movie(
        conn: &Connection,
        title: &str,
        lang: &str,
        release_date: &str,
        popularity: f64,
        vote_average: f64,
        vote_count: i64,
    ) {
        let year: i32 = release_date[..4].parse().unwrap();
        conn.execute(
            "INSERT INTO movies (title, original_language, release_date, release_year,
                                 popularity, vote_average, vote_count, overview)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
            rusqlite::params![title, lang, release_date, year, popularity, vote_average, vote_count],
        )
        .unwrap();
    }

    pub fn movie_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .unwrap()
    }
}
