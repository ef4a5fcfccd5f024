use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    original_language TEXT,
    release_date TEXT,
    release_year INTEGER,
    popularity REAL,
    vote_average REAL,
    vote_count INTEGER,
    overview TEXT
);

CREATE TABLE IF NOT EXISTS templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    topic TEXT NOT NULL,
    description TEXT,
    content_html TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 0
);

-- One active template per topic.
CREATE UNIQUE INDEX IF NOT EXISTS idx_templates_active_topic
    ON templates (topic) WHERE active = 1;

CREATE TABLE IF NOT EXISTS saved_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    sql_text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS generated_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    template_id INTEGER,
    generated_at TEXT NOT NULL,
    format TEXT NOT NULL,
    parameters TEXT NOT NULL,
    content TEXT NOT NULL,
    FOREIGN KEY (template_id) REFERENCES templates (id)
);
";

/// Creates the tables and indexes that are not there yet.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
