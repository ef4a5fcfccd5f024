//! Built-in report templates and saved queries.
//!
//! They are inserted only into empty tables, so admin edits survive restarts.

use log::info;
use rusqlite::{params, Connection};

pub struct DefaultTemplate {
    pub name: &'static str,
    pub topic: &'static str,
    pub description: &'static str,
    pub content_html: &'static str,
}

pub struct DefaultQuery {
    pub name: &'static str,
    pub description: &'static str,
    pub sql_text: &'static str,
}

pub const DEFAULT_TEMPLATES: &[DefaultTemplate] = &[
    DefaultTemplate {
        name: "Hot Top N Movies",
        topic: "top_n_popular",
        description: "Hot movies in a selected time range.",
        content_html: concat!(
            "<h2>Top {n} Most Popular Movies</h2>",
            "<p>Time range: {time_desc}</p>",
            "<p>Total movies in range: <strong>{total_movies}</strong></p>",
            "<p>Average rating: <strong>{avg_rating:.2f}</strong> / 10, ",
            "Average popularity: <strong>{avg_popularity:.2f}</strong></p>",
            "<h3>Top Titles</h3>",
            "<pre>{movie_list}</pre>",
        ),
    },
    DefaultTemplate {
        name: "Yearly Hot Summary",
        topic: "year_top_popularity",
        description: "Yearly hot movie summary.",
        content_html: concat!(
            "<h2>Yearly Hot Movies Summary – {year}</h2>",
            "<p>Movies recorded: <strong>{movie_count}</strong></p>",
            "<p>Average rating: <strong>{avg_rating:.2f}</strong> / 10, ",
            "Average popularity: <strong>{avg_popularity:.2f}</strong></p>",
            "<h3>Top {n} Titles</h3>",
            "<pre>{top_n_list}</pre>",
        ),
    },
    DefaultTemplate {
        name: "High Score Recommendation",
        topic: "high_score_recommendation",
        description: "High rating movies recommendation list.",
        content_html: concat!(
            "<h2>High-Score Recommendation List</h2>",
            "<p>Filters: min rating {min_rating:.1f}, min votes {min_votes}, ",
            "language: {language_desc}</p>",
            "<p>Matched movies: <strong>{movie_count}</strong>, ",
            "average rating <strong>{avg_rating:.2f}</strong> / 10</p>",
            "<h3>Recommended Titles</h3>",
            "<pre>{movie_list}</pre>",
        ),
    },
    DefaultTemplate {
        name: "Hidden Gems",
        topic: "hidden_gems",
        description: "High rating but low popularity movies.",
        content_html: concat!(
            "<h2>Potential Hidden Gems</h2>",
            "<p>Filters: min rating {min_rating:.1f}, max popularity {max_popularity:.1f}</p>",
            "<p>Matched movies: <strong>{movie_count}</strong></p>",
            "<h3>Representative Titles</h3>",
            "<pre>{movie_list}</pre>",
        ),
    },
    DefaultTemplate {
        name: "Language Structure",
        topic: "language_structure",
        description: "Movies count and averages by language.",
        content_html: concat!(
            "<h2>Language-Level Content Structure</h2>",
            "<p>Number of languages: <strong>{language_count}</strong></p>",
            "<h3>Breakdown</h3>",
            "<pre>{language_stats}</pre>",
        ),
    },
    DefaultTemplate {
        name: "Time Window Performance",
        topic: "time_window_performance",
        description: "Performance of movies in a date range.",
        content_html: concat!(
            "<h2>Time Window Performance</h2>",
            "<p>Range: {start_date} ~ {end_date}</p>",
            "<p>Movies in range: <strong>{movie_count}</strong></p>",
            "<p>Average rating: <strong>{avg_rating:.2f}</strong> / 10, ",
            "Average popularity: <strong>{avg_popularity:.2f}</strong></p>",
            "<h3>Top {n} Titles</h3>",
            "<pre>{top_n_list}</pre>",
        ),
    },
];

pub const DEFAULT_QUERIES: &[DefaultQuery] = &[
    DefaultQuery {
        name: "Top 10 popular movies",
        description: "Top 10 movies ordered by popularity.",
        sql_text: "SELECT title, popularity, vote_average, vote_count
FROM movies
WHERE popularity IS NOT NULL
ORDER BY popularity DESC
LIMIT 10;",
    },
    DefaultQuery {
        name: "Average rating by language",
        description: "Average rating and total votes per original language.",
        sql_text: "SELECT original_language,
       COUNT(*) AS movie_count,
       AVG(vote_average) AS avg_rating,
       AVG(popularity) AS avg_popularity,
       SUM(vote_count) AS total_votes
FROM movies
GROUP BY original_language
ORDER BY avg_rating DESC;",
    },
    DefaultQuery {
        name: "Top movie per year by popularity",
        description: "Get the movie with the highest popularity for a given year.",
        sql_text: "SELECT m.*
FROM movies m
WHERE m.release_year = ?
  AND m.popularity = (
      SELECT MAX(popularity)
      FROM movies
      WHERE release_year = ?
  );",
    },
];

/// Seeds the built-in templates and queries into empty tables.
///
/// Returns how many templates and queries were inserted.
pub fn seed_defaults(conn: &mut Connection) -> rusqlite::Result<(usize, usize)> {
    let tx = conn.transaction()?;

    let template_count: i64 = tx.query_row("SELECT COUNT(*) FROM templates", [], |row| row.get(0))?;
    let mut templates_inserted = 0;
    if template_count == 0 {
        let mut stmt = tx.prepare(
            "INSERT INTO templates (name, topic, description, content_html, active)
             VALUES (?1, ?2, ?3, ?4, 1)",
        )?;
        for t in DEFAULT_TEMPLATES {
            stmt.execute(params![t.name, t.topic, t.description, t.content_html])?;
            templates_inserted += 1;
        }
    }

    let query_count: i64 =
        tx.query_row("SELECT COUNT(*) FROM saved_queries", [], |row| row.get(0))?;
    let mut queries_inserted = 0;
    if query_count == 0 {
        let mut stmt = tx.prepare(
            "INSERT INTO saved_queries (name, description, sql_text) VALUES (?1, ?2, ?3)",
        )?;
        for q in DEFAULT_QUERIES {
            stmt.execute(params![q.name, q.description, q.sql_text])?;
            queries_inserted += 1;
        }
    }

    tx.commit()?;
    if templates_inserted + queries_inserted > 0 {
        info!(
            "Seeded {} default templates and {} saved queries",
            templates_inserted, queries_inserted
        );
    }
    Ok((templates_inserted, queries_inserted))
}
