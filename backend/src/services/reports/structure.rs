//! Content structure reports: per-language breakdown and performance inside a
//! release-date window.

use super::{
    fetch_listing, fetch_summary, html_response, one_decimal, parse_top_n, publish, two_decimals,
    Listed, Published, LISTING_COLUMNS,
};
use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::services::templates::render::{render_topic, Values};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::report::{LanguageStat, LanguageStructure};
use common::requests::TimeWindowForm;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

pub async fn language(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(language_structure(&conn)?))
}

pub async fn period(
    config: web::Data<AppConfig>,
    form: web::Form<TimeWindowForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(html_response(time_window_report(&conn, &form)?))
}

pub fn language_stats(conn: &Connection) -> ServiceResult<Vec<LanguageStat>> {
    let mut stmt = conn.prepare(
        "SELECT original_language,
                COUNT(*),
                AVG(vote_average),
                AVG(popularity),
                SUM(vote_count)
         FROM movies
         GROUP BY original_language
         ORDER BY COUNT(*) DESC",
    )?;
    let stats = stmt
        .query_map([], |row| {
            Ok(LanguageStat {
                original_language: row.get(0)?,
                movie_count: row.get(1)?,
                avg_rating: row.get(2)?,
                avg_popularity: row.get(3)?,
                total_votes: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stats)
}

/// Renders the language breakdown. The result is returned to the caller but
/// not archived.
pub fn language_structure(conn: &Connection) -> ServiceResult<LanguageStructure> {
    let stats = language_stats(conn)?;
    let lines = stats
        .iter()
        .map(|s| {
            format!(
                "{}: {} movies | avg rating {} | avg popularity {} | total votes {}",
                s.original_language.as_deref().unwrap_or("N/A"),
                s.movie_count,
                two_decimals(s.avg_rating),
                two_decimals(s.avg_popularity),
                s.total_votes.unwrap_or(0)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let values = Values::new()
        .with("language_count", stats.len())
        .with("language_stats", lines);
    let rendered = render_topic(conn, "language_structure", &values)?;
    Ok(LanguageStructure {
        stats,
        report_html: rendered.html,
    })
}

fn window_lines(rows: &[Listed]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} | rating {} | popularity {} | released {}",
                i + 1,
                r.title,
                one_decimal(r.vote_average),
                one_decimal(r.popularity),
                r.release_date.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn time_window_report(conn: &Connection, form: &TimeWindowForm) -> ServiceResult<Published> {
    let start_date = form.start_date.as_deref().unwrap_or("").trim();
    let end_date = form.end_date.as_deref().unwrap_or("").trim();
    if start_date.is_empty() || end_date.is_empty() {
        return Err(ServiceError::Validation(
            "Please enter the complete date range".to_string(),
        ));
    }
    let n = parse_top_n(form.n.as_deref())?;
    let range = [
        SqlValue::Text(start_date.to_string()),
        SqlValue::Text(end_date.to_string()),
    ];

    let (movie_count, avg_rating, avg_popularity) = fetch_summary(
        conn,
        "SELECT COUNT(*), AVG(vote_average), AVG(popularity)
         FROM movies
         WHERE release_date BETWEEN ?1 AND ?2",
        &range,
    )?;
    if movie_count == 0 {
        return Err(ServiceError::NoData(
            "There is no movie data during this period".to_string(),
        ));
    }

    let [start, end] = range;
    let rows = fetch_listing(
        conn,
        &format!(
            "SELECT {} FROM movies
             WHERE release_date BETWEEN ?1 AND ?2
             ORDER BY popularity DESC
             LIMIT ?3",
            LISTING_COLUMNS
        ),
        &[start, end, SqlValue::Integer(n)],
    )?;

    let values = Values::new()
        .with("start_date", start_date)
        .with("end_date", end_date)
        .with("movie_count", movie_count)
        .with("avg_rating", avg_rating.unwrap_or(0.0))
        .with("avg_popularity", avg_popularity.unwrap_or(0.0))
        .with("n", rows.len())
        .with("top_n_list", window_lines(&rows));
    publish(
        conn,
        "time_window_performance",
        &values,
        &format!("period_stats | {} to {} | N={}", start_date, end_date, n),
    )
}
