//! Recommendation reports: high-score picks and "hidden gems" (well rated but
//! little known). Unparsable thresholds fall back to their defaults instead of
//! failing.

use super::{
    fetch_listing, html_response, one_decimal, parse_or, publish, Listed, Published,
    LISTING_COLUMNS,
};
use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::services::templates::render::Values;
use crate::store;
use actix_web::{web, HttpResponse};
use common::requests::{HiddenGemsForm, HighScoreForm};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

const DEFAULT_MIN_RATING: f64 = 8.0;
const DEFAULT_MIN_VOTES: i64 = 50;
const DEFAULT_MAX_POPULARITY: f64 = 200.0;
const LIST_LIMIT: i64 = 50;

pub async fn high_score(
    config: web::Data<AppConfig>,
    form: web::Form<HighScoreForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(html_response(high_score_report(&conn, &form)?))
}

pub async fn hidden_gems(
    config: web::Data<AppConfig>,
    form: web::Form<HiddenGemsForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(html_response(hidden_gems_report(&conn, &form)?))
}

fn rating_lines(rows: &[Listed]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} | rating {} | votes {} | popularity {}",
                i + 1,
                r.title,
                one_decimal(r.vote_average),
                r.vote_count
                    .map_or_else(|| "N/A".to_string(), |v| v.to_string()),
                one_decimal(r.popularity)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_and_average(
    conn: &Connection,
    where_sql: &str,
    params: &[SqlValue],
) -> ServiceResult<(i64, Option<f64>)> {
    Ok(conn.query_row(
        &format!(
            "SELECT COUNT(*), AVG(vote_average) FROM movies WHERE {}",
            where_sql
        ),
        params_from_iter(params.iter()),
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?)
}

fn best_rated(conn: &Connection, where_sql: &str, params: &[SqlValue]) -> ServiceResult<Vec<Listed>> {
    fetch_listing(
        conn,
        &format!(
            "SELECT {} FROM movies
             WHERE {}
             ORDER BY vote_average DESC, vote_count DESC
             LIMIT {}",
            LISTING_COLUMNS, where_sql, LIST_LIMIT
        ),
        params,
    )
}

pub fn high_score_report(conn: &Connection, form: &HighScoreForm) -> ServiceResult<Published> {
    let min_rating = parse_or(form.min_rating.as_deref(), DEFAULT_MIN_RATING);
    let min_votes = parse_or(form.min_votes.as_deref(), DEFAULT_MIN_VOTES);
    let lang = form.lang.as_deref().unwrap_or("").trim();

    let mut clauses = vec!["vote_average >= ?", "vote_count >= ?"];
    let mut params = vec![SqlValue::Real(min_rating), SqlValue::Integer(min_votes)];
    let language_desc = if lang.is_empty() {
        "All languages".to_string()
    } else {
        clauses.push("original_language = ?");
        params.push(SqlValue::Text(lang.to_string()));
        format!("Only '{}'", lang)
    };
    let where_sql = clauses.join(" AND ");

    let (movie_count, avg_rating) = count_and_average(conn, &where_sql, &params)?;
    if movie_count == 0 {
        return Err(ServiceError::NoData(
            "No movies match the filters.".to_string(),
        ));
    }
    let rows = best_rated(conn, &where_sql, &params)?;

    let values = Values::new()
        .with("min_rating", min_rating)
        .with("min_votes", min_votes)
        .with("language_desc", language_desc)
        .with("movie_count", movie_count)
        .with("avg_rating", avg_rating.unwrap_or(0.0))
        .with("movie_list", rating_lines(&rows));
    publish(
        conn,
        "high_score_recommendation",
        &values,
        &format!(
            "high_rated | min_rating={:?} | min_votes={} | lang={}",
            min_rating, min_votes, lang
        ),
    )
}

pub fn hidden_gems_report(conn: &Connection, form: &HiddenGemsForm) -> ServiceResult<Published> {
    let min_rating = parse_or(form.min_rating.as_deref(), DEFAULT_MIN_RATING);
    let max_popularity = parse_or(form.max_popularity.as_deref(), DEFAULT_MAX_POPULARITY);

    let where_sql = "vote_average >= ? AND popularity IS NOT NULL AND popularity <= ?";
    let params = [SqlValue::Real(min_rating), SqlValue::Real(max_popularity)];

    let (movie_count, _) = count_and_average(conn, where_sql, &params)?;
    if movie_count == 0 {
        return Err(ServiceError::NoData(
            "Under the current conditions, no potential films have been found \
             (high scores but low popularity)"
                .to_string(),
        ));
    }
    let rows = best_rated(conn, where_sql, &params)?;

    let values = Values::new()
        .with("min_rating", min_rating)
        .with("max_popularity", max_popularity)
        .with("movie_count", movie_count)
        .with("movie_list", rating_lines(&rows));
    publish(
        conn,
        "hidden_gems",
        &values,
        &format!(
            "hidden_gems | rating>={:?} | pop<={:?}",
            min_rating, max_popularity
        ),
    )
}
