//! # Report Service Module
//!
//! Each report handler validates its form, computes aggregates over the
//! catalog, renders the topic's active template and appends the result to the
//! archive. Routes under `/api/reports`:
//!
//! *   **`POST /hot/top-n`** (`top_n_popular`)
//! *   **`POST /hot/year`** (`year_top_popularity`)
//! *   **`POST /recommend/high-score`** (`high_score_recommendation`)
//! *   **`POST /recommend/hidden-gems`** (`hidden_gems`)
//! *   **`GET /structure/language`** (`language_structure`, JSON, not archived)
//! *   **`POST /structure/period`** (`time_window_performance`)
//! *   **`GET /archive`**, **`GET /archive/{report_id}`**,
//!     **`GET /archive/{report_id}/content`**
//!
//! Generated reports are returned as `text/html` with the archive id in the
//! `X-Report-Id` header.

pub mod archive;
mod hot;
mod recommend;
mod structure;

use crate::error::{ServiceError, ServiceResult};
use crate::services::templates::render::{render_topic, Values};
use actix_web::web::{get, post, scope};
use actix_web::{HttpResponse, Scope};
use log::info;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use std::str::FromStr;

const API_PATH: &str = "/api/reports";
pub const REPORT_ID_HEADER: &str = "X-Report-Id";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/hot/top-n", post().to(hot::top_n))
        .route("/hot/year", post().to(hot::year))
        .route("/recommend/high-score", post().to(recommend::high_score))
        .route("/recommend/hidden-gems", post().to(recommend::hidden_gems))
        .route("/structure/language", get().to(structure::language))
        .route("/structure/period", post().to(structure::period))
        .route("/archive", get().to(archive::list))
        .route("/archive/{report_id}", get().to(archive::detail))
        .route("/archive/{report_id}/content", get().to(archive::content))
}

/// A rendered report that has been written to the archive.
#[derive(Debug)]
pub struct Published {
    pub report_id: i64,
    pub html: String,
}

/// Renders `topic` with `values` and archives the result under `parameters`.
fn publish(
    conn: &Connection,
    topic: &str,
    values: &Values,
    parameters: &str,
) -> ServiceResult<Published> {
    let rendered = render_topic(conn, topic, values)?;
    let report_id = archive::save_report(conn, rendered.template_id, parameters, &rendered.html)?;
    info!(
        "Generated report {} from topic '{}' ({})",
        report_id, topic, parameters
    );
    Ok(Published {
        report_id,
        html: rendered.html,
    })
}

fn html_response(published: Published) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((REPORT_ID_HEADER, published.report_id.to_string()))
        .body(published.html)
}

/// Columns every listing query selects, in this order.
const LISTING_COLUMNS: &str = "title, popularity, vote_average, vote_count, release_date";

struct Listed {
    title: String,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    release_date: Option<String>,
}

fn fetch_listing(conn: &Connection, sql: &str, params: &[SqlValue]) -> ServiceResult<Vec<Listed>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(Listed {
                title: row.get(0)?,
                popularity: row.get(1)?,
                vote_average: row.get(2)?,
                vote_count: row.get(3)?,
                release_date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `COUNT(*)` plus two averages over one filter.
fn fetch_summary(
    conn: &Connection,
    sql: &str,
    params: &[SqlValue],
) -> ServiceResult<(i64, Option<f64>, Option<f64>)> {
    Ok(conn.query_row(sql, params_from_iter(params.iter()), |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?)
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1}", v))
}

fn two_decimals(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

/// Parses an optional form field, using `default` when it is blank or invalid.
fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.parse().unwrap_or(default),
        _ => default,
    }
}

/// Parses the "top N" field (default 10). It must be a positive integer.
fn parse_top_n(raw: Option<&str>) -> ServiceResult<i64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("10");
    let n: i64 = raw
        .parse()
        .map_err(|_| ServiceError::Validation("Invalid N.".to_string()))?;
    if n <= 0 {
        return Err(ServiceError::Validation("N must be > 0.".to_string()));
    }
    Ok(n)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
