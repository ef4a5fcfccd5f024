use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::movie::{SearchHit, SearchResults, SearchStats};
use common::requests::MovieSearchForm;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use std::str::FromStr;

const DEFAULT_LIMIT: i64 = 20;

pub async fn process(
    config: web::Data<AppConfig>,
    form: web::Form<MovieSearchForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(search_movies(&conn, &form)?))
}

fn field<T: FromStr>(raw: &Option<String>, name: &str, default: T) -> ServiceResult<T> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse()
            .map_err(|_| ServiceError::Validation(format!("Invalid {}: {}", name, s))),
        None => Ok(default),
    }
}

pub fn search_movies(conn: &Connection, form: &MovieSearchForm) -> ServiceResult<SearchResults> {
    let min_rating: f64 = field(&form.min_rating, "min_rating", 0.0)?;
    let max_rating: f64 = field(&form.max_rating, "max_rating", 10.0)?;
    let min_popularity: f64 = field(&form.min_popularity, "min_popularity", 0.0)?;
    let limit: i64 = field(&form.limit, "limit", DEFAULT_LIMIT)?;
    if limit <= 0 {
        return Err(ServiceError::Validation("limit must be > 0".to_string()));
    }

    let mut clauses = Vec::new();
    let mut params = Vec::new();
    if let Some(keyword) = form.title_keyword.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push("title LIKE ?");
        params.push(SqlValue::Text(format!("%{}%", keyword)));
    }
    if let Some(language) = form.language.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push("original_language = ?");
        params.push(SqlValue::Text(language.to_string()));
    }
    if form.release_year.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        let year: i64 = field(&form.release_year, "release_year", 0)?;
        clauses.push("release_year = ?");
        params.push(SqlValue::Integer(year));
    }
    clauses.push("vote_average BETWEEN ? AND ?");
    params.push(SqlValue::Real(min_rating));
    params.push(SqlValue::Real(max_rating));
    clauses.push("popularity >= ?");
    params.push(SqlValue::Real(min_popularity));
    let where_sql = clauses.join(" AND ");

    let stats = conn.query_row(
        &format!(
            "SELECT COUNT(*), AVG(vote_average), AVG(popularity) FROM movies WHERE {}",
            where_sql
        ),
        params_from_iter(params.iter()),
        |r| {
            Ok(SearchStats {
                movie_count: r.get(0)?,
                avg_rating: r.get(1)?,
                avg_popularity: r.get(2)?,
            })
        },
    )?;

    params.push(SqlValue::Integer(limit));
    let mut stmt = conn.prepare(&format!(
        "SELECT title, original_language, release_year, vote_average, popularity, vote_count
         FROM movies
         WHERE {}
         ORDER BY popularity DESC
         LIMIT ?",
        where_sql
    ))?;
    let movies = stmt
        .query_map(params_from_iter(params.iter()), |r| {
            Ok(SearchHit {
                title: r.get(0)?,
                original_language: r.get(1)?,
                release_year: r.get(2)?,
                vote_average: r.get(3)?,
                popularity: r.get(4)?,
                vote_count: r.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SearchResults { movies, stats })
}
