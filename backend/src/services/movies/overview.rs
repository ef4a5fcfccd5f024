//! Catalog-wide figures that do not go through a report template.

use crate::config::AppConfig;
use crate::error::ServiceResult;
use crate::store;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Local};
use common::model::movie::{HotSummary, MovieSummary, Overview};
use rusqlite::{params, Connection, OptionalExtension};

/// Share of the catalog, by popularity rank, that counts as "not hot".
const HOT_PERCENTILE: f64 = 0.7;

pub async fn overview(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(catalog_overview(&conn)?))
}

pub async fn hot(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(hot_summary(&conn, Local::now().year())?))
}

pub fn catalog_overview(conn: &Connection) -> ServiceResult<Overview> {
    let total_movies: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))?;
    let language_count: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT original_language) FROM movies",
        [],
        |r| r.get(0),
    )?;
    let (avg_rating, avg_popularity): (Option<f64>, Option<f64>) = conn.query_row(
        "SELECT AVG(vote_average), AVG(popularity)
         FROM movies
         WHERE vote_average IS NOT NULL AND popularity IS NOT NULL",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;

    let mut stmt = conn.prepare(
        "SELECT title, vote_average, popularity
         FROM movies
         ORDER BY popularity DESC
         LIMIT 5",
    )?;
    let top5 = stmt
        .query_map([], |r| {
            Ok(MovieSummary {
                title: r.get(0)?,
                vote_average: r.get(1)?,
                popularity: r.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Overview {
        total_movies,
        language_count,
        avg_rating: avg_rating.unwrap_or(0.0),
        avg_popularity: avg_popularity.unwrap_or(0.0),
        top5,
    })
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn hot_summary(conn: &Connection, year: i32) -> ServiceResult<HotSummary> {
    let top_movie_title: Option<String> = conn
        .query_row(
            "SELECT title FROM movies
             WHERE release_year = ?1 AND popularity IS NOT NULL
             ORDER BY popularity DESC
             LIMIT 1",
            params![year],
            |r| r.get(0),
        )
        .optional()?;

    let max_popularity: Option<f64> = conn.query_row(
        "SELECT MAX(popularity) FROM movies WHERE popularity IS NOT NULL",
        [],
        |r| r.get(0),
    )?;

    let ranked: i64 = conn.query_row(
        "SELECT COUNT(*) FROM movies WHERE popularity IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let offset = (ranked as f64 * HOT_PERCENTILE).round() as i64;
    let threshold: f64 = conn
        .query_row(
            "SELECT popularity FROM movies
             WHERE popularity IS NOT NULL
             ORDER BY popularity ASC
             LIMIT 1 OFFSET ?1",
            params![offset],
            |r| r.get(0),
        )
        .optional()?
        .unwrap_or(0.0);
    let avg_rating: Option<f64> = conn.query_row(
        "SELECT AVG(vote_average) FROM movies
         WHERE vote_average IS NOT NULL AND popularity IS NOT NULL AND popularity > ?1",
        params![threshold],
        |r| r.get(0),
    )?;

    let mut monthly_avg = vec![0.0; 12];
    let mut stmt = conn.prepare(
        "SELECT CAST(strftime('%m', release_date) AS INTEGER), AVG(popularity)
         FROM movies
         WHERE popularity IS NOT NULL AND release_date IS NOT NULL
         GROUP BY 1",
    )?;
    let months = stmt.query_map([], |r| {
        Ok((r.get::<_, Option<i64>>(0)?, r.get::<_, Option<f64>>(1)?))
    })?;
    for month in months {
        if let (Some(m @ 1..=12), Some(avg)) = month? {
            monthly_avg[(m - 1) as usize] = round1(avg);
        }
    }

    Ok(HotSummary {
        year,
        top_movie_title,
        max_popularity: max_popularity.map_or(0.0, round1),
        avg_rating: avg_rating.map_or(0.0, round1),
        monthly_avg,
    })
}
