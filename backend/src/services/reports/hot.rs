//! Popularity reports: top N over a time range, and a single-year summary.

use super::{
    fetch_listing, fetch_summary, html_response, is_digits, one_decimal, parse_top_n, publish,
    Listed, Published, LISTING_COLUMNS,
};
use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::services::templates::render::Values;
use crate::store;
use actix_web::{web, HttpResponse};
use common::requests::{HotTopNForm, YearHotForm};
use log::warn;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

pub async fn top_n(
    config: web::Data<AppConfig>,
    form: web::Form<HotTopNForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(html_response(top_n_report(&conn, &form)?))
}

pub async fn year(
    config: web::Data<AppConfig>,
    form: web::Form<YearHotForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(html_response(year_report(&conn, &form)?))
}

fn popularity_lines(rows: &[Listed]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} | popularity {} | rating {}",
                i + 1,
                r.title,
                one_decimal(r.popularity),
                one_decimal(r.vote_average)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Time filter of the top N report. Incomplete year or range input falls back
/// to the whole catalog.
fn time_filter(form: &HotTopNForm) -> (Vec<&'static str>, Vec<SqlValue>, String) {
    let year = form.year.as_deref().unwrap_or("").trim();
    let start = form.start_date.as_deref().unwrap_or("").trim();
    let end = form.end_date.as_deref().unwrap_or("").trim();

    match form.time_type.as_deref().unwrap_or("all") {
        "year" if is_digits(year) => match year.parse::<i64>() {
            Ok(y) => (
                vec!["release_year = ?"],
                vec![SqlValue::Integer(y)],
                format!("movies released in {}", year),
            ),
            Err(_) => (Vec::new(), Vec::new(), "all movies".to_string()),
        },
        "range" if start.len() == 10 && end.len() == 10 => (
            vec!["release_date >= ?", "release_date <= ?"],
            vec![
                SqlValue::Text(start.to_string()),
                SqlValue::Text(end.to_string()),
            ],
            format!("movies released between {} and {}", start, end),
        ),
        _ => (Vec::new(), Vec::new(), "all movies".to_string()),
    }
}

pub fn top_n_report(conn: &Connection, form: &HotTopNForm) -> ServiceResult<Published> {
    let n = parse_top_n(form.n.as_deref())?;
    let (clauses, mut params, time_desc) = time_filter(form);
    let where_sql = if clauses.is_empty() {
        "1=1".to_string()
    } else {
        clauses.join(" AND ")
    };

    let (total_movies, avg_rating, avg_popularity) = fetch_summary(
        conn,
        &format!(
            "SELECT COUNT(*), AVG(vote_average), AVG(popularity)
             FROM movies
             WHERE {} AND popularity IS NOT NULL AND vote_average IS NOT NULL",
            where_sql
        ),
        &params,
    )?;
    if total_movies == 0 {
        warn!("Top N report found no movies for {}", time_desc);
        return Err(ServiceError::NoData(
            "No movies found for selected range.".to_string(),
        ));
    }

    params.push(SqlValue::Integer(n));
    let rows = fetch_listing(
        conn,
        &format!(
            "SELECT {} FROM movies
             WHERE {} AND popularity IS NOT NULL
             ORDER BY popularity DESC
             LIMIT ?",
            LISTING_COLUMNS, where_sql
        ),
        &params,
    )?;

    let values = Values::new()
        .with("n", rows.len())
        .with("time_desc", time_desc.as_str())
        .with("total_movies", total_movies)
        .with("avg_rating", avg_rating.unwrap_or(0.0))
        .with("avg_popularity", avg_popularity.unwrap_or(0.0))
        .with("movie_list", popularity_lines(&rows));
    publish(
        conn,
        "top_n_popular",
        &values,
        &format!("hot_topn | {} | N={}", time_desc, n),
    )
}

pub fn year_report(conn: &Connection, form: &YearHotForm) -> ServiceResult<Published> {
    let year_raw = form.year.as_deref().unwrap_or("").trim();
    let year: i64 = Some(year_raw)
        .filter(|s| is_digits(s))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid year.".to_string()))?;
    let n = parse_top_n(form.n.as_deref())?;

    let (movie_count, avg_rating, avg_popularity) = fetch_summary(
        conn,
        "SELECT COUNT(*), AVG(vote_average), AVG(popularity)
         FROM movies
         WHERE release_year = ?1 AND vote_average IS NOT NULL AND popularity IS NOT NULL",
        &[SqlValue::Integer(year)],
    )?;
    if movie_count == 0 {
        return Err(ServiceError::NoData(
            "No movies found for this year.".to_string(),
        ));
    }

    let rows = fetch_listing(
        conn,
        &format!(
            "SELECT {} FROM movies
             WHERE release_year = ?1
             ORDER BY popularity DESC
             LIMIT ?2",
            LISTING_COLUMNS
        ),
        &[SqlValue::Integer(year), SqlValue::Integer(n)],
    )?;

    let values = Values::new()
        .with("year", year)
        .with("movie_count", movie_count)
        .with("avg_rating", avg_rating.unwrap_or(0.0))
        .with("avg_popularity", avg_popularity.unwrap_or(0.0))
        .with("n", rows.len())
        .with("top_n_list", popularity_lines(&rows));
    publish(
        conn,
        "year_top_popularity",
        &values,
        &format!("year_hot | year={} | N={}", year, n),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reports::archive::get_report;
    use crate::services::reports::{configure_routes, REPORT_ID_HEADER};
    use crate::store::testing;
    use actix_web::{test as atest, App};

    fn seed(conn: &Connection) {
        testing::insert_movie(conn, "Alpha", "en", "2015-03-01", 90.0, 7.0, 1000);
        testing::insert_movie(conn, "Beta", "fr", "2015-07-15", 30.0, 8.0, 300);
        testing::insert_movie(conn, "Gamma", "en", "2016-01-10", 60.0, 6.0, 500);
    }

    #[test]
    fn top_n_over_all_movies() {
        let conn = testing::memory();
        seed(&conn);
        let form = HotTopNForm {
            n: Some("2".into()),
            ..Default::default()
        };
        let published = top_n_report(&conn, &form).unwrap();
        assert!(published.html.contains("<h2>Top 2 Most Popular Movies</h2>"));
        assert!(published.html.contains("Time range: all movies"));
        assert!(published.html.contains("<strong>3</strong>"));
        assert!(published.html.contains("Average rating: <strong>7.00</strong>"));
        assert!(published
            .html
            .contains("1. Alpha | popularity 90.0 | rating 7.0\n2. Gamma | popularity 60.0 | rating 6.0"));

        let archived = get_report(&conn, published.report_id).unwrap();
        assert_eq!(archived.parameters, "hot_topn | all movies | N=2");
        assert_eq!(archived.content, published.html);
    }

    #[test]
    fn top_n_restricted_to_a_range() {
        let conn = testing::memory();
        seed(&conn);
        let form = HotTopNForm {
            time_type: Some("range".into()),
            start_date: Some("2015-06-01".into()),
            end_date: Some("2016-12-31".into()),
            ..Default::default()
        };
        let published = top_n_report(&conn, &form).unwrap();
        assert!(published
            .html
            .contains("movies released between 2015-06-01 and 2016-12-31"));
        assert!(!published.html.contains("Alpha"));
    }

    #[test]
    fn empty_year_is_no_data() {
        let conn = testing::memory();
        seed(&conn);
        let form = HotTopNForm {
            time_type: Some("year".into()),
            year: Some("1999".into()),
            ..Default::default()
        };
        assert!(matches!(top_n_report(&conn, &form), Err(ServiceError::NoData(_))));
    }

    #[test]
    fn year_summary_requires_a_numeric_year() {
        let conn = testing::memory();
        let form = YearHotForm {
            year: Some("20x5".into()),
            n: None,
        };
        assert!(matches!(year_report(&conn, &form), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn year_summary_lists_that_year_only() {
        let conn = testing::memory();
        seed(&conn);
        let form = YearHotForm {
            year: Some("2015".into()),
            n: Some("5".into()),
        };
        let published = year_report(&conn, &form).unwrap();
        assert!(published.html.contains("Yearly Hot Movies Summary – 2015"));
        assert!(published.html.contains("<h3>Top 2 Titles</h3>"));
        assert!(!published.html.contains("Gamma"));
    }

    #[actix_web::test]
    async fn top_n_endpoint_returns_archived_html() {
        let (_dir, config) = testing::temp_config();
        seed(&store::open(&config.db_path).unwrap());
        let app = atest::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = atest::TestRequest::post()
            .uri("/api/reports/hot/top-n")
            .set_form([("time_type", "all"), ("n", "1")])
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let report_id: i64 = resp
            .headers()
            .get(REPORT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap();
        let body = atest::read_body(resp).await;

        let req = atest::TestRequest::get()
            .uri(&format!("/api/reports/archive/{}/content", report_id))
            .to_request();
        let archived = atest::call_and_read_body(&app, req).await;
        assert_eq!(body, archived);
    }

    #[actix_web::test]
    async fn invalid_n_is_a_bad_request() {
        let (_dir, config) = testing::temp_config();
        let app = atest::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;
        let req = atest::TestRequest::post()
            .uri("/api/reports/hot/year")
            .set_form([("year", "2015"), ("n", "-1")])
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            atest::read_body(resp).await,
            web::Bytes::from_static(b"N must be > 0.")
        );
    }
}
