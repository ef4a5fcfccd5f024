//! Bulk import of the movie catalog from CSV.
//!
//! The whole input is parsed and validated before the store is touched, and
//! rows are written inside one transaction, so a rejected file leaves the
//! catalog as it was.

use crate::error::{ServiceError, ServiceResult};
use crate::services::movies::insert_movie;
use chrono::{Datelike, NaiveDate};
use common::model::datasource::{ImportMode, ImportSummary};
use common::model::movie::NewMovie;
use csv::{ReaderBuilder, StringRecord};
use log::info;
use md5::Context;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Accepted `release_date` layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Column positions resolved from the header. `title` and `release_date`
/// are mandatory; other absent columns import as NULL.
struct Columns {
    title: usize,
    original_language: Option<usize>,
    release_date: usize,
    popularity: Option<usize>,
    vote_average: Option<usize>,
    vote_count: Option<usize>,
    overview: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> ServiceResult<Self> {
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let required = |name: &str| {
            position(name).ok_or_else(|| {
                ServiceError::Import(format!("Column '{}' not found in CSV.", name))
            })
        };
        let release_date = required("release_date")?;
        let title = required("title")?;
        Ok(Self {
            title,
            original_language: position("original_language"),
            release_date,
            popularity: position("popularity"),
            vote_average: position("vote_average"),
            vote_count: position("vote_count"),
            overview: position("overview"),
        })
    }
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_real(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers, or floats without a fractional part (`"120.0"`).
fn parse_count(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        parse_real(raw)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn read_error(e: csv::Error) -> ServiceError {
    ServiceError::Import(format!("Error reading CSV: {}", e))
}

/// Parses CSV bytes into catalog rows without touching the store.
pub fn read_movies(bytes: &[u8]) -> ServiceResult<Vec<NewMovie>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let header = reader.headers().map_err(read_error)?.clone();
    let columns = Columns::from_header(&header)?;

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let title = cell(&record, Some(columns.title))
            .ok_or_else(|| ServiceError::Import(format!("line {}: title is empty", line)))?;
        let release_date = cell(&record, Some(columns.release_date)).and_then(parse_release_date);

        movies.push(NewMovie {
            title: title.to_string(),
            original_language: cell(&record, columns.original_language).map(str::to_string),
            release_date: release_date.map(|d| d.format("%Y-%m-%d").to_string()),
            release_year: release_date.map(|d| d.year()),
            popularity: cell(&record, columns.popularity).and_then(parse_real),
            vote_average: cell(&record, columns.vote_average).and_then(parse_real),
            vote_count: cell(&record, columns.vote_count).and_then(parse_count),
            overview: cell(&record, columns.overview).map(str::to_string),
        });
    }
    Ok(movies)
}

fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Context::new();
    hasher.consume(bytes);
    format!("{:x}", hasher.finalize())
}

/// Imports CSV bytes into `movies`. `Replace` clears the catalog in the same
/// transaction that inserts the new rows.
pub fn import_movies(
    conn: &mut Connection,
    bytes: &[u8],
    mode: ImportMode,
) -> ServiceResult<ImportSummary> {
    let movies = read_movies(bytes)?;

    let tx = conn.transaction()?;
    if mode == ImportMode::Replace {
        tx.execute("DELETE FROM movies", [])?;
    }
    for movie in &movies {
        insert_movie(&tx, movie)?;
    }
    tx.commit()?;

    let summary = ImportSummary {
        mode,
        imported: movies.len(),
        source_md5: md5_hex(bytes),
    };
    info!(
        "Imported {} movies ({:?}, md5 {})",
        summary.imported, summary.mode, summary.source_md5
    );
    Ok(summary)
}

/// Replaces the catalog with the dataset file at `path`.
pub fn import_dataset_file(conn: &mut Connection, path: &Path) -> ServiceResult<ImportSummary> {
    if !path.exists() {
        return Err(ServiceError::Import(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    let bytes = fs::read(path)?;
    import_movies(conn, &bytes, ImportMode::Replace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;

    const THREE_ROWS: &str = "\
title,original_language,release_date,popularity,vote_average,vote_count,overview
Heat,en,15-12-1995,45.2,8.3,7000,A heist
Amélie,fr,2001-04-25,30.1,8.0,9000,\"Paris, love\"
Ran,ja,1985/06/01,12.0,8.2,1200.0,
";

    #[test]
    fn release_dates_try_each_layout_in_order() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 5);
        assert_eq!(parse_release_date("05-01-2020"), expected);
        assert_eq!(parse_release_date("2020-01-05"), expected);
        assert_eq!(parse_release_date("2020/01/05"), expected);
        assert_eq!(parse_release_date("January 5, 2020"), None);
    }

    #[test]
    fn rows_are_normalised() {
        let movies = read_movies(THREE_ROWS.as_bytes()).unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].release_date.as_deref(), Some("1995-12-15"));
        assert_eq!(movies[0].release_year, Some(1995));
        assert_eq!(movies[1].overview.as_deref(), Some("Paris, love"));
        assert_eq!(movies[2].release_date.as_deref(), Some("1985-06-01"));
        assert_eq!(movies[2].vote_count, Some(1200));
        assert_eq!(movies[2].overview, None);
    }

    #[test]
    fn bad_numbers_and_dates_become_null() {
        let csv = "title,release_date,popularity,vote_count\nX,someday,hot,12.5\n";
        let movies = read_movies(csv.as_bytes()).unwrap();
        assert_eq!(movies[0].release_date, None);
        assert_eq!(movies[0].release_year, None);
        assert_eq!(movies[0].popularity, None);
        assert_eq!(movies[0].vote_count, None);
        assert_eq!(movies[0].vote_average, None);
        assert_eq!(movies[0].original_language, None);
    }

    #[test]
    fn append_adds_exactly_the_new_rows() {
        let mut conn = testing::memory();
        testing::insert_movie(&conn, "Existing 1", "en", "2000-01-01", 1.0, 5.0, 1);
        testing::insert_movie(&conn, "Existing 2", "en", "2000-01-02", 2.0, 5.0, 1);
        let before = testing::movie_count(&conn);

        let summary = import_movies(&mut conn, THREE_ROWS.as_bytes(), ImportMode::Append).unwrap();
        assert_eq!(summary.imported, 3);
        assert_eq!(testing::movie_count(&conn), before + 3);
        assert_eq!(summary.source_md5.len(), 32);
    }

    #[test]
    fn replace_clears_the_catalog_first() {
        let mut conn = testing::memory();
        testing::insert_movie(&conn, "Gone", "en", "2000-01-01", 1.0, 5.0, 1);
        import_movies(&mut conn, THREE_ROWS.as_bytes(), ImportMode::Replace).unwrap();
        assert_eq!(testing::movie_count(&conn), 3);
    }

    #[test]
    fn missing_release_date_column_fails_without_mutation() {
        let mut conn = testing::memory();
        testing::insert_movie(&conn, "Keep", "en", "2000-01-01", 1.0, 5.0, 1);
        let csv = "title,popularity\nHeat,45.2\n";
        for mode in [ImportMode::Append, ImportMode::Replace] {
            let err = import_movies(&mut conn, csv.as_bytes(), mode).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Import failed: Column 'release_date' not found in CSV."
            );
            assert_eq!(testing::movie_count(&conn), 1);
        }
    }

    #[test]
    fn missing_title_column_is_reported_once() {
        let mut conn = testing::memory();
        let csv = "release_date,popularity\n2020-01-01,1.0\n2020-01-02,2.0\n";
        let err = import_movies(&mut conn, csv.as_bytes(), ImportMode::Append).unwrap_err();
        assert_eq!(err.to_string(), "Import failed: Column 'title' not found in CSV.");
        assert_eq!(testing::movie_count(&conn), 0);
    }

    #[test]
    fn invalid_utf8_names_the_line_and_keeps_the_catalog() {
        let mut conn = testing::memory();
        testing::insert_movie(&conn, "Keep", "en", "2000-01-01", 1.0, 5.0, 1);
        let mut csv = b"title,release_date\nA,2020-01-01\nB".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe]);
        csv.extend_from_slice(b",2020-01-02\n");

        let err = import_movies(&mut conn, &csv, ImportMode::Replace).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Import failed: Error reading CSV"), "{}", message);
        assert!(message.contains("line 3"), "{}", message);
        assert!(message.contains("invalid utf-8"), "{}", message);
        assert_eq!(testing::movie_count(&conn), 1);
    }

    #[test]
    fn malformed_row_rolls_back_everything() {
        let mut conn = testing::memory();
        let csv = "title,release_date\nA,2020-01-01\nB,2020-01-02,extra\n";
        let err = import_movies(&mut conn, csv.as_bytes(), ImportMode::Replace).unwrap_err();
        assert!(matches!(err, ServiceError::Import(_)));
        assert_eq!(testing::movie_count(&conn), 0);
    }

    #[test]
    fn missing_dataset_file_is_reported() {
        let mut conn = testing::memory();
        let err = import_dataset_file(&mut conn, Path::new("/nonexistent/Movies_dataset.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("CSV file not found"));
    }
}
