use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::movie::NewMovie;
use common::requests::AddMovieForm;
use log::info;
use rusqlite::{params, Connection};

pub async fn process(
    config: web::Data<AppConfig>,
    form: web::Form<AddMovieForm>,
) -> ServiceResult<HttpResponse> {
    let movie = movie_from_form(&form)?;
    let conn = store::open(&config.db_path)?;
    let id = insert_movie(&conn, &movie)?;
    info!("Added movie {} ('{}')", id, movie.title);
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

/// Appends one catalog row. Used by the manual insert and the CSV importer.
pub fn insert_movie(conn: &Connection, movie: &NewMovie) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO movies (title, original_language, release_date, release_year,
                             popularity, vote_average, vote_count, overview)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    stmt.execute(params![
        movie.title,
        movie.original_language,
        movie.release_date,
        movie.release_year,
        movie.popularity,
        movie.vote_average,
        movie.vote_count,
        movie.overview,
    ])?;
    Ok(conn.last_insert_rowid())
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validates the manual insert form. Blank ratings and popularity become 0.0,
/// a blank vote count stays NULL.
pub fn movie_from_form(form: &AddMovieForm) -> ServiceResult<NewMovie> {
    let title = non_empty(&form.title)
        .ok_or_else(|| ServiceError::Validation("The title of the film cannot be empty".into()))?;

    let real = |field: &str, raw: &Option<String>| -> ServiceResult<f64> {
        non_empty(raw).map_or(Ok(0.0), |s| {
            s.parse()
                .map_err(|_| ServiceError::Validation(format!("Invalid {}: {}", field, s)))
        })
    };
    let popularity = real("popularity", &form.popularity)?;
    let vote_average = real("vote_average", &form.vote_average)?;
    let vote_count = non_empty(&form.vote_count)
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ServiceError::Validation(format!("Invalid vote_count: {}", s)))
        })
        .transpose()?;

    let release_date = non_empty(&form.release_date).map(str::to_string);
    let release_year = release_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok());

    Ok(NewMovie {
        title: title.to_string(),
        original_language: non_empty(&form.lang).map(str::to_string),
        release_date,
        release_year,
        popularity: Some(popularity),
        vote_average: Some(vote_average),
        vote_count,
        overview: non_empty(&form.overview).map(str::to_string),
    })
}
