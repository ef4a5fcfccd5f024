use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::query::SavedQuery;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub async fn list(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(list_queries(&conn)?))
}

pub async fn process(
    config: web::Data<AppConfig>,
    query_id: web::Path<i64>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(get_query(&conn, query_id.into_inner())?))
}

pub fn list_queries(conn: &Connection) -> ServiceResult<Vec<SavedQuery>> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, sql_text FROM saved_queries ORDER BY id")?;
    let queries = stmt
        .query_map([], query_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(queries)
}

pub fn get_query(conn: &Connection, query_id: i64) -> ServiceResult<SavedQuery> {
    conn.query_row(
        "SELECT id, name, description, sql_text FROM saved_queries WHERE id = ?1",
        params![query_id],
        query_from_row,
    )
    .optional()?
    .ok_or_else(|| ServiceError::NotFound("The query does not exist.".to_string()))
}

fn query_from_row(row: &Row<'_>) -> rusqlite::Result<SavedQuery> {
    Ok(SavedQuery {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        sql_text: row.get(3)?,
    })
}
