//! Executes a saved query and converts the result set to JSON cells.

use super::list::get_query;
use crate::config::AppConfig;
use crate::error::ServiceResult;
use crate::store;
use actix_web::{web, HttpResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::model::query::QueryRun;
use common::requests::RunQueryForm;
use log::{info, warn};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value as JsonValue;

const PLACEHOLDER_MARKER: char = '?';

type ResultSet = (Vec<String>, Vec<Vec<JsonValue>>);

pub async fn process(
    config: web::Data<AppConfig>,
    query_id: web::Path<i64>,
    form: web::Form<RunQueryForm>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    let run = run_saved_query(&conn, query_id.into_inner(), form.param.as_deref())?;
    Ok(HttpResponse::Ok().json(run))
}

/// Runs saved query `query_id`.
///
/// Only an unknown id is an error. A failing statement yields a `QueryRun`
/// whose `error` carries SQLite's message unchanged.
pub fn run_saved_query(
    conn: &Connection,
    query_id: i64,
    param: Option<&str>,
) -> ServiceResult<QueryRun> {
    let query = get_query(conn, query_id)?;
    let outcome = execute(conn, query.sql_text.trim(), param.unwrap_or(""));

    let (columns, rows, error) = match outcome {
        Ok((columns, rows)) => {
            info!("Saved query {} returned {} rows", query_id, rows.len());
            (columns, rows, None)
        }
        Err(e) => {
            warn!("Saved query {} failed: {}", query_id, e);
            (Vec::new(), Vec::new(), Some(e.to_string()))
        }
    };
    Ok(QueryRun {
        name: query.name,
        sql_text: query.sql_text,
        columns,
        rows,
        error,
    })
}

/// With a `?` in the text, `param` fills every positional slot; otherwise
/// the statement runs without parameters.
fn execute(conn: &Connection, sql: &str, param: &str) -> rusqlite::Result<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let slots = if sql.contains(PLACEHOLDER_MARKER) {
        stmt.parameter_count()
    } else {
        0
    };
    let mut rows = stmt.query(params_from_iter(std::iter::repeat(param).take(slots)))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(to_json(row.get_ref(i)?));
        }
        out.push(cells);
    }
    Ok((columns, out))
}

fn to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::String(BASE64.encode(b)),
    }
}
