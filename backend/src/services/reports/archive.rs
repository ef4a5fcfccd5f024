//! # Report Archive
//!
//! Append-only log of generated HTML. There is no update or delete path.

use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::report::GeneratedReport;
use rusqlite::{params, Connection, OptionalExtension, Row};

const REPORT_FORMAT: &str = "html";

const SELECT_REPORTS: &str = "
    SELECT r.id, r.template_id, t.name, r.generated_at, r.format, r.parameters, r.content
    FROM generated_reports r
    LEFT JOIN templates t ON r.template_id = t.id";

pub async fn list(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(list_reports(&conn)?))
}

pub async fn detail(
    config: web::Data<AppConfig>,
    report_id: web::Path<i64>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(get_report(&conn, report_id.into_inner())?))
}

/// Serves the archived HTML exactly as it was stored.
pub async fn content(
    config: web::Data<AppConfig>,
    report_id: web::Path<i64>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    let report = get_report(&conn, report_id.into_inner())?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(report.content))
}

/// Appends a rendered report and returns its id.
pub fn save_report(
    conn: &Connection,
    template_id: i64,
    parameters: &str,
    html: &str,
) -> ServiceResult<i64> {
    conn.execute(
        "INSERT INTO generated_reports (template_id, generated_at, format, parameters, content)
         VALUES (?1, datetime('now', 'localtime'), ?2, ?3, ?4)",
        params![template_id, REPORT_FORMAT, parameters, html],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every archived report, most recent first.
pub fn list_reports(conn: &Connection) -> ServiceResult<Vec<GeneratedReport>> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY r.generated_at DESC, r.id DESC",
        SELECT_REPORTS
    ))?;
    let reports = stmt
        .query_map([], report_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reports)
}

pub fn get_report(conn: &Connection, report_id: i64) -> ServiceResult<GeneratedReport> {
    conn.query_row(
        &format!("{} WHERE r.id = ?1", SELECT_REPORTS),
        params![report_id],
        report_from_row,
    )
    .optional()?
    .ok_or_else(|| ServiceError::NotFound("The report does not exist.".to_string()))
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<GeneratedReport> {
    Ok(GeneratedReport {
        id: row.get(0)?,
        template_id: row.get(1)?,
        template_name: row.get(2)?,
        generated_at: row.get(3)?,
        format: row.get(4)?,
        parameters: row.get(5)?,
        content: row.get(6)?,
    })
}
