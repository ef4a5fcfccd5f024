//! # Template Retrieval Service
//!
//! Reads templates back from the `templates` table for the listing and detail
//! endpoints.

use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::template::Template;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEMPLATE_COLUMNS: &str = "id, name, topic, description, content_html, active";

pub async fn list(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(list_templates(&conn)?))
}

/// Actix web handler for `GET /api/templates/{template_id}`.
pub async fn process(
    config: web::Data<AppConfig>,
    template_id: web::Path<i64>,
) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    Ok(HttpResponse::Ok().json(get_template(&conn, template_id.into_inner())?))
}

pub fn list_templates(conn: &Connection) -> ServiceResult<Vec<Template>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM templates ORDER BY id",
        TEMPLATE_COLUMNS
    ))?;
    let templates = stmt
        .query_map([], template_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(templates)
}

/// Fetches one template, or `NotFound` when the id is unknown.
pub fn get_template(conn: &Connection, template_id: i64) -> ServiceResult<Template> {
    conn.query_row(
        &format!("SELECT {} FROM templates WHERE id = ?1", TEMPLATE_COLUMNS),
        params![template_id],
        template_from_row,
    )
    .optional()?
    .ok_or_else(|| ServiceError::NotFound("The template does not exist.".to_string()))
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        topic: row.get(2)?,
        description: row.get(3)?,
        content_html: row.get(4)?,
        active: row.get::<_, i64>(5)? != 0,
    })
}
