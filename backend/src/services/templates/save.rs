use super::get::get_template;
use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::template::TemplateDraft;
use log::info;
use rusqlite::{params, Connection, Transaction};

pub async fn create(
    config: web::Data<AppConfig>,
    payload: web::Json<TemplateDraft>,
) -> ServiceResult<HttpResponse> {
    let mut conn = store::open(&config.db_path)?;
    let id = create_template(&mut conn, &payload)?;
    Ok(HttpResponse::Created().json(get_template(&conn, id)?))
}

pub async fn update(
    config: web::Data<AppConfig>,
    template_id: web::Path<i64>,
    payload: web::Json<TemplateDraft>,
) -> ServiceResult<HttpResponse> {
    let template_id = template_id.into_inner();
    let mut conn = store::open(&config.db_path)?;
    update_template(&mut conn, template_id, &payload)?;
    Ok(HttpResponse::Ok().json(get_template(&conn, template_id)?))
}

pub async fn activate(
    config: web::Data<AppConfig>,
    template_id: web::Path<i64>,
) -> ServiceResult<HttpResponse> {
    let template_id = template_id.into_inner();
    let mut conn = store::open(&config.db_path)?;
    activate_template(&mut conn, template_id)?;
    Ok(HttpResponse::Ok().json(get_template(&conn, template_id)?))
}

/// Checks the required fields and returns the draft with `name` and `topic`
/// trimmed, as they are stored.
fn validate_draft(draft: &TemplateDraft) -> ServiceResult<TemplateDraft> {
    let name = draft.name.trim();
    let topic = draft.topic.trim();
    if name.is_empty() || topic.is_empty() || draft.content_html.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Names, identifiers, and HTML content cannot be empty".to_string(),
        ));
    }
    Ok(TemplateDraft {
        name: name.to_string(),
        topic: topic.to_string(),
        ..draft.clone()
    })
}

/// Clears the active flag on every other template of `topic`.
fn deactivate_others(tx: &Transaction<'_>, topic: &str, keep_id: Option<i64>) -> ServiceResult<()> {
    tx.execute(
        "UPDATE templates SET active = 0 WHERE topic = ?1 AND active = 1 AND id IS NOT ?2",
        params![topic, keep_id],
    )?;
    Ok(())
}

pub fn create_template(conn: &mut Connection, draft: &TemplateDraft) -> ServiceResult<i64> {
    let draft = &validate_draft(draft)?;
    let tx = conn.transaction()?;
    if draft.active {
        deactivate_others(&tx, &draft.topic, None)?;
    }
    tx.execute(
        "INSERT INTO templates (name, topic, description, content_html, active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            draft.name,
            draft.topic,
            draft.description,
            draft.content_html,
            draft.active as i64
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    info!("Created template {} for topic '{}'", id, draft.topic);
    Ok(id)
}

/// Overwrites every field of an existing template. Saving it as active makes
/// it the only active template of its (possibly new) topic.
pub fn update_template(
    conn: &mut Connection,
    template_id: i64,
    draft: &TemplateDraft,
) -> ServiceResult<()> {
    let draft = &validate_draft(draft)?;
    let tx = conn.transaction()?;
    get_template(&tx, template_id)?;
    if draft.active {
        deactivate_others(&tx, &draft.topic, Some(template_id))?;
    }
    tx.execute(
        "UPDATE templates
         SET name = ?1, topic = ?2, description = ?3, content_html = ?4, active = ?5
         WHERE id = ?6",
        params![
            draft.name,
            draft.topic,
            draft.description,
            draft.content_html,
            draft.active as i64,
            template_id
        ],
    )?;
    tx.commit()?;
    info!("Updated template {}", template_id);
    Ok(())
}

pub fn activate_template(conn: &mut Connection, template_id: i64) -> ServiceResult<()> {
    let tx = conn.transaction()?;
    let template = get_template(&tx, template_id)?;
    deactivate_others(&tx, &template.topic, Some(template_id))?;
    tx.execute(
        "UPDATE templates SET active = 1 WHERE id = ?1",
        params![template_id],
    )?;
    tx.commit()?;
    info!(
        "Template {} is now active for topic '{}'",
        template_id, template.topic
    );
    Ok(())
}
