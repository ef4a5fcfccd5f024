//! # Template Service Module
//!
//! Template store and report generator. Routes under `/api/templates`:
//!
//! *   **`GET /`**: every template, ordered by id.
//! *   **`POST /`**: create a template from a JSON `TemplateDraft`.
//! *   **`GET /{template_id}`**: one template.
//! *   **`POST /{template_id}`**: overwrite a template from a JSON `TemplateDraft`.
//! *   **`POST /{template_id}/activate`**: make it the only active template of its topic.
//!
//! Rendering itself has no route; report handlers call [`render::render_topic`].

mod get;
pub mod render;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::list))
        .route("", post().to(save::create))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", post().to(save::update))
        .route("/{template_id}/activate", post().to(save::activate))
}
