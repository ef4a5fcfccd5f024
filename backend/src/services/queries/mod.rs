//! # Saved Query Service Module
//!
//! Routes under `/api/queries`:
//!
//! *   **`GET /`**: every saved query, ordered by id.
//! *   **`GET /{query_id}`**: one saved query.
//! *   **`POST /{query_id}/run`**: execute it. Form field `param` is bound to
//!     the statement's `?` slots.
//!
//! Saved SQL is admin-authored and runs unsandboxed against the store. It is
//! not meant for untrusted query text.

mod list;
mod run;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/queries";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::list))
        .route("/{query_id}", get().to(list::process))
        .route("/{query_id}/run", post().to(run::process))
}
