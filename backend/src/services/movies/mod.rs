//! # Catalog Service Module
//!
//! Routes under `/api/movies`:
//!
//! *   **`POST /`**: manual single-row insert (form-encoded).
//! *   **`GET /overview`**: catalog totals and the five most popular titles.
//! *   **`GET /hot`**: popularity dashboard for the current year.
//! *   **`POST /search`**: filtered listing plus aggregate stats.

mod add;
mod overview;
mod search;

pub use add::insert_movie;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/movies";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(add::process))
        .route("/overview", get().to(overview::overview))
        .route("/hot", get().to(overview::hot))
        .route("/search", post().to(search::process))
}
