//! Bulk movie import from CSV files.
//!
//! - `POST /api/data_sources/csv/upload?mode=append|replace`: multipart upload with the file in
//!   the `csv_file` part. The file is parsed completely before anything is written, then the rows
//!   are inserted in a single transaction. `replace` clears the catalog inside that transaction.
//!   The response is an `ImportSummary` carrying the MD5 of the uploaded bytes.
//!
//! The same importer backs `POST /api/admin/import`, which reloads the dataset file configured
//! for the server.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod import;
mod upload;

pub use import::{import_dataset_file, import_movies};

const API_PATH: &str = "/api/data_sources/csv";

/// Configures and returns the Actix scope for CSV data source routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/upload", post().to(upload::process))
}
