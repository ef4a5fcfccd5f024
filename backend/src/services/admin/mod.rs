//! # Admin Service Module
//!
//! Maintenance actions under `/api/admin`. All three are idempotent with respect to the schema
//! and default rows; `import` replaces the catalog.
//!
//! *   **`POST /init`**: creates any missing tables and indexes.
//! *   **`POST /defaults`**: inserts the default templates and saved queries into empty tables.
//! *   **`POST /import`**: reloads the catalog from the configured dataset CSV.

use crate::config::AppConfig;
use crate::error::ServiceResult;
use crate::services::data_sources::csv::import_dataset_file;
use crate::store;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Scope};
use log::info;
use serde::Serialize;
use serde_json::json;

const API_PATH: &str = "/api/admin";

/// Rows inserted by `POST /defaults`.
#[derive(Debug, Serialize)]
struct Seeded {
    templates: usize,
    queries: usize,
}

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/init", post().to(init))
        .route("/defaults", post().to(defaults))
        .route("/import", post().to(import))
}

async fn init(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let conn = store::open(&config.db_path)?;
    store::init_schema(&conn)?;
    info!("Schema initialised at {}", config.db_path.display());
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

async fn defaults(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let mut conn = store::open(&config.db_path)?;
    let (templates, queries) = store::seed_defaults(&mut conn)?;
    Ok(HttpResponse::Ok().json(Seeded { templates, queries }))
}

async fn import(config: web::Data<AppConfig>) -> ServiceResult<HttpResponse> {
    let mut conn = store::open(&config.db_path)?;
    let summary = import_dataset_file(&mut conn, &config.movies_csv_path)?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::datasource::{ImportMode, ImportSummary};
    use serde_json::Value;
    use std::fs;

    #[actix_web::test]
    async fn defaults_are_not_inserted_twice() {
        let (_dir, config) = testing::temp_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/admin/init").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/api/admin/defaults").to_request();
        let counts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(counts, json!({ "templates": 0, "queries": 0 }));
    }

    #[actix_web::test]
    async fn import_reads_configured_dataset() {
        let (_dir, config) = testing::temp_config();
        fs::write(
            &config.movies_csv_path,
            "title,release_date,popularity\nHeat,15-12-1995,45.2\n",
        )
        .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/admin/import").to_request();
        let summary: ImportSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.mode, ImportMode::Replace);
        assert_eq!(summary.imported, 1);
    }

    #[actix_web::test]
    async fn import_without_dataset_is_bad_request() {
        let (_dir, config) = testing::temp_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/admin/import").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
