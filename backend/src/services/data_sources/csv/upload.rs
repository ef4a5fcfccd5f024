use super::import_movies;
use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::requests::ImportQuery;
use futures_util::StreamExt;
use log::warn;

const FILE_FIELD: &str = "csv_file";

/// Accepts a multipart upload and imports it in the mode given by `?mode=`.
pub async fn process(
    config: web::Data<AppConfig>,
    query: web::Query<ImportQuery>,
    payload: Multipart,
) -> ServiceResult<HttpResponse> {
    let bytes = read_csv_field(payload).await.inspect_err(|e| {
        warn!("Rejected CSV upload: {}", e);
    })?;
    let mut conn = store::open(&config.db_path)?;
    let summary = import_movies(&mut conn, &bytes, query.mode)?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Buffers the `csv_file` part. Other parts are drained and ignored.
async fn read_csv_field(mut payload: Multipart) -> ServiceResult<Vec<u8>> {
    let upload_error = |e: actix_multipart::MultipartError| ServiceError::Upload(e.to_string());
    let mut file: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(upload_error)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(upload_error)?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if filename.is_empty() {
            return Err(ServiceError::Upload("Unselected file".to_string()));
        }
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ServiceError::Upload(
                "Please upload the file in CSV format".to_string(),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk.map_err(upload_error)?);
        }
        file = Some(bytes);
    }

    file.ok_or_else(|| ServiceError::Upload("The uploaded file was not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use crate::store::{self, testing};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App};
    use common::model::datasource::{ImportMode, ImportSummary};

    const BOUNDARY: &str = "movieboundary";

    fn multipart_body(field: &str, filename: &str, content: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
            b = BOUNDARY,
        )
    }

    fn upload(uri: &str, body: String) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn upload_replaces_catalog() {
        let (_dir, config) = testing::temp_config();
        testing::insert_movie(
            &store::open(&config.db_path).unwrap(),
            "Old",
            "en",
            "1990-01-01",
            1.0,
            5.0,
            1,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let csv = "title,original_language,release_date,popularity,vote_average,vote_count\n\
                   Heat,en,15-12-1995,45.2,8.3,7000\n\
                   Ran,ja,1985-06-01,12.0,8.2,1200\n";
        let req = upload(
            "/api/data_sources/csv/upload?mode=replace",
            multipart_body("csv_file", "movies.csv", csv),
        )
        .to_request();
        let summary: ImportSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.mode, ImportMode::Replace);
        assert_eq!(summary.imported, 2);
        assert_eq!(testing::movie_count(&store::open(&config.db_path).unwrap()), 2);
    }

    #[actix_web::test]
    async fn non_csv_filename_is_rejected() {
        let (_dir, config) = testing::temp_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = upload(
            "/api/data_sources/csv/upload",
            multipart_body("csv_file", "movies.txt", "title,release_date\n"),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            test::read_body(resp).await,
            web::Bytes::from_static(b"Upload failed: Please upload the file in CSV format")
        );
    }

    #[actix_web::test]
    async fn missing_file_field_is_rejected() {
        let (_dir, config) = testing::temp_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = upload(
            "/api/data_sources/csv/upload",
            multipart_body("other", "movies.csv", "title,release_date\n"),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
