pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Parse API
        .route("/api/v1/resumes/parse", post(handlers::handle_parse_resume))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::entity::{build_recognizer, NerBackend};
    use crate::models::resume::{CERTIFICATIONS_NOT_FOUND, NOT_FOUND};

    const BOUNDARY: &str = "resume-test-boundary";

    fn app_with(config: Config) -> Router {
        let recognizer = build_recognizer(config.ner_backend, &[]);
        build_router(AppState::new(config, recognizer))
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn parse_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let response = app_with(Config {
            ner_backend: NerBackend::Regex,
            ..Config::default()
        })
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ner_backend"], "regex");
    }

    #[tokio::test]
    async fn test_parse_plain_text_upload() {
        let text = b"John Smith\nSoftware Engineer\njohn@example.com\n\nSKILLS\nPython, Docker\n";
        let response = app()
            .oneshot(parse_request(multipart_body("resume", "cv.txt", "text/plain", text)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["document_id"].is_string());
        assert!(body["parsed_at"].is_string());
        assert_eq!(body["format"], "plain_text");
        assert_eq!(body["warnings"].as_array().unwrap().len(), 0);

        let record = &body["record"];
        assert_eq!(record["personal_info"]["name"], "John Smith");
        assert_eq!(record["personal_info"]["emails"][0], "john@example.com");
        assert_eq!(record["personal_info"]["phone"], NOT_FOUND);
        assert_eq!(record["skills"]["Programming Languages"][0], "Python");
        assert_eq!(record["certifications"][0], CERTIFICATIONS_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_format_falls_back_to_extension() {
        let response = app()
            .oneshot(parse_request(multipart_body(
                "resume",
                "cv.txt",
                "application/octet-stream",
                b"Jane Doe",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_returns_sentinels_with_warning() {
        let response = app()
            .oneshot(parse_request(multipart_body(
                "resume",
                "cv.pdf",
                "application/pdf",
                b"%PDF-garbage",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(body["record"]["personal_info"]["name"], NOT_FOUND);
        assert_eq!(body["record"]["text"], "");
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected() {
        let response = app()
            .oneshot(parse_request(multipart_body(
                "resume",
                "photo.png",
                "image/png",
                b"\x89PNG",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_missing_field_rejected() {
        let response = app()
            .oneshot(parse_request(multipart_body(
                "attachment",
                "cv.txt",
                "text/plain",
                b"Jane Doe",
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_filename_rejected() {
        let response = app()
            .oneshot(parse_request(multipart_body("resume", "", "text/plain", b"")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let config = Config {
            max_upload_bytes: 64,
            ..Config::default()
        };
        let response = app_with(config)
            .oneshot(parse_request(multipart_body(
                "resume",
                "cv.txt",
                "text/plain",
                &[b'a'; 4096],
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
