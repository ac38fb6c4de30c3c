use crate::app::http::error::ApiError;
use crate::app::http::render::{PageBody, upload_page};
use crate::app::http::upload::read_upload;
use crate::app::pipeline::report::{ReportContext, ReportUpload};
use crate::core::bidding::recompute;
use crate::core::models::keyword::KeywordBidRecord;
use crate::core::pipeline::Pipeline;
use crate::core::report::ReportError;
use crate::sample_or_attach_root_span;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use anyhow::Error;
use opentelemetry::metrics::Counter;
use opentelemetry::{KeyValue, global};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use tracing::{Instrument, Span, debug, error};

static REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter("ppcbid")
        .u64_counter("requests")
        .with_description("All requests answered, by route and status")
        .with_unit("1")
        .build()
});

const HEALTH_ROUTE: &str = "/api/health";
const PROCESS_ROUTE: &str = "/api/process-ppc";
const RECOMPUTE_ROUTE: &str = "/api/recompute";
const INDEX_ROUTE: &str = "/";

/// Shared, read only request state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<ReportContext, Error>>,
    pub default_target_acos: f64,
    pub max_bytes: usize,
    pub span_sample_rate: f32,
}

impl AppState {
    /// Registers state and every route on an actix app
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let json_config = web::JsonConfig::default()
            .limit(self.max_bytes)
            .error_handler(|err, _req: &HttpRequest| {
                let response = HttpResponse::build(err.status_code())
                    .json(json!({ "error": err.to_string() }));

                actix_web::error::InternalError::from_response(err, response).into()
            });

        cfg.app_data(web::Data::new(self.clone()))
            .app_data(json_config);

        routes(cfg);
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route(HEALTH_ROUTE, web::get().to(health))
        .route(PROCESS_ROUTE, web::post().to(process_ppc))
        .route(RECOMPUTE_ROUTE, web::post().to(recompute_rows))
        .route(INDEX_ROUTE, web::get().to(index))
        .route(INDEX_ROUTE, web::post().to(index_upload));
}

fn finish(route: &'static str, response: HttpResponse) -> HttpResponse {
    REQUESTS_TOTAL.add(
        1,
        &[
            KeyValue::new("route", route),
            KeyValue::new("status", response.status().as_u16() as i64),
        ],
    );

    response
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

/// Reads the upload and runs it through the report pipeline. Must run
/// inside a span declaring a `report_id` field.
async fn process_report(state: &AppState, payload: Multipart) -> Result<Vec<KeywordBidRecord>, ApiError> {
    let form = read_upload(payload, state.max_bytes).await?;
    let target_acos = form.target_acos.unwrap_or(state.default_target_acos);

    let context = ReportContext::new(
        ReportUpload {
            filename: form.filename,
            bytes: form.bytes,
        },
        target_acos,
    );

    Span::current().record("report_id", context.report_id.as_str());

    match state.pipeline.run(&context).await {
        Ok(_) => {
            debug!("Report {} pipeline success", context.report_id);
            Ok(context.take_records())
        }
        Err(e) => {
            let err = ApiError::from(e);

            if err.report_error().is_some() {
                debug!("Report {} rejected: {}", context.report_id, err);
            } else {
                error!("Report {} pipeline failed: {:?}", context.report_id, err);
            }

            Err(err)
        }
    }
}

async fn health() -> HttpResponse {
    finish(HEALTH_ROUTE, HttpResponse::Ok().json(json!({ "status": "healthy" })))
}

async fn process_ppc(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let span = sample_or_attach_root_span!(
        state.span_sample_rate,
        "process_ppc",
        report_id = tracing::field::Empty,
    );

    let response = match process_report(&state, payload).instrument(span).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => e.error_response(),
    };

    finish(PROCESS_ROUTE, response)
}

#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    #[serde(default)]
    pub target_acos: Option<f64>,
    pub rows: Vec<KeywordBidRecord>,
}

/// Prices rows a caller already parsed, without a file round trip
async fn recompute_rows(state: web::Data<AppState>, body: web::Json<RecomputeRequest>) -> HttpResponse {
    let request = body.into_inner();

    let target_acos = match request.target_acos {
        None => state.default_target_acos,
        Some(target) if target.is_finite() && target >= 0.0 => target,
        Some(target) => {
            let err = ReportError::InvalidTargetAcos(target.to_string());
            return finish(RECOMPUTE_ROUTE, err.error_response());
        }
    };

    let rows: Vec<KeywordBidRecord> = recompute(request.rows, target_acos).collect();

    finish(RECOMPUTE_ROUTE, HttpResponse::Ok().json(rows))
}

async fn index(state: web::Data<AppState>) -> HttpResponse {
    finish(
        INDEX_ROUTE,
        html(
            StatusCode::OK,
            upload_page(state.default_target_acos, PageBody::Empty),
        ),
    )
}

async fn index_upload(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let span = sample_or_attach_root_span!(
        state.span_sample_rate,
        "index_upload",
        report_id = tracing::field::Empty,
    );

    let response = match process_report(&state, payload).instrument(span).await {
        Ok(records) => html(
            StatusCode::OK,
            upload_page(state.default_target_acos, PageBody::Table(&records)),
        ),
        Err(e) => html(
            e.status_code(),
            upload_page(state.default_target_acos, PageBody::Error(&e.to_string())),
        ),
    };

    finish(INDEX_ROUTE, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::report::build_report_pipeline;
    use crate::core::report::ColumnContract;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{App, test};
    use serde_json::Value;

    const BOUNDARY: &str = "ppcbid-test-boundary";

    const REPORT: &str = "Keyword,Match Type,State,Keyword bid(USD),CPC(USD),ACOS,Impressions\n\
shoes,EXACT,enabled,0.75,$1.00,10%,100\n\
boots,BROAD,enabled,1.10,2.00,40,50\n\
sandals,PHRASE,paused,0.50,$1.50,-,10\n";

    struct Part<'a> {
        name: &'a str,
        filename: Option<&'a str>,
        body: &'a [u8],
    }

    fn file(filename: &'static str, body: &'static str) -> Part<'static> {
        Part {
            name: "file",
            filename: Some(filename),
            body: body.as_bytes(),
        }
    }

    fn field(name: &'static str, value: &'static str) -> Part<'static> {
        Part {
            name,
            filename: None,
            body: value.as_bytes(),
        }
    }

    fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
        let mut body = Vec::new();

        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part.filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(part.body);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        (format!("multipart/form-data; boundary={}", BOUNDARY), body)
    }

    fn state(max_bytes: usize) -> AppState {
        AppState {
            pipeline: Arc::new(build_report_pipeline(ColumnContract::default()).unwrap()),
            default_target_acos: 30.0,
            max_bytes,
            span_sample_rate: 0.0,
        }
    }

    fn upload(uri: &str, parts: &[Part<'_>]) -> test::TestRequest {
        let (content_type, body) = multipart(parts);

        test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body)
    }

    async fn call(state: AppState, req: test::TestRequest) -> (StatusCode, Vec<u8>) {
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;

        (status, body.to_vec())
    }

    async fn call_json(state: AppState, req: test::TestRequest) -> (StatusCode, Value) {
        let (status, body) = call(state, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_health() {
        let req = test::TestRequest::get().uri("/api/health");
        let (status, body) = call_json(state(1024), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[actix_web::test]
    async fn test_process_csv_report() {
        let req = upload("/api/process-ppc", &[file("keywords.csv", REPORT)]);
        let (status, body) = call_json(state(1024 * 1024), req).await;

        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Keyword/Automatic targeting groups"], json!("shoes"));
        assert_eq!(rows[0]["CPC(USD)"], json!("$1.00"));
        assert_eq!(rows[0]["Keyword bid(USD)"], json!(0.75));
        assert_eq!(rows[0]["Target ACOS"], json!(30.0));
        assert_eq!(rows[0]["New Max Bid"], json!(1.2));
        assert_eq!(rows[1]["New Max Bid"], json!(1.5));
        assert_eq!(rows[2]["ACOS"], json!("-"));
        assert_eq!(rows[2]["New Max Bid"], json!(1.8));
        assert!(rows[0].get("Impressions").is_none());
    }

    #[actix_web::test]
    async fn test_target_acos_field_overrides_default() {
        let req = upload(
            "/api/process-ppc",
            &[field("target_acos", "20"), file("keywords.csv", REPORT)],
        );
        let (status, body) = call_json(state(1024 * 1024), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["Target ACOS"], json!(20.0));
        assert_eq!(body[1]["New Max Bid"], json!(1.0));
    }

    #[actix_web::test]
    async fn test_upload_errors() {
        let cases: Vec<(Vec<Part<'static>>, StatusCode, &str)> = vec![
            (
                vec![field("target_acos", "30")],
                StatusCode::BAD_REQUEST,
                "No file part",
            ),
            (
                vec![file("", REPORT)],
                StatusCode::BAD_REQUEST,
                "No selected file",
            ),
            (
                vec![file("keywords.txt", REPORT)],
                StatusCode::BAD_REQUEST,
                "Invalid file type",
            ),
            (
                vec![file("keywords.csv", "Keyword,ACOS\nshoes,10\n")],
                StatusCode::UNPROCESSABLE_ENTITY,
                "Missing required column(s): Match Type, State, Keyword bid(USD), CPC(USD)",
            ),
        ];

        for (parts, expected_status, expected_error) in cases {
            let req = upload("/api/process-ppc", &parts);
            let (status, body) = call_json(state(1024 * 1024), req).await;

            assert_eq!(status, expected_status, "{}", expected_error);
            assert_eq!(body["error"], json!(expected_error));
        }
    }

    #[actix_web::test]
    async fn test_invalid_target_acos() {
        let req = upload(
            "/api/process-ppc",
            &[field("target_acos", "lots"), file("keywords.csv", REPORT)],
        );
        let (status, body) = call_json(state(1024 * 1024), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid target ACOS"));
    }

    #[actix_web::test]
    async fn test_oversized_upload() {
        let req = upload("/api/process-ppc", &[file("keywords.csv", REPORT)]);
        let (status, _) = call_json(state(16), req).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn test_not_multipart() {
        let req = test::TestRequest::post()
            .uri("/api/process-ppc")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{}");
        let (status, body) = call_json(state(1024), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_recompute_rows() {
        let req = test::TestRequest::post()
            .uri("/api/recompute")
            .set_json(json!({
                "target_acos": 20,
                "rows": [
                    { "Keyword/Automatic targeting groups": "boots", "CPC(USD)": 2.0, "ACOS": 40 },
                    { "Keyword/Automatic targeting groups": "own", "CPC(USD)": 2.0, "ACOS": 40, "Target ACOS": 60 },
                    { "Keyword/Automatic targeting groups": "bad", "CPC(USD)": "abc" }
                ]
            }));
        let (status, body) = call_json(state(1024 * 1024), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["New Max Bid"], json!(1.0));
        assert_eq!(body[0]["Target ACOS"], json!(20.0));
        assert_eq!(body[1]["New Max Bid"], json!(2.4));
        assert_eq!(body[2]["New Max Bid"], json!(0.0));
    }

    #[actix_web::test]
    async fn test_recompute_rejects_bad_input() {
        let bad_target = test::TestRequest::post()
            .uri("/api/recompute")
            .set_json(json!({ "target_acos": -1, "rows": [] }));
        let (status, body) = call_json(state(1024), bad_target).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let bad_body = test::TestRequest::post()
            .uri("/api/recompute")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{\"rows\": 5}");
        let (status, body) = call_json(state(1024), bad_body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_index_page() {
        let req = test::TestRequest::get().uri("/");
        let (status, body) = call(state(1024), req).await;
        let body = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("enctype=\"multipart/form-data\""));
        assert!(!body.contains("<table"));
    }

    #[actix_web::test]
    async fn test_index_upload_renders_table_or_error() {
        let req = upload("/", &[file("keywords.csv", REPORT)]);
        let (status, body) = call(state(1024 * 1024), req).await;
        let body = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<table class=\"table table-striped\">"));
        assert!(body.contains("<td>boots</td>"));
        assert!(body.contains("<td>1.50</td>"));

        let req = upload("/", &[file("keywords.pdf", REPORT)]);
        let (status, body) = call(state(1024 * 1024), req).await;
        let body = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid file type"));
        assert!(!body.contains("<table"));
    }
}
