use crate::engine::EngineResponse;
use crate::search_service::{SearchOutcome, SearchService};
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, Result as ActixResult, web};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub from: Option<String>,
}

/// Pass an engine response through with its own status, content type and
/// body. Responses without a content type are labelled as JSON.
fn relay(response: EngineResponse) -> HttpResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    HttpResponse::build(status)
        .content_type(content_type)
        .body(response.body)
}

fn engine_unavailable(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadGateway().json(serde_json::json!({
        "error": format!("Search engine unavailable: {}", e)
    }))
}

/// Search endpoint handler
async fn search_handler(
    params: web::Query<SearchParams>,
    service: web::Data<Arc<SearchService>>,
) -> ActixResult<HttpResponse> {
    match service
        .search(params.q.as_deref(), params.from.as_deref())
        .await
    {
        Ok(SearchOutcome::NoQuery) => Ok(HttpResponse::NoContent().finish()),
        Ok(SearchOutcome::Relayed { response, .. }) => Ok(relay(response)),
        Err(e) => {
            error!("Search failed: {}", e);
            Ok(engine_unavailable(e))
        }
    }
}

/// Document lookup handler
async fn document_handler(
    doc_id: web::Path<String>,
    service: web::Data<Arc<SearchService>>,
) -> ActixResult<HttpResponse> {
    match service.document(&doc_id).await {
        Ok(response) => Ok(relay(response)),
        Err(e) => {
            error!("Document lookup failed: {}", e);
            Ok(engine_unavailable(e))
        }
    }
}

/// Health check endpoint
async fn health_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::get().to(search_handler))
        .route("/search", web::post().to(search_handler))
        .route("/document/{doc_id}", web::get().to(document_handler))
        .route("/health", web::get().to(health_handler));
}

/// Start the HTTP API server
pub async fn start_server(service: SearchService, host: String, port: u16) -> std::io::Result<()> {
    let service = Arc::new(service);

    info!("Starting HTTP server on {}:{}", host, port);
    info!("Index: {}", service.engine().index());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(service.clone()))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
