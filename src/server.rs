//! HTTP gateway: route configuration and handlers.
//!
//! The gateway is deliberately thin. It validates that the submitted source
//! code is non-empty, delegates to [`CodeConverter`], and maps the outcome to
//! an HTTP status; every body it emits is a full wire-shaped
//! [`ConversionBody`].

use actix_web::{web, HttpResponse, Responder};
use tracing::info;

use crate::models::{Conversion, ConversionBody, ConversionRequest};
use crate::util::AppState;

/// Configure actix-web routes with AppState.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/status", web::get().to(status))
            .route("/api/convert", web::post().to(convert)),
    );
}

/// Service status endpoint exposing the version and configured model.
async fn status(state: web::Data<AppState>) -> impl Responder {
    web::Json(serde_json::json!({
        "name": "codemorph",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": ["/status", "/api/convert"],
        "model": state.model,
    }))
}

/// Convert a block of source code into the requested target language.
///
/// Empty (or whitespace-only) source code is rejected with 400 before any
/// upstream call is made. A conversion fault maps to 500; the orchestrator
/// guarantees it never surfaces as anything but the error variant.
async fn convert(state: web::Data<AppState>, body: web::Json<ConversionRequest>) -> impl Responder {
    let request = body.into_inner();
    info!(
        "received conversion request: {} to {}",
        request.source_language, request.target_language
    );

    if request.source_code.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ConversionBody::from(Conversion::error("Source code cannot be empty")));
    }

    let outcome = state.converter.convert(&request).await;
    if outcome.is_success() {
        HttpResponse::Ok().json(ConversionBody::from(outcome))
    } else {
        HttpResponse::InternalServerError().json(ConversionBody::from(outcome))
    }
}
