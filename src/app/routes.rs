use crate::core::lookup::LookupService;
use crate::core::{LookupKey, LookupOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(service: Arc<LookupService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/cep/:cep", get(lookup_handler))
        .route("/lookup/:cep", get(lookup_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn index() -> &'static str {
    "cep-race: GET /cep/{cep}"
}

async fn health_check(State(service): State<Arc<LookupService>>) -> impl IntoResponse {
    let providers: Vec<_> = service.providers().iter().map(|p| p.name()).collect();
    let timeout_ms = service.timeout().as_millis() as u64;

    Json(serde_json::json!({
        "status": "ok",
        "service": "cep-race",
        "providers": providers,
        "timeout_ms": timeout_ms,
        "in_flight": service.in_flight(),
    }))
}

async fn lookup_handler(
    State(service): State<Arc<LookupService>>,
    Path(cep): Path<String>,
) -> Response {
    let key = LookupKey::from(cep);
    tracing::info!("Received CEP: {}", key);

    // Dropped together with this future when the client goes away.
    let scope = CancellationToken::new();
    let _cancel_on_drop = scope.clone().drop_guard();

    match service.lookup_within(&key, &scope).await {
        Ok(LookupOutcome::Resolved(payload)) => (StatusCode::OK, Json(payload)).into_response(),
        Ok(LookupOutcome::TimedOut) => (
            StatusCode::GATEWAY_TIMEOUT,
            format!(
                "Timeout: no provider answered within {} ms",
                service.timeout().as_millis()
            ),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Lookup for {} failed: {}", key, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.user_friendly_message(),
                }),
            )
                .into_response()
        }
    }
}
