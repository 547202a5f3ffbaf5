// GET /api/health: always 200 while the process is up.
//
// Reports how many models are loaded so a deployment can tell a healthy
// process with no usable models apart from a fully ready one.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "models_loaded": state.registry.len(),
        "available_models": state.registry.names(),
    }))
}
