// GET /api/models: models that loaded at startup, with descriptions.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "models": state.registry.list() }))
}
