// POST /api/analyze: run a similarity analysis.
//
// Body: { texts: [string], threshold?: number, models?: [string] }
// Missing threshold defaults to 0.8; missing models to ["all-MiniLM-L6-v2"].
// A body that doesn't parse is a 400 with the parser's message.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::orchestrator::{self, AnalysisReport, DEFAULT_THRESHOLD};
use crate::embedding::catalog::DEFAULT_MODEL;
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_models() -> Vec<String> {
    vec![DEFAULT_MODEL.to_string()]
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return api_error(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    let result = orchestrator::analyze(
        &state.registry,
        request.texts,
        request.threshold,
        &request.models,
    )
    .await;

    match result {
        Ok(report) => Json(AnalyzeResponse {
            success: true,
            report,
        })
        .into_response(),
        Err(e) if e.is_client_error() => api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"texts": ["a", "b"]}"#).unwrap();
        assert_eq!(req.texts, vec!["a", "b"]);
        assert!((req.threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(req.models, vec!["all-MiniLM-L6-v2"]);
    }

    #[test]
    fn test_request_missing_texts_is_empty() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"threshold": 0.5}"#).unwrap();
        assert!(req.texts.is_empty());
        assert!((req.threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_request_explicit_models() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"texts": [], "models": ["all-mpnet-base-v2", "paraphrase-MiniLM-L6-v2"]}"#,
        )
        .unwrap();
        assert_eq!(req.models.len(), 2);
    }
}
