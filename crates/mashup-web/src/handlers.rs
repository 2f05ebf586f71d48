//! HTTP handlers

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use mashup_core::validate::WebSubmission;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::job;
use crate::views;
use crate::AppState;

/// GET /
pub async fn index() -> Html<String> {
    Html(views::index(&[], &WebSubmission::default()).into_string())
}

/// POST /mashup
///
/// Validates the form, runs one job to completion and renders its result.
/// Rejections re-render the form and never reach the fetcher.
pub async fn mashup(
    State(state): State<AppState>,
    Form(form): Form<WebSubmission>,
) -> Html<String> {
    let job_id = job::new_job_id();
    let request = match job::admit(&job_id, &form) {
        Ok(request) => request,
        Err(e) => return Html(views::index(&e.reasons, &form).into_string()),
    };

    let outcome = job::run_job(&state, &request, &job_id).await;
    Html(views::result(&request, &outcome).into_string())
}

/// GET /output/:filename
///
/// Only finished artifacts at the top of the output directory are served;
/// per-job scratch directories are not reachable.
pub async fn output(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Response {
    if !is_artifact_name(&filename) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.output_dir().join(&filename);
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// `{job_id}-mashup.mp3` or `{job_id}-mashup.zip` with an alphanumeric id.
pub fn is_artifact_name(name: &str) -> bool {
    let id = name
        .strip_suffix("-mashup.mp3")
        .or_else(|| name.strip_suffix("-mashup.zip"));
    match id {
        Some(id) => !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "module": "mashup-web",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        assert!(is_artifact_name("a1b2c3d4-mashup.mp3"));
        assert!(is_artifact_name("a1b2c3d4-mashup.zip"));
        for name in [
            "-mashup.mp3",
            "a1b2c3d4_downloads",
            "a1b2c3d4-mashup.wav",
            "../a1b2c3d4-mashup.mp3",
            "a1b2/c3d4-mashup.mp3",
            "..-mashup.zip",
        ] {
            assert!(!is_artifact_name(name), "{}", name);
        }
    }
}
