//! Axum route handlers for the template and render API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Span};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::resolver::{LayoutMeta, ResolvedLayout};
use crate::layout::rules::TemplateRules;
use crate::models::ast::ResumeAst;
use crate::models::legacy::LegacyResume;
use crate::pipeline::{self, ContractError};
use crate::state::AppState;

pub const RENDER_ID_HEADER: &str = "x-render-id";
pub const DROPPED_ENTRIES_HEADER: &str = "x-dropped-entries";
pub const DROPPED_BULLETS_HEADER: &str = "x-dropped-bullets";
pub const DIGEST_HEADER: &str = "x-render-digest";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Template name; the configured default when absent.
    #[serde(default)]
    pub template: Option<String>,
    pub resume: LegacyResume,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub default: String,
    pub templates: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn template_rules(
    state: &AppState,
    requested: Option<&str>,
) -> Result<(String, Arc<TemplateRules>), AppError> {
    let name = requested.unwrap_or(state.config.default_template.as_str());
    let rules = state
        .templates
        .get(name)
        .ok_or_else(|| AppError::NotFound(format!("template '{name}' does not exist")))?;
    Ok((name.to_string(), rules))
}

/// Runs a CPU-bound pipeline stage off the async executor, inside `span`.
async fn run_blocking<T, F>(span: Span, stage: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ContractError> + Send + 'static,
    T: Send + 'static,
{
    let output = tokio::task::spawn_blocking(move || span.in_scope(stage))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed during render: {e}")))?;
    Ok(output?)
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid header value '{value}': {e}")))
}

fn render_headers(render_id: Uuid, meta: Option<&LayoutMeta>) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(RENDER_ID_HEADER, header_value(&render_id.to_string())?);
    if let Some(meta) = meta {
        headers.insert(DROPPED_ENTRIES_HEADER, HeaderValue::from(meta.dropped_entries));
        headers.insert(DROPPED_BULLETS_HEADER, HeaderValue::from(meta.dropped_bullets));
    }
    Ok(headers)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        default: state.config.default_template.clone(),
        templates: state.templates.names().into_iter().map(str::to_string).collect(),
    })
}

/// GET /api/v1/templates/:name
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TemplateRules>, AppError> {
    let (_, rules) = template_rules(&state, Some(&name))?;
    Ok(Json(rules.as_ref().clone()))
}

/// POST /api/v1/resumes/ast
///
/// Canonical AST for a legacy record, before any fitting.
pub async fn handle_build_ast(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<(HeaderMap, Json<ResumeAst>), AppError> {
    let render_id = Uuid::new_v4();
    let (template, rules) = template_rules(&state, request.template.as_deref())?;
    let span = info_span!("build_ast", %render_id, %template);
    let resume = request.resume;

    let ast = run_blocking(span, move || pipeline::build_ast(&resume, &rules)).await?;

    Ok((render_headers(render_id, None)?, Json(ast)))
}

/// POST /api/v1/resumes/layout
///
/// The one-page layout: what survives, plus drop counters in `meta`.
pub async fn handle_resolve_layout(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<(HeaderMap, Json<ResolvedLayout>), AppError> {
    let render_id = Uuid::new_v4();
    let (template, rules) = template_rules(&state, request.template.as_deref())?;
    let span = info_span!("resolve_layout", %render_id, %template);
    let resume = request.resume;

    let layout = run_blocking(span, move || pipeline::build_layout(&resume, &rules)).await?;

    Ok((render_headers(render_id, Some(&layout.meta))?, Json(layout)))
}

/// POST /api/v1/render/html
pub async fn handle_render_html(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let render_id = Uuid::new_v4();
    let (template, rules) = template_rules(&state, request.template.as_deref())?;
    let span = info_span!("render_html", %render_id, %template);
    let resume = request.resume;

    let output =
        run_blocking(span, move || pipeline::render_html_document(&resume, &rules)).await?;

    let headers = render_headers(render_id, Some(&output.meta))?;
    Ok((headers, Html(output.document.markup)).into_response())
}

/// POST /api/v1/render/pdf
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let render_id = Uuid::new_v4();
    let (template, rules) = template_rules(&state, request.template.as_deref())?;
    let span = info_span!("render_pdf", %render_id, %template);
    let resume = request.resume;

    let output = run_blocking(span, move || pipeline::render_pdf_document(&resume, &rules)).await?;

    let mut headers = render_headers(render_id, Some(&output.meta))?;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(DIGEST_HEADER, header_value(&output.digest)?);
    Ok((headers, Bytes::from(output.bytes)).into_response())
}
