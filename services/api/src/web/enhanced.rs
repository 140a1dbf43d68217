//! services/api/src/web/enhanced.rs
//!
//! Handlers for the simplification flow: generating, saving, listing, and
//! deleting enhanced documents, plus selected-text explanations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::rest::{truncated_html, RichTextResponse};
use crate::web::state::AppState;
use crate::web::{pipeline_error_response, port_error_response};
use article_simplifier_core::domain::{EnhancedDocument, Highlight, Importance, TextExplanation};
use article_simplifier_core::enhance::SaveEnhancedDocumentRequest;
use article_simplifier_core::policy::RequestContext;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceDto {
    Low,
    Medium,
    High,
}

impl From<Importance> for ImportanceDto {
    fn from(value: Importance) -> Self {
        match value {
            Importance::Low => ImportanceDto::Low,
            Importance::Medium => ImportanceDto::Medium,
            Importance::High => ImportanceDto::High,
        }
    }
}

impl From<ImportanceDto> for Importance {
    fn from(value: ImportanceDto) -> Self {
        match value {
            ImportanceDto::Low => Importance::Low,
            ImportanceDto::Medium => Importance::Medium,
            ImportanceDto::High => Importance::High,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HighlightDto {
    pub text: String,
    pub importance: ImportanceDto,
}

impl From<Highlight> for HighlightDto {
    fn from(value: Highlight) -> Self {
        Self {
            text: value.text,
            importance: value.importance.into(),
        }
    }
}

impl From<HighlightDto> for Highlight {
    fn from(value: HighlightDto) -> Self {
        Self {
            text: value.text,
            importance: value.importance.into(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct NotesPayload {
    pub markdown: String,
}

/// The review-and-save payload: notes the client already generated or edited.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnhancedPayload {
    pub notes: NotesPayload,
    pub highlights: Option<BTreeMap<String, HighlightDto>>,
    pub original_document_id: Uuid,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedDocumentResponse {
    pub id: Uuid,
    pub original_document_id: Uuid,
    pub notes: RichTextResponse,
    pub highlights: Option<BTreeMap<String, HighlightDto>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl EnhancedDocumentResponse {
    fn from_domain(enhanced: EnhancedDocument) -> Self {
        Self {
            id: enhanced.id,
            original_document_id: enhanced.original_document_id,
            notes: RichTextResponse {
                truncated_html: truncated_html(&enhanced.notes),
                markdown: enhanced.notes,
            },
            highlights: enhanced.highlights.map(|map| {
                map.into_iter().map(|(k, v)| (k, v.into())).collect()
            }),
            created_at: enhanced.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExplanationPayload {
    pub document_id: Uuid,
    pub selected_text: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextExplanationResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub selected_text: String,
    pub explanation: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TextExplanationResponse {
    fn from_domain(explanation: TextExplanation) -> Self {
        Self {
            id: explanation.id,
            document_id: explanation.document_id,
            selected_text: explanation.selected_text,
            explanation: explanation.explanation,
            created_at: explanation.created_at,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Run the analysis seam against a document and persist the result.
#[utoipa::path(
    post,
    path = "/documents/{id}/enhance",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 201, description = "Enhanced document created", body = EnhancedDocumentResponse),
        (status = 403, description = "Document owned by someone else"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn generate_enhanced_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let enhanced = app_state
        .simplifier
        .generate_enhanced_document(&ctx, id)
        .await
        .map_err(pipeline_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(EnhancedDocumentResponse::from_domain(enhanced)),
    ))
}

/// Save an enhanced document whose notes the client already reviewed.
#[utoipa::path(
    post,
    path = "/enhanced-documents",
    request_body = SaveEnhancedPayload,
    responses(
        (status = 201, description = "Enhanced document created", body = EnhancedDocumentResponse),
        (status = 400, description = "Empty notes"),
        (status = 404, description = "Referenced document not found")
    )
)]
pub async fn save_enhanced_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<SaveEnhancedPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let enhanced = app_state
        .simplifier
        .save_enhanced_document(
            &ctx,
            SaveEnhancedDocumentRequest {
                original_document_id: payload.original_document_id,
                notes: payload.notes.markdown,
                highlights: payload
                    .highlights
                    .map(|map| map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            },
        )
        .await
        .map_err(pipeline_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(EnhancedDocumentResponse::from_domain(enhanced)),
    ))
}

/// List the caller's enhanced documents, newest first.
#[utoipa::path(
    get,
    path = "/enhanced-documents",
    responses(
        (status = 200, description = "Enhanced documents owned by the caller", body = [EnhancedDocumentResponse])
    )
)]
pub async fn list_enhanced_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let enhanced = app_state
        .store
        .list_enhanced_documents(ctx.user_id)
        .await
        .map_err(port_error_response)?;
    let body: Vec<EnhancedDocumentResponse> = enhanced
        .into_iter()
        .map(EnhancedDocumentResponse::from_domain)
        .collect();
    Ok(Json(body))
}

/// Delete an enhanced document the caller owns.
#[utoipa::path(
    delete,
    path = "/enhanced-documents/{id}",
    params(("id" = Uuid, Path, description = "Enhanced document ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found or owned by someone else")
    )
)]
pub async fn delete_enhanced_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .delete_enhanced_document(ctx.user_id, id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request an explanation for a selected passage of a document.
#[utoipa::path(
    post,
    path = "/text-explanations",
    request_body = CreateExplanationPayload,
    responses(
        (status = 201, description = "Explanation created", body = TextExplanationResponse),
        (status = 400, description = "Empty selection"),
        (status = 404, description = "Referenced document not found")
    )
)]
pub async fn create_explanation_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<CreateExplanationPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let explanation = app_state
        .simplifier
        .explain_selected_text(&ctx, payload.document_id, payload.selected_text)
        .await
        .map_err(pipeline_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(TextExplanationResponse::from_domain(explanation)),
    ))
}

/// List the explanations recorded for one of the caller's documents.
#[utoipa::path(
    get,
    path = "/documents/{id}/text-explanations",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Explanations for the document", body = [TextExplanationResponse])
    )
)]
pub async fn list_explanations_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let explanations = app_state
        .store
        .list_text_explanations(ctx.user_id, id)
        .await
        .map_err(port_error_response)?;
    let body: Vec<TextExplanationResponse> = explanations
        .into_iter()
        .map(TextExplanationResponse::from_domain)
        .collect();
    Ok(Json(body))
}
