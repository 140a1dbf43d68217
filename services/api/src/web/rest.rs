//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the document ingestion REST endpoints and
//! the master definition for the OpenAPI specification.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::enhanced;
use crate::web::state::AppState;
use crate::web::{pipeline_error_response, port_error_response};
use article_simplifier_core::domain::Document;
use article_simplifier_core::ingest::CreateDocumentRequest;
use article_simplifier_core::policy::RequestContext;
use article_simplifier_core::ports::DocumentPatch;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        request_upload_slot_handler,
        create_document_handler,
        list_documents_handler,
        get_document_handler,
        update_document_handler,
        delete_document_handler,
        enhanced::generate_enhanced_handler,
        enhanced::save_enhanced_handler,
        enhanced::list_enhanced_handler,
        enhanced::delete_enhanced_handler,
        enhanced::create_explanation_handler,
        enhanced::list_explanations_handler,
    ),
    components(schemas(
        crate::web::auth::SignupRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::AuthResponse,
        UploadSlotResponse,
        CreateDocumentPayload,
        PdfFilePayload,
        UpdateDocumentPayload,
        DocumentResponse,
        FileAttachmentResponse,
        RichTextResponse,
        enhanced::SaveEnhancedPayload,
        enhanced::NotesPayload,
        enhanced::EnhancedDocumentResponse,
        enhanced::HighlightDto,
        enhanced::ImportanceDto,
        enhanced::CreateExplanationPayload,
        enhanced::TextExplanationResponse,
    )),
    tags(
        (name = "Article Simplifier API", description = "API endpoints for PDF document upload, text extraction, and simplification.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The upload slot issued by the blob gateway: PUT the file bytes to
/// `uploadUrl`, then redeem `token` when creating the document.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlotResponse {
    pub upload_url: String,
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PdfFilePayload {
    pub direct_upload_token: String,
    pub file_name: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentPayload {
    pub title: String,
    pub description: Option<String>,
    pub pdf_file: PdfFilePayload,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Rich-text projection of stored markdown.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RichTextResponse {
    pub markdown: String,
    pub truncated_html: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachmentResponse {
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub byte_size: i64,
}

/// The document read projection used by the list and detail pages.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<RichTextResponse>,
    pub pdf_file: FileAttachmentResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Character budget for the truncated HTML rendition.
const TRUNCATED_HTML_CHARS: usize = 280;

/// Renders a short, HTML-safe preview of markdown content.
pub(crate) fn truncated_html(markdown: &str) -> String {
    let mut escaped = String::new();
    for c in markdown.chars().take(TRUNCATED_HTML_CHARS) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    if markdown.chars().count() > TRUNCATED_HTML_CHARS {
        escaped.push('…');
    }
    format!("<p>{escaped}</p>")
}

impl DocumentResponse {
    pub fn from_domain(document: Document) -> Self {
        Self {
            id: document.id,
            title: document.title,
            description: document.description,
            content: document.content.map(|markdown| RichTextResponse {
                truncated_html: truncated_html(&markdown),
                markdown,
            }),
            pdf_file: FileAttachmentResponse {
                url: document.pdf_file.url,
                file_name: document.pdf_file.file_name,
                content_type: document.pdf_file.content_type,
                byte_size: document.pdf_file.byte_size,
            },
            created_at: document.created_at,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Request an upload slot on the blob gateway.
///
/// The client PUTs the raw file bytes to the returned URL, then submits a
/// create-document request carrying the token. No record is persisted here.
#[utoipa::path(
    post,
    path = "/uploads",
    responses(
        (status = 201, description = "Upload slot issued", body = UploadSlotResponse),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn request_upload_slot_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let slot = app_state
        .pipeline
        .request_upload_slot(&ctx)
        .await
        .map_err(pipeline_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadSlotResponse {
            upload_url: slot.upload_url,
            token: slot.upload_token,
        }),
    ))
}

/// Create a document from an already-uploaded PDF.
///
/// Resolves the direct-upload token into an attachment, fetches the bytes,
/// and extracts text. Extraction failure substitutes a fallback sentinel and
/// never fails the request.
#[utoipa::path(
    post,
    path = "/documents",
    request_body = CreateDocumentPayload,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Missing title or unresolvable upload token"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_document_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<CreateDocumentPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = app_state
        .pipeline
        .create_document(
            &ctx,
            CreateDocumentRequest {
                title: payload.title,
                description: payload.description,
                upload_token: payload.pdf_file.direct_upload_token,
                file_name: payload.pdf_file.file_name,
            },
        )
        .await
        .map_err(pipeline_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from_domain(document)),
    ))
}

/// List the caller's documents, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "Documents owned by the caller", body = [DocumentResponse]),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let documents = app_state
        .store
        .list_documents(ctx.user_id)
        .await
        .map_err(port_error_response)?;

    let body: Vec<DocumentResponse> = documents
        .into_iter()
        .map(DocumentResponse::from_domain)
        .collect();
    Ok(Json(body))
}

/// Fetch a single document the caller owns.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "The document", body = DocumentResponse),
        (status = 404, description = "Not found or owned by someone else")
    )
)]
pub async fn get_document_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = app_state
        .store
        .get_document(ctx.user_id, id)
        .await
        .map_err(port_error_response)?;
    Ok(Json(DocumentResponse::from_domain(document)))
}

/// Update a document's title or description. Content is never re-extracted.
#[utoipa::path(
    patch,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentPayload,
    responses(
        (status = 200, description = "The updated document", body = DocumentResponse),
        (status = 400, description = "Empty title"),
        (status = 404, description = "Not found or owned by someone else")
    )
)]
pub async fn update_document_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err((
            StatusCode::BAD_REQUEST,
            "title must not be empty".to_string(),
        ));
    }

    let document = app_state
        .store
        .update_document(
            ctx.user_id,
            id,
            DocumentPatch {
                title: payload.title,
                description: payload.description,
            },
        )
        .await
        .map_err(port_error_response)?;
    Ok(Json(DocumentResponse::from_domain(document)))
}

/// Delete a document the caller owns.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found or owned by someone else")
    )
)]
pub async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .delete_document(ctx.user_id, id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
