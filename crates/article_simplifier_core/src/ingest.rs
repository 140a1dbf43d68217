//! crates/article_simplifier_core/src/ingest.rs
//!
//! The document ingestion pipeline.
//!
//! Upload is decoupled from record creation: the client asks for an upload
//! slot, PUTs the file bytes directly to storage, then submits a create
//! request carrying the upload token. The server resolves the token into a
//! durable attachment, fetches the bytes once, and attempts text extraction
//! before persisting. Extraction is best-effort enrichment: a fetch or parse
//! failure substitutes the fallback sentinel and never aborts the create.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{Document, UploadSlot};
use crate::policy::{self, Action, Model, RequestContext, Role};
use crate::ports::{BlobGateway, DocumentStore, NewDocument, PortError, TextExtractor};

/// Substituted for `content` when extraction yields no usable text.
pub const FALLBACK_CONTENT: &str = "No text extracted from PDF";

//=========================================================================================
// Pipeline Error Type
//=========================================================================================

/// Errors surfaced by the ingestion and simplification pipelines.
///
/// Extraction and upstream-fetch failures are deliberately absent: they are
/// swallowed inside the pipeline and degrade to the fallback sentinel.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("cross-owner access denied")]
    CrossOwnerAccessDenied,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

//=========================================================================================
// Request Payload
//=========================================================================================

/// The create-record request submitted after the client has PUT the bytes.
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub description: Option<String>,
    pub upload_token: String,
    pub file_name: String,
}

//=========================================================================================
// The Ingestion Pipeline
//=========================================================================================

/// Orchestrates one ingestion attempt: slot issuance, token resolution,
/// byte fetch, text extraction, ownership guard, persistence.
pub struct IngestPipeline {
    store: Arc<dyn DocumentStore>,
    gateway: Arc<dyn BlobGateway>,
    extractor: Arc<dyn TextExtractor>,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gateway: Arc<dyn BlobGateway>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            store,
            gateway,
            extractor,
        }
    }

    /// Allocates a single-use, time-limited upload slot on the blob gateway.
    /// No application record is persisted.
    pub async fn request_upload_slot(&self, ctx: &RequestContext) -> PipelineResult<UploadSlot> {
        if ctx.role == Role::Unauthenticated {
            return Err(PipelineError::AuthenticationRequired);
        }
        if !policy::allows(ctx.role, Model::Document, Action::IssueUploadSlot) {
            return Err(PipelineError::CrossOwnerAccessDenied);
        }
        let slot = self.gateway.issue_upload_slot().await?;
        Ok(slot)
    }

    /// Creates a document from an already-uploaded file.
    ///
    /// Ordering is canonical: resolve the attachment, extract, apply the
    /// remaining params, persist. Steps 2-3 (fetch + extract) are best-effort;
    /// validation and the ownership guard are not.
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        request: CreateDocumentRequest,
    ) -> PipelineResult<Document> {
        if ctx.role == Role::Unauthenticated {
            return Err(PipelineError::AuthenticationRequired);
        }
        if !policy::allows(ctx.role, Model::Document, Action::Create) {
            return Err(PipelineError::CrossOwnerAccessDenied);
        }
        if request.title.trim().is_empty() {
            return Err(PipelineError::Validation("title must not be empty".into()));
        }

        // 1. Redeem the upload token into a durable file reference.
        let attachment = self
            .gateway
            .resolve_upload(&request.upload_token, &request.file_name)
            .await
            .map_err(|e| {
                PipelineError::Validation(format!("pdfFile attachment unresolved: {e}"))
            })?;

        // 2-3. Fetch the uploaded bytes and extract text, tolerating failure.
        let content = if attachment.url.is_empty() {
            None
        } else {
            Some(self.extract_with_fallback(&attachment.url).await)
        };

        // 4. Ownership guard: the record is attributed to the caller; a create
        // can never name another user as owner.
        let owner = ctx.user_id;

        // 5. Persist.
        let document = self
            .store
            .insert_document(NewDocument {
                user_id: owner,
                title: request.title,
                description: request.description,
                pdf_file: attachment,
                content,
            })
            .await?;

        info!(
            document_id = %document.id,
            file_name = %document.pdf_file.file_name,
            "document ingested"
        );
        Ok(document)
    }

    /// Fetches the attachment bytes and extracts text, substituting the
    /// fallback sentinel on fetch failure, parse failure, or empty output.
    async fn extract_with_fallback(&self, url: &str) -> String {
        let bytes = match self.gateway.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to fetch uploaded file bytes: {e}");
                return FALLBACK_CONTENT.to_string();
            }
        };

        match self.extractor.extract_text(&bytes) {
            Ok(text) if !text.trim().is_empty() => {
                info!("extracted {} characters from PDF", text.len());
                text
            }
            Ok(_) => {
                error!("PDF extraction produced empty text");
                FALLBACK_CONTENT.to_string()
            }
            Err(e) => {
                error!("error extracting text from PDF: {e}");
                FALLBACK_CONTENT.to_string()
            }
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
