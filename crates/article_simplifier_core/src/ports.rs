//! crates/article_simplifier_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases, blob
//! storage, or PDF parsers.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{
    Analysis, Document, EnhancedDocument, FileAttachment, Highlight, TextExplanation, UploadSlot,
    User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// New-Record Inputs
//=========================================================================================

/// All fields required to persist a new document record.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub pdf_file: FileAttachment,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEnhancedDocument {
    pub user_id: Uuid,
    pub original_document_id: Uuid,
    pub notes: String,
    pub highlights: Option<BTreeMap<String, Highlight>>,
}

#[derive(Debug, Clone)]
pub struct NewTextExplanation {
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub selected_text: String,
    pub explanation: Option<String>,
}

/// The editable subset of a document. Updating never triggers re-extraction.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The record store holding documents, enhanced documents, text explanations,
/// and auth data. All read methods are owner-scoped: a caller only ever sees
/// records they own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Document Management ---
    async fn insert_document(&self, new: NewDocument) -> PortResult<Document>;

    async fn get_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<Document>;

    async fn list_documents(&self, owner: Uuid) -> PortResult<Vec<Document>>;

    async fn update_document(
        &self,
        owner: Uuid,
        document_id: Uuid,
        patch: DocumentPatch,
    ) -> PortResult<Document>;

    async fn delete_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<()>;

    // --- Enhanced Document Management ---
    async fn insert_enhanced_document(
        &self,
        new: NewEnhancedDocument,
    ) -> PortResult<EnhancedDocument>;

    async fn list_enhanced_documents(&self, owner: Uuid) -> PortResult<Vec<EnhancedDocument>>;

    async fn delete_enhanced_document(&self, owner: Uuid, enhanced_id: Uuid) -> PortResult<()>;

    // --- Text Explanation Management ---
    async fn insert_text_explanation(
        &self,
        new: NewTextExplanation,
    ) -> PortResult<TextExplanation>;

    async fn list_text_explanations(
        &self,
        owner: Uuid,
        document_id: Uuid,
    ) -> PortResult<Vec<TextExplanation>>;
}

/// The external blob upload gateway. Issues single-use, time-limited upload
/// slots, redeems upload tokens into durable file references, and serves the
/// uploaded bytes back for content inspection.
#[async_trait]
pub trait BlobGateway: Send + Sync {
    /// Allocates a pending storage slot. No application record is persisted.
    async fn issue_upload_slot(&self) -> PortResult<UploadSlot>;

    /// Redeems an upload token exactly once, yielding the durable attachment.
    async fn resolve_upload(&self, token: &str, file_name: &str) -> PortResult<FileAttachment>;

    /// Fetches the bytes behind a resolved attachment URL.
    async fn fetch_bytes(&self, url: &str) -> PortResult<Bytes>;
}

/// Extracts plain text from raw file bytes assuming PDF structure.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> PortResult<String>;
}

/// The analysis seam: given document text, produce notes and highlights.
/// The shipped implementation is a deterministic template; a real engine
/// attaches here without touching the pipeline.
#[async_trait]
pub trait DocumentAnalysisService: Send + Sync {
    async fn analyze(&self, text: &str) -> PortResult<Analysis>;
}
