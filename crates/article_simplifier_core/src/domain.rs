//! crates/article_simplifier_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A durable file reference produced by the blob gateway once a direct
/// upload token has been redeemed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub byte_size: i64,
}

/// A single-use upload slot issued by the blob gateway. The client PUTs the
/// raw file bytes to `upload_url`, then redeems `upload_token` when creating
/// the document record.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub upload_url: String,
    pub upload_token: String,
}

/// Represents a PDF document uploaded by a user, storing its metadata,
/// file attachment, and the text extracted at creation time.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub pdf_file: FileAttachment,
    /// Extracted markdown text. Holds the fallback sentinel when extraction
    /// failed or produced nothing at creation time.
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// How strongly a highlighted passage matters to the document's argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// A single highlighted passage inside an enhanced document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    pub importance: Importance,
}

/// An AI-processed version of a document: generated notes plus an optional
/// section-keyed set of highlights, linked back to the original.
#[derive(Debug, Clone)]
pub struct EnhancedDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_document_id: Uuid,
    pub notes: String,
    pub highlights: Option<std::collections::BTreeMap<String, Highlight>>,
    pub created_at: DateTime<Utc>,
}

/// An explanation generated for a passage the user selected in a document.
#[derive(Debug, Clone)]
pub struct TextExplanation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub selected_text: String,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The output of the analysis seam: notes plus optional highlights.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub notes: String,
    pub highlights: Option<std::collections::BTreeMap<String, Highlight>>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
