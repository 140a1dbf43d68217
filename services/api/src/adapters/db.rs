//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every read query filters on `user_id`, so owner scoping is enforced in SQL
//! rather than in handler code.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use article_simplifier_core::domain::{
    Document, EnhancedDocument, FileAttachment, Highlight, TextExplanation, User, UserCredentials,
};
use article_simplifier_core::ports::{
    DocumentPatch, DocumentStore, NewDocument, NewEnhancedDocument, NewTextExplanation, PortError,
    PortResult,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(message: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(message),
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct UserCredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl UserCredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct DocumentRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    pdf_url: String,
    pdf_file_name: String,
    pdf_content_type: String,
    pdf_byte_size: i64,
    content: Option<String>,
    created_at: DateTime<Utc>,
}
impl DocumentRecord {
    fn to_domain(self) -> Document {
        Document {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            pdf_file: FileAttachment {
                url: self.pdf_url,
                file_name: self.pdf_file_name,
                content_type: self.pdf_content_type,
                byte_size: self.pdf_byte_size,
            },
            content: self.content,
            created_at: self.created_at,
        }
    }
}

const DOCUMENT_COLUMNS: &str = "id, user_id, title, description, pdf_url, pdf_file_name, \
                                pdf_content_type, pdf_byte_size, content, created_at";

#[derive(FromRow)]
struct EnhancedDocumentRecord {
    id: Uuid,
    user_id: Uuid,
    original_document_id: Uuid,
    notes: String,
    highlights: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}
impl EnhancedDocumentRecord {
    fn to_domain(self) -> PortResult<EnhancedDocument> {
        let highlights = self
            .highlights
            .map(serde_json::from_value::<BTreeMap<String, Highlight>>)
            .transpose()
            .map_err(|e| PortError::Unexpected(format!("malformed highlights column: {e}")))?;
        Ok(EnhancedDocument {
            id: self.id,
            user_id: self.user_id,
            original_document_id: self.original_document_id,
            notes: self.notes,
            highlights,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct TextExplanationRecord {
    id: Uuid,
    user_id: Uuid,
    document_id: Uuid,
    selected_text: String,
    explanation: Option<String>,
    created_at: DateTime<Utc>,
}
impl TextExplanationRecord {
    fn to_domain(self) -> TextExplanation {
        TextExplanation {
            id: self.id,
            user_id: self.user_id,
            document_id: self.document_id,
            selected_text: self.selected_text,
            explanation: self.explanation,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserCredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User {email} not found")))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row: (Uuid,) = sqlx::query_as(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => unexpected(e),
        })?;
        Ok(row.0)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_document(&self, new: NewDocument) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "INSERT INTO documents \
             (id, user_id, title, description, pdf_url, pdf_file_name, pdf_content_type, \
              pdf_byte_size, content) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.pdf_file.url)
        .bind(&new.pdf_file.file_name)
        .bind(&new.pdf_file.content_type)
        .bind(new.pdf_file.byte_size)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2"
        ))
        .bind(document_id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Document {document_id} not found")))?;
        Ok(record.to_domain())
    }

    async fn list_documents(&self, owner: Uuid) -> PortResult<Vec<Document>> {
        let records = sqlx::query_as::<_, DocumentRecord>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_document(
        &self,
        owner: Uuid,
        document_id: Uuid,
        patch: DocumentPatch,
    ) -> PortResult<Document> {
        // Only title and description are editable; content is never re-extracted.
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "UPDATE documents \
             SET title = COALESCE($3, title), description = COALESCE($4, description) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(document_id)
        .bind(owner)
        .bind(&patch.title)
        .bind(&patch.description)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Document {document_id} not found")))?;
        Ok(record.to_domain())
    }

    async fn delete_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(document_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Document {document_id} not found"
            )));
        }
        Ok(())
    }

    async fn insert_enhanced_document(
        &self,
        new: NewEnhancedDocument,
    ) -> PortResult<EnhancedDocument> {
        let highlights = new
            .highlights
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record = sqlx::query_as::<_, EnhancedDocumentRecord>(
            "INSERT INTO enhanced_documents \
             (id, user_id, original_document_id, notes, highlights) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, original_document_id, notes, highlights, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.original_document_id)
        .bind(&new.notes)
        .bind(highlights)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_enhanced_documents(&self, owner: Uuid) -> PortResult<Vec<EnhancedDocument>> {
        let records = sqlx::query_as::<_, EnhancedDocumentRecord>(
            "SELECT id, user_id, original_document_id, notes, highlights, created_at \
             FROM enhanced_documents WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn delete_enhanced_document(&self, owner: Uuid, enhanced_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM enhanced_documents WHERE id = $1 AND user_id = $2")
            .bind(enhanced_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "EnhancedDocument {enhanced_id} not found"
            )));
        }
        Ok(())
    }

    async fn insert_text_explanation(
        &self,
        new: NewTextExplanation,
    ) -> PortResult<TextExplanation> {
        let record = sqlx::query_as::<_, TextExplanationRecord>(
            "INSERT INTO text_explanations \
             (id, user_id, document_id, selected_text, explanation) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, document_id, selected_text, explanation, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.document_id)
        .bind(&new.selected_text)
        .bind(&new.explanation)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_text_explanations(
        &self,
        owner: Uuid,
        document_id: Uuid,
    ) -> PortResult<Vec<TextExplanation>> {
        let records = sqlx::query_as::<_, TextExplanationRecord>(
            "SELECT id, user_id, document_id, selected_text, explanation, created_at \
             FROM text_explanations WHERE user_id = $1 AND document_id = $2 \
             ORDER BY created_at ASC",
        )
        .bind(owner)
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
