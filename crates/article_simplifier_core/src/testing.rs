//! crates/article_simplifier_core/src/testing.rs
//!
//! In-memory port implementations shared by the unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    Analysis, Document, EnhancedDocument, FileAttachment, Highlight, Importance, TextExplanation,
    UploadSlot, User, UserCredentials,
};
use crate::ports::{
    BlobGateway, DocumentAnalysisService, DocumentPatch, DocumentStore, NewDocument,
    NewEnhancedDocument, NewTextExplanation, PortError, PortResult, TextExtractor,
};

//=========================================================================================
// In-Memory Document Store
//=========================================================================================

#[derive(Default)]
struct StoreInner {
    users: Vec<UserCredentials>,
    auth_sessions: Vec<(String, Uuid, DateTime<Utc>)>,
    documents: Vec<Document>,
    enhanced: Vec<EnhancedDocument>,
    explanations: Vec<TextExplanation>,
}

/// An in-memory `DocumentStore` with the same owner-scoping behavior as the
/// SQL adapter.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self) -> usize {
        self.inner.lock().unwrap().documents.len()
    }

    pub fn enhanced_count(&self) -> usize {
        self.inner.lock().unwrap().enhanced.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(PortError::Unexpected(format!(
                "email {email} already registered"
            )));
        }
        let creds = UserCredentials {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        inner.users.push(creds.clone());
        Ok(User {
            user_id: creds.user_id,
            email: creds.email,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("user {email} not found")))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.inner
            .lock()
            .unwrap()
            .auth_sessions
            .push((session_id.to_string(), user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        self.inner
            .lock()
            .unwrap()
            .auth_sessions
            .iter()
            .find(|(id, _, expires)| id == session_id && *expires > Utc::now())
            .map(|(_, user_id, _)| *user_id)
            .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.inner
            .lock()
            .unwrap()
            .auth_sessions
            .retain(|(id, _, _)| id != session_id);
        Ok(())
    }

    async fn insert_document(&self, new: NewDocument) -> PortResult<Document> {
        let document = Document {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            pdf_file: new.pdf_file,
            content: new.content,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().documents.push(document.clone());
        Ok(document)
    }

    async fn get_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<Document> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .iter()
            .find(|d| d.id == document_id && d.user_id == owner)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Document {document_id} not found")))
    }

    async fn list_documents(&self, owner: Uuid) -> PortResult<Vec<Document>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .documents
            .iter()
            .filter(|d| d.user_id == owner)
            .cloned()
            .collect())
    }

    async fn update_document(
        &self,
        owner: Uuid,
        document_id: Uuid,
        patch: DocumentPatch,
    ) -> PortResult<Document> {
        let mut inner = self.inner.lock().unwrap();
        let document = inner
            .documents
            .iter_mut()
            .find(|d| d.id == document_id && d.user_id == owner)
            .ok_or_else(|| PortError::NotFound(format!("Document {document_id} not found")))?;
        if let Some(title) = patch.title {
            document.title = title;
        }
        if let Some(description) = patch.description {
            document.description = Some(description);
        }
        Ok(document.clone())
    }

    async fn delete_document(&self, owner: Uuid, document_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.documents.len();
        inner
            .documents
            .retain(|d| !(d.id == document_id && d.user_id == owner));
        if inner.documents.len() == before {
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
        let enhanced = EnhancedDocument {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            original_document_id: new.original_document_id,
            notes: new.notes,
            highlights: new.highlights,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().enhanced.push(enhanced.clone());
        Ok(enhanced)
    }

    async fn list_enhanced_documents(&self, owner: Uuid) -> PortResult<Vec<EnhancedDocument>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .enhanced
            .iter()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect())
    }

    async fn delete_enhanced_document(&self, owner: Uuid, enhanced_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.enhanced.len();
        inner
            .enhanced
            .retain(|e| !(e.id == enhanced_id && e.user_id == owner));
        if inner.enhanced.len() == before {
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
        let explanation = TextExplanation {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            document_id: new.document_id,
            selected_text: new.selected_text,
            explanation: new.explanation,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .explanations
            .push(explanation.clone());
        Ok(explanation)
    }

    async fn list_text_explanations(
        &self,
        owner: Uuid,
        document_id: Uuid,
    ) -> PortResult<Vec<TextExplanation>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .explanations
            .iter()
            .filter(|x| x.user_id == owner && x.document_id == document_id)
            .cloned()
            .collect())
    }
}

//=========================================================================================
// Blob Gateway Stubs
//=========================================================================================

/// A gateway whose slot issuance, resolution, and fetch all succeed.
#[derive(Default)]
pub struct StubGateway;

#[async_trait]
impl BlobGateway for StubGateway {
    async fn issue_upload_slot(&self) -> PortResult<UploadSlot> {
        Ok(UploadSlot {
            upload_url: "https://blobs.example/upload/slot-1".to_string(),
            upload_token: "tok123".to_string(),
        })
    }

    async fn resolve_upload(&self, _token: &str, file_name: &str) -> PortResult<FileAttachment> {
        Ok(FileAttachment {
            url: format!("https://blobs.example/files/{file_name}"),
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            byte_size: 11,
        })
    }

    async fn fetch_bytes(&self, _url: &str) -> PortResult<Bytes> {
        Ok(Bytes::from_static(b"%PDF-stub"))
    }
}

/// A gateway that fails at a chosen step.
pub struct FailingGateway {
    resolve_fails: bool,
    fetch_fails: bool,
}

impl FailingGateway {
    pub fn resolve_fails() -> Self {
        Self {
            resolve_fails: true,
            fetch_fails: false,
        }
    }

    pub fn fetch_fails() -> Self {
        Self {
            resolve_fails: false,
            fetch_fails: true,
        }
    }
}

#[async_trait]
impl BlobGateway for FailingGateway {
    async fn issue_upload_slot(&self) -> PortResult<UploadSlot> {
        Ok(UploadSlot {
            upload_url: "https://blobs.example/upload/slot-1".to_string(),
            upload_token: "tok123".to_string(),
        })
    }

    async fn resolve_upload(&self, token: &str, file_name: &str) -> PortResult<FileAttachment> {
        if self.resolve_fails {
            return Err(PortError::NotFound(format!("upload token {token} unknown")));
        }
        Ok(FileAttachment {
            url: format!("https://blobs.example/files/{file_name}"),
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            byte_size: 11,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> PortResult<Bytes> {
        if self.fetch_fails {
            return Err(PortError::Unexpected(format!("connection refused: {url}")));
        }
        Ok(Bytes::from_static(b"%PDF-stub"))
    }
}

//=========================================================================================
// Extractor and Analyzer Stubs
//=========================================================================================

/// A text extractor returning a fixed outcome.
pub struct StubExtractor {
    outcome: Result<String, String>,
}

impl StubExtractor {
    pub fn ok(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }
}

impl TextExtractor for StubExtractor {
    fn extract_text(&self, _bytes: &[u8]) -> PortResult<String> {
        self.outcome
            .clone()
            .map_err(PortError::Unexpected)
    }
}

/// A deterministic analyzer mirroring the shape of the template adapter.
pub struct TemplateAnalyzerStub;

#[async_trait]
impl DocumentAnalysisService for TemplateAnalyzerStub {
    async fn analyze(&self, text: &str) -> PortResult<Analysis> {
        let mut highlights = BTreeMap::new();
        highlights.insert(
            "summary".to_string(),
            Highlight {
                text: text.chars().take(80).collect(),
                importance: Importance::High,
            },
        );
        Ok(Analysis {
            notes: format!("Key points: {text}"),
            highlights: Some(highlights),
        })
    }
}
