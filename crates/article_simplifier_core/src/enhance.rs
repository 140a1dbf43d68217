//! crates/article_simplifier_core/src/enhance.rs
//!
//! The simplification flow: read a document, run the analysis seam, persist
//! an enhanced document linked back to the original. Also covers the
//! review-and-save path where the caller supplies their own notes, and
//! selected-text explanations.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Document, EnhancedDocument, Highlight, TextExplanation};
use crate::ingest::{PipelineError, PipelineResult};
use crate::policy::{self, Action, Model, RequestContext, Role};
use crate::ports::{
    DocumentAnalysisService, DocumentStore, NewEnhancedDocument, NewTextExplanation,
};

/// Caller-supplied payload for the review-and-save path.
#[derive(Debug, Clone)]
pub struct SaveEnhancedDocumentRequest {
    pub original_document_id: Uuid,
    pub notes: String,
    pub highlights: Option<BTreeMap<String, Highlight>>,
}

pub struct SimplificationService {
    store: Arc<dyn DocumentStore>,
    analyzer: Arc<dyn DocumentAnalysisService>,
}

impl SimplificationService {
    pub fn new(store: Arc<dyn DocumentStore>, analyzer: Arc<dyn DocumentAnalysisService>) -> Self {
        Self { store, analyzer }
    }

    /// Loads the document (owner-scoped), runs the analysis seam, and
    /// persists the resulting enhanced document.
    pub async fn generate_enhanced_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> PipelineResult<EnhancedDocument> {
        let document = self
            .load_owned_document(ctx, document_id, Model::EnhancedDocument)
            .await?;

        let text = document.content.as_deref().unwrap_or_default();
        let analysis = self.analyzer.analyze(text).await?;

        let enhanced = self
            .store
            .insert_enhanced_document(NewEnhancedDocument {
                user_id: ctx.user_id,
                original_document_id: document.id,
                notes: analysis.notes,
                highlights: analysis.highlights,
            })
            .await?;

        info!(
            enhanced_id = %enhanced.id,
            document_id = %document.id,
            "enhanced document generated"
        );
        Ok(enhanced)
    }

    /// Persists an enhanced document whose notes the caller already reviewed
    /// or edited client-side.
    pub async fn save_enhanced_document(
        &self,
        ctx: &RequestContext,
        request: SaveEnhancedDocumentRequest,
    ) -> PipelineResult<EnhancedDocument> {
        if request.notes.trim().is_empty() {
            return Err(PipelineError::Validation("notes must not be empty".into()));
        }
        let document = self
            .load_owned_document(ctx, request.original_document_id, Model::EnhancedDocument)
            .await?;

        let enhanced = self
            .store
            .insert_enhanced_document(NewEnhancedDocument {
                user_id: ctx.user_id,
                original_document_id: document.id,
                notes: request.notes,
                highlights: request.highlights,
            })
            .await?;
        Ok(enhanced)
    }

    /// Records an explanation request for a passage the user selected.
    pub async fn explain_selected_text(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        selected_text: String,
    ) -> PipelineResult<TextExplanation> {
        if selected_text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "selectedText must not be empty".into(),
            ));
        }
        let document = self
            .load_owned_document(ctx, document_id, Model::TextExplanation)
            .await?;

        let analysis = self.analyzer.analyze(&selected_text).await?;
        let explanation = self
            .store
            .insert_text_explanation(NewTextExplanation {
                user_id: ctx.user_id,
                document_id: document.id,
                selected_text,
                explanation: Some(analysis.notes),
            })
            .await?;
        Ok(explanation)
    }

    /// Loads a document and enforces both the policy grant and the
    /// cross-owner guard against the referenced document's owner.
    async fn load_owned_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        model: Model,
    ) -> PipelineResult<Document> {
        if ctx.role == Role::Unauthenticated {
            return Err(PipelineError::AuthenticationRequired);
        }
        if !policy::allows(ctx.role, model, Action::Create) {
            return Err(PipelineError::CrossOwnerAccessDenied);
        }
        let document = self.store.get_document(ctx.user_id, document_id).await?;
        if !policy::is_same_owner(ctx, document.user_id) {
            return Err(PipelineError::CrossOwnerAccessDenied);
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Importance;
    use crate::ingest::FALLBACK_CONTENT;
    use crate::ports::{NewDocument, PortError};
    use crate::testing::{InMemoryStore, TemplateAnalyzerStub};
    use crate::domain::FileAttachment;

    async fn seed_document(store: &InMemoryStore, owner: Uuid, content: &str) -> Document {
        store
            .insert_document(NewDocument {
                user_id: owner,
                title: "Report".to_string(),
                description: None,
                pdf_file: FileAttachment {
                    url: "https://blobs.example/report.pdf".to_string(),
                    file_name: "report.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    byte_size: 4,
                },
                content: Some(content.to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn generates_notes_and_highlights_for_owned_document() {
        let store = Arc::new(InMemoryStore::new());
        let owner = Uuid::new_v4();
        let doc = seed_document(&store, owner, "Hello World").await;

        let service = SimplificationService::new(store.clone(), Arc::new(TemplateAnalyzerStub));
        let ctx = RequestContext::signed_in(owner);

        let enhanced = service.generate_enhanced_document(&ctx, doc.id).await.unwrap();

        assert_eq!(enhanced.original_document_id, doc.id);
        assert_eq!(enhanced.user_id, owner);
        assert!(enhanced.notes.contains("Hello World"));
        let highlights = enhanced.highlights.unwrap();
        assert_eq!(highlights["summary"].importance, Importance::High);
        assert_eq!(store.enhanced_count(), 1);
    }

    #[tokio::test]
    async fn cross_owner_reference_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let owner_b = Uuid::new_v4();
        let doc = seed_document(&store, owner_b, "private").await;

        let service = SimplificationService::new(store, Arc::new(TemplateAnalyzerStub));
        let caller_a = RequestContext::signed_in(Uuid::new_v4());

        let err = service
            .generate_enhanced_document(&caller_a, doc.id)
            .await
            .unwrap_err();

        // The owner-scoped store read hides the record from other callers.
        assert!(matches!(err, PipelineError::Port(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn save_with_empty_notes_fails_validation() {
        let store = Arc::new(InMemoryStore::new());
        let owner = Uuid::new_v4();
        let doc = seed_document(&store, owner, "text").await;

        let service = SimplificationService::new(store, Arc::new(TemplateAnalyzerStub));
        let ctx = RequestContext::signed_in(owner);

        let err = service
            .save_enhanced_document(
                &ctx,
                SaveEnhancedDocumentRequest {
                    original_document_id: doc.id,
                    notes: "  ".to_string(),
                    highlights: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn analysis_runs_on_fallback_content_without_error() {
        let store = Arc::new(InMemoryStore::new());
        let owner = Uuid::new_v4();
        let doc = seed_document(&store, owner, FALLBACK_CONTENT).await;

        let service = SimplificationService::new(store, Arc::new(TemplateAnalyzerStub));
        let ctx = RequestContext::signed_in(owner);

        let enhanced = service.generate_enhanced_document(&ctx, doc.id).await.unwrap();
        assert!(!enhanced.notes.is_empty());
    }

    #[tokio::test]
    async fn explain_selected_text_links_document_and_passage() {
        let store = Arc::new(InMemoryStore::new());
        let owner = Uuid::new_v4();
        let doc = seed_document(&store, owner, "body").await;

        let service = SimplificationService::new(store, Arc::new(TemplateAnalyzerStub));
        let ctx = RequestContext::signed_in(owner);

        let explanation = service
            .explain_selected_text(&ctx, doc.id, "a dense sentence".to_string())
            .await
            .unwrap();

        assert_eq!(explanation.document_id, doc.id);
        assert_eq!(explanation.selected_text, "a dense sentence");
        assert!(explanation.explanation.is_some());
    }
}
