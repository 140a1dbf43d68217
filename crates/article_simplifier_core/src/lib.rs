pub mod domain;
pub mod enhance;
pub mod ingest;
pub mod policy;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{
    Analysis, AuthSession, Document, EnhancedDocument, FileAttachment, Highlight, Importance,
    TextExplanation, UploadSlot, User, UserCredentials,
};
pub use enhance::{SaveEnhancedDocumentRequest, SimplificationService};
pub use ingest::{CreateDocumentRequest, IngestPipeline, PipelineError, PipelineResult, FALLBACK_CONTENT};
pub use policy::{RequestContext, Role};
pub use ports::{
    BlobGateway, DocumentAnalysisService, DocumentStore, PortError, PortResult, TextExtractor,
};
