pub mod analysis;
pub mod blob;
pub mod db;
pub mod pdf;

pub use analysis::TemplateAnalysisAdapter;
pub use blob::HttpBlobGateway;
pub use db::PgStore;
pub use pdf::PdfTextExtractor;
