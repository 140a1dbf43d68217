//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use article_simplifier_core::enhance::SimplificationService;
use article_simplifier_core::ingest::IngestPipeline;
use article_simplifier_core::ports::DocumentStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub pipeline: Arc<IngestPipeline>,
    pub simplifier: Arc<SimplificationService>,
    pub config: Arc<Config>,
}
