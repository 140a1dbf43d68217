//! services/api/src/adapters/analysis.rs
//!
//! Template implementation of the `DocumentAnalysisService` port.
//!
//! This is the documented seam where a real analysis engine would attach.
//! The shipped implementation is a deterministic template: the notes and
//! highlights do not depend on the input text beyond the opening excerpt
//! used for the first highlight.

use async_trait::async_trait;
use std::collections::BTreeMap;

use article_simplifier_core::domain::{Analysis, Highlight, Importance};
use article_simplifier_core::ports::{DocumentAnalysisService, PortResult};

const TEMPLATE_NOTES: &str = "# Key Points

* The document discusses important concepts related to the main topic
* Several key arguments are presented throughout the text
* The conclusion summarizes the main findings

## Summary
This is an AI-generated summary of the document, highlighting the most \
important points and concepts discussed.";

/// Maximum length of the opening excerpt used for the first highlight.
const EXCERPT_CHARS: usize = 160;

/// An adapter producing fixed template notes and highlights.
#[derive(Clone, Default)]
pub struct TemplateAnalysisAdapter;

impl TemplateAnalysisAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentAnalysisService for TemplateAnalysisAdapter {
    async fn analyze(&self, text: &str) -> PortResult<Analysis> {
        let opening: String = text.chars().take(EXCERPT_CHARS).collect();

        let mut highlights = BTreeMap::new();
        highlights.insert(
            "opening".to_string(),
            Highlight {
                text: opening,
                importance: Importance::Medium,
            },
        );
        highlights.insert(
            "key-arguments".to_string(),
            Highlight {
                text: "Several key arguments are presented throughout the text".to_string(),
                importance: Importance::High,
            },
        );
        highlights.insert(
            "conclusion".to_string(),
            Highlight {
                text: "The conclusion summarizes the main findings".to_string(),
                importance: Importance::Low,
            },
        );

        Ok(Analysis {
            notes: TEMPLATE_NOTES.to_string(),
            highlights: Some(highlights),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn template_output_is_deterministic() {
        let adapter = TemplateAnalysisAdapter::new();
        let first = adapter.analyze("Hello World").await.unwrap();
        let second = adapter.analyze("Hello World").await.unwrap();
        assert_eq!(first.notes, second.notes);
        assert_eq!(first.highlights, second.highlights);
    }

    #[tokio::test]
    async fn opening_highlight_excerpts_the_input() {
        let adapter = TemplateAnalysisAdapter::new();
        let analysis = adapter.analyze("Hello World, this is the opening.").await.unwrap();
        let highlights = analysis.highlights.unwrap();
        assert!(highlights["opening"].text.starts_with("Hello World"));
        assert_eq!(highlights["key-arguments"].importance, Importance::High);
    }

    #[tokio::test]
    async fn long_input_is_truncated_to_the_excerpt_budget() {
        let adapter = TemplateAnalysisAdapter::new();
        let long_text = "x".repeat(10_000);
        let analysis = adapter.analyze(&long_text).await.unwrap();
        let highlights = analysis.highlights.unwrap();
        assert_eq!(highlights["opening"].text.chars().count(), EXCERPT_CHARS);
    }
}
