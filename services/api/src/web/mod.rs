pub mod auth;
pub mod enhanced;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::http::StatusCode;
use tracing::error;

use article_simplifier_core::ingest::PipelineError;
use article_simplifier_core::ports::PortError;

pub use middleware::require_auth;
pub use rest::ApiDoc;

/// Maps a pipeline error onto the HTTP status it surfaces as.
pub(crate) fn pipeline_error_response(e: PipelineError) -> (StatusCode, String) {
    match e {
        PipelineError::AuthenticationRequired => {
            (StatusCode::UNAUTHORIZED, "authentication required".to_string())
        }
        PipelineError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        PipelineError::CrossOwnerAccessDenied => {
            (StatusCode::FORBIDDEN, "cross-owner access denied".to_string())
        }
        PipelineError::Port(port) => port_error_response(port),
    }
}

/// Maps a port error onto the HTTP status it surfaces as.
pub(crate) fn port_error_response(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Unauthorized => {
            (StatusCode::UNAUTHORIZED, "authentication required".to_string())
        }
        PortError::Unexpected(message) => {
            error!("internal service error: {message}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_expected_statuses() {
        assert_eq!(
            pipeline_error_response(PipelineError::AuthenticationRequired).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            pipeline_error_response(PipelineError::Validation("title".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            pipeline_error_response(PipelineError::CrossOwnerAccessDenied).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            pipeline_error_response(PipelineError::Port(PortError::NotFound("x".into()))).0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unexpected_port_errors_hide_details_from_the_caller() {
        let (status, message) = port_error_response(PortError::Unexpected("pg down".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("pg down"));
    }
}
