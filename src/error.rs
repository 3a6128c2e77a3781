//! Error type shared by the rendering pipeline.

use thiserror::Error;

use crate::provider::ProviderError;

/// Fatal failures of one booklet generation attempt.
///
/// Every pipeline stage error aborts the whole run; the caller decides whether
/// to retry the complete `render_booklet` call.
#[derive(Debug, Error)]
pub enum BookletError {
    #[error("record provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("failed to lay out the booklet: {0}")]
    Render(#[from] genpdf::error::Error),
    #[error("failed to inspect the generated document: {0}")]
    PageCount(#[from] lopdf::Error),
    #[error("failed to load image {path}: {message}")]
    Image { path: String, message: String },
    #[error("failed to write the booklet file: {0}")]
    Io(#[from] std::io::Error),
}
