//! Query-string forms submitted by the phones.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod list;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Search terms are too long")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid page offset")]
    InvalidCursor(#[from] TypeConstraintError),
}
