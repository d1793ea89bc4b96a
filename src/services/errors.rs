use thiserror::Error;

use crate::dto::directory::Notice;
use crate::filter::FilterError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub const GENERIC_ERROR_TEXT: &str = "An error occurred, please contact your system administrator";

/// Request-level failures. Every variant is rendered as a notice on the
/// phone; none of them is fatal to the server.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("At least one search criteria must be entered")]
    InvalidSearch,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("search results are no longer available")]
    StaleCursor,

    #[error("{0}")]
    UpstreamAuth(String),

    #[error("{0}")]
    UpstreamSearch(String),

    #[error("{0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// User-facing title and text. Upstream details are shown only when
    /// `show_detail` is set.
    pub fn notice(&self, show_detail: bool) -> Notice {
        match self {
            ServiceError::InvalidSearch => Notice::new("Search invalid", self.to_string()),
            ServiceError::InvalidRequest(reason) => Notice::new("Search invalid", reason.clone()),
            ServiceError::StaleCursor => {
                Notice::new("Search expired", "Please start a new search")
            }
            ServiceError::UpstreamAuth(_)
            | ServiceError::UpstreamSearch(_)
            | ServiceError::Upstream(_)
            | ServiceError::Internal(_) => {
                let text = if show_detail {
                    self.to_string()
                } else {
                    GENERIC_ERROR_TEXT.to_string()
                };
                Notice::new("Error", text)
            }
        }
    }
}

impl From<FilterError> for ServiceError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::EmptySearch => ServiceError::InvalidSearch,
            FilterError::InvalidClause(reason) => ServiceError::Internal(reason),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AuthenticationError(_) => ServiceError::UpstreamAuth(err.to_string()),
            RepositoryError::SearchError(_) => ServiceError::UpstreamSearch(err.to_string()),
            RepositoryError::ConnectionError(_) | RepositoryError::Timeout(_) => {
                ServiceError::Upstream(err.to_string())
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::InvalidRequest(err.to_string())
    }
}
