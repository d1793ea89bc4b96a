use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{Cursor, SearchCriteria, SearchTerm};
use crate::dto::directory::ListRequest;
use crate::forms::FormError;

/// Query parameters of `GET /list`, named as the phone input form sends them.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListForm {
    /// First-name prefix.
    #[validate(length(max = 64))]
    pub f: Option<String>,
    /// Last-name prefix.
    #[validate(length(max = 64))]
    pub l: Option<String>,
    /// Number fragment.
    #[validate(length(max = 32))]
    pub n: Option<String>,
    /// 1-based offset of a follow-up page.
    pub start: Option<String>,
}

impl ListForm {
    /// A non-blank `start` selects paging; search terms are then ignored.
    pub fn into_request(self) -> Result<ListRequest, FormError> {
        if let Some(start) = self.start.as_deref().filter(|s| !s.trim().is_empty()) {
            let cursor = start.parse::<Cursor>()?;
            return Ok(ListRequest::Page(cursor));
        }

        self.validate()?;

        Ok(ListRequest::Search(SearchCriteria::new(
            SearchTerm::from_optional(self.f.as_deref()),
            SearchTerm::from_optional(self.l.as_deref()),
            SearchTerm::from_optional(self.n.as_deref()),
        )))
    }
}
