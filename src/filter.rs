//! LDAP filter construction for phone directory searches.
//!
//! Every filter is the conjunction of the configured base clause, optional
//! prefix matches on the first and last name, and a number clause that either
//! requires the typed fragment or merely requires a number to be present.

use std::fmt::{Display, Formatter};

use ldap3::ldap_escape;
use thiserror::Error;

use crate::domain::types::SearchCriteria;
use crate::models::config::DirectoryConfig;

pub const FIRST_NAME_ATTR: &str = "givenName";
pub const LAST_NAME_ATTR: &str = "sn";
pub const NUMBER_ATTR: &str = "telephoneNumber";

/// Attributes requested for every entry.
pub const ENTRY_ATTRIBUTES: [&str; 3] = [FIRST_NAME_ATTR, LAST_NAME_ATTR, NUMBER_ATTR];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("at least one search criteria must be entered")]
    EmptySearch,

    #[error("{0}")]
    InvalidClause(String),
}

/// A complete RFC 4515 filter expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryFilter(String);

impl DirectoryFilter {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DirectoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    Base,
    OneLevel,
    Subtree,
}

/// Everything the directory client needs to run one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub base: String,
    pub filter: DirectoryFilter,
    pub attributes: [&'static str; 3],
    pub scope: SearchScope,
}

impl SearchRequest {
    pub fn new(config: &DirectoryConfig, filter: DirectoryFilter) -> Self {
        Self {
            base: config.search_base.clone(),
            filter,
            attributes: ENTRY_ATTRIBUTES,
            scope: SearchScope::Subtree,
        }
    }
}

/// Builds the search filter for `criteria`.
///
/// Fails with [`FilterError::EmptySearch`] when the configuration forbids
/// searches without any criteria.
pub fn build_filter(
    criteria: &SearchCriteria,
    config: &DirectoryConfig,
) -> Result<DirectoryFilter, FilterError> {
    if criteria.is_empty() && !config.allow_empty_search {
        return Err(FilterError::EmptySearch);
    }

    let mut filter = String::from("(&");
    filter.push_str(config.base_filter.trim());

    if let Some(first_name) = &criteria.first_name {
        filter.push_str(&format!(
            "({FIRST_NAME_ATTR}={}*)",
            ldap_escape(first_name.as_str())
        ));
    }
    if let Some(last_name) = &criteria.last_name {
        filter.push_str(&format!(
            "({LAST_NAME_ATTR}={}*)",
            ldap_escape(last_name.as_str())
        ));
    }
    match &criteria.number {
        Some(number) => filter.push_str(&format!(
            "({NUMBER_ATTR}=*{}*)",
            ldap_escape(number.as_str())
        )),
        None => filter.push_str(&format!("({NUMBER_ATTR}=*)")),
    }

    filter.push(')');
    Ok(DirectoryFilter(filter))
}

/// Checks that `clause` is one or more parenthesised filter components.
pub fn validate_filter_clause(clause: &str) -> Result<(), FilterError> {
    let clause = clause.trim();
    if clause.is_empty() {
        return Err(FilterError::InvalidClause("clause cannot be empty".into()));
    }
    if !clause.starts_with('(') || !clause.ends_with(')') {
        return Err(FilterError::InvalidClause(
            "clause must be enclosed in parentheses".into(),
        ));
    }

    let mut depth = 0usize;
    for c in clause.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    FilterError::InvalidClause("unexpected closing parenthesis".into())
                })?;
            }
            _ if depth == 0 => {
                return Err(FilterError::InvalidClause(
                    "text outside of parentheses".into(),
                ));
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(FilterError::InvalidClause("unbalanced parentheses".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SearchTerm;
    use crate::models::config::tests::directory_config;

    fn criteria(f: Option<&str>, l: Option<&str>, n: Option<&str>) -> SearchCriteria {
        SearchCriteria::new(
            SearchTerm::from_optional(f),
            SearchTerm::from_optional(l),
            SearchTerm::from_optional(n),
        )
    }

    #[test]
    fn empty_criteria_require_a_number() {
        let filter = build_filter(&criteria(None, None, None), &directory_config()).unwrap();
        assert_eq!(
            filter.as_str(),
            "(&(objectClass=person)(telephoneNumber=*))"
        );
    }

    #[test]
    fn all_clauses_present() {
        let filter = build_filter(
            &criteria(Some("Ann"), Some("Lee"), Some("55")),
            &directory_config(),
        )
        .unwrap();
        assert_eq!(
            filter.as_str(),
            "(&(objectClass=person)(givenName=Ann*)(sn=Lee*)(telephoneNumber=*55*))"
        );
    }

    #[test]
    fn clause_presence_follows_field_presence() {
        let config = directory_config();
        let values = [None, Some("x")];
        for f in values {
            for l in values {
                for n in values {
                    let filter = build_filter(&criteria(f, l, n), &config).unwrap();
                    let text = filter.as_str();
                    assert_eq!(text.contains("(givenName="), f.is_some());
                    assert_eq!(text.contains("(sn="), l.is_some());
                    assert_eq!(text.contains("(telephoneNumber=*x*)"), n.is_some());
                    assert_eq!(text.contains("(telephoneNumber=*)"), n.is_none());
                    assert!(validate_filter_clause(text).is_ok(), "{text}");
                }
            }
        }
    }

    #[test]
    fn empty_search_rejected_when_disallowed() {
        let mut config = directory_config();
        config.allow_empty_search = false;
        assert_eq!(
            build_filter(&criteria(None, Some(" "), None), &config),
            Err(FilterError::EmptySearch)
        );
        assert!(build_filter(&criteria(None, Some("Ng"), None), &config).is_ok());
    }

    #[test]
    fn special_characters_are_escaped() {
        let filter = build_filter(
            &criteria(Some("a*)(uid=*"), Some("O\\Brien"), None),
            &directory_config(),
        )
        .unwrap();
        assert_eq!(
            filter.as_str(),
            "(&(objectClass=person)(givenName=a\\2a\\29\\28uid=\\2a*)(sn=O\\5cBrien*)(telephoneNumber=*))"
        );
        assert!(validate_filter_clause(filter.as_str()).is_ok());
    }

    #[test]
    fn search_request_uses_subtree_and_three_attributes() {
        let config = directory_config();
        let filter = build_filter(&criteria(None, Some("Lee"), None), &config).unwrap();
        let request = SearchRequest::new(&config, filter.clone());
        assert_eq!(request.base, "dc=example,dc=com");
        assert_eq!(request.scope, SearchScope::Subtree);
        assert_eq!(request.attributes, ["givenName", "sn", "telephoneNumber"]);
        assert_eq!(request.filter, filter);
    }

    #[test]
    fn validates_base_clauses() {
        assert!(validate_filter_clause("(objectClass=person)").is_ok());
        assert!(validate_filter_clause("(objectClass=person)(!(disabled=TRUE))").is_ok());
        assert!(validate_filter_clause("").is_err());
        assert!(validate_filter_clause("objectClass=person").is_err());
        assert!(validate_filter_clause("(a=b))(").is_err());
        assert!(validate_filter_clause("((a=b)").is_err());
        assert!(validate_filter_clause("(a=b)x(c=d)").is_err());
    }
}
