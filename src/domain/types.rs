//! Strongly-typed value objects used by the directory domain.
//!
//! These wrappers enforce basic invariants (trimmed non-empty search terms,
//! positive cursors, well-formed session keys) so that once a value reaches
//! the query builder or the paginator it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided cursor was zero or not a number.
    #[error("page offset must be a positive integer")]
    InvalidCursor,
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
}

/// Trimmed, non-empty fragment typed by the user on the phone keypad.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trims the value and rejects it when nothing is left.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Turns an optional raw parameter into a term, treating blank input as absent.
    pub fn from_optional(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::new(v).ok())
    }

    /// Borrow the term as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SearchTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for SearchTerm {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Search terms for a fresh directory query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub first_name: Option<SearchTerm>,
    pub last_name: Option<SearchTerm>,
    pub number: Option<SearchTerm>,
}

impl SearchCriteria {
    #[must_use]
    pub fn new(
        first_name: Option<SearchTerm>,
        last_name: Option<SearchTerm>,
        number: Option<SearchTerm>,
    ) -> Self {
        Self {
            first_name,
            last_name,
            number,
        }
    }

    /// Returns `true` when none of the three terms was supplied.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.number.is_none()
    }
}

/// 1-based offset into a cached result set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cursor(NonZeroUsize);

impl Cursor {
    /// The first entry of a result set.
    pub const FIRST: Cursor = Cursor(NonZeroUsize::MIN);

    /// Creates a cursor ensuring it is greater than zero.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(TypeConstraintError::InvalidCursor)
    }

    /// Returns the raw 1-based offset.
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cursor {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<usize>()
            .map_err(|_| TypeConstraintError::InvalidCursor)?;
        Self::new(value)
    }
}

/// Identity of the phone session a cached result set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(Uuid);

impl SessionKey {
    /// Generate a new random session key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|_| TypeConstraintError::InvalidUuid)?,
        ))
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::new()
    }
}
