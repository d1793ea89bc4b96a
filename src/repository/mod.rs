//! Seams to the two stateful collaborators: the directory server and the
//! per-session result cache.

use std::sync::Arc;

use crate::{
    domain::{entry::DirectoryEntry, types::SessionKey},
    filter::SearchRequest,
    repository::errors::RepositoryResult,
};

pub mod cache;
pub mod errors;
pub mod ldap;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use cache::InMemoryResultCache;
pub use ldap::LdapDirectory;

/// Opens connections to the directory server.
#[allow(async_fn_in_trait)]
pub trait DirectoryClient {
    type Connection: DirectoryConnection;

    async fn connect(&self) -> RepositoryResult<Self::Connection>;
}

/// A single-use connection: optionally authenticated, used for one search,
/// then closed.
#[allow(async_fn_in_trait)]
pub trait DirectoryConnection {
    async fn authenticate(&mut self, principal: &str, secret: &str) -> RepositoryResult<()>;

    /// Runs the search to completion. Entries are only returned once the
    /// server has signalled success.
    async fn search(&mut self, request: &SearchRequest) -> RepositoryResult<Vec<DirectoryEntry>>;

    async fn close(self);
}

/// Holds at most one ordered result set per session.
pub trait ResultCache {
    fn get(&self, session: &SessionKey) -> Option<Arc<[DirectoryEntry]>>;
    fn put(&self, session: SessionKey, entries: Arc<[DirectoryEntry]>);
}
