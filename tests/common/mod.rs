use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use phone_directory::domain::entry::DirectoryEntry;
use phone_directory::filter::SearchRequest;
use phone_directory::models::config::{DirectoryConfig, ServerConfig};
use phone_directory::repository::errors::{RepositoryError, RepositoryResult};
use phone_directory::repository::{DirectoryClient, DirectoryConnection};

/// In-memory directory that counts how often it was searched.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    pub entries: Vec<DirectoryEntry>,
    pub fail_search: bool,
    pub searches: Arc<AtomicUsize>,
}

pub struct FakeConnection {
    directory: FakeDirectory,
}

impl FakeDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl DirectoryClient for FakeDirectory {
    type Connection = FakeConnection;

    async fn connect(&self) -> RepositoryResult<FakeConnection> {
        Ok(FakeConnection {
            directory: self.clone(),
        })
    }
}

impl DirectoryConnection for FakeConnection {
    async fn authenticate(&mut self, _principal: &str, _secret: &str) -> RepositoryResult<()> {
        Ok(())
    }

    async fn search(&mut self, _request: &SearchRequest) -> RepositoryResult<Vec<DirectoryEntry>> {
        self.directory.searches.fetch_add(1, Ordering::SeqCst);
        if self.directory.fail_search {
            return Err(RepositoryError::SearchError(
                "operationsError: cn=svc".to_string(),
            ));
        }
        Ok(self.directory.entries.clone())
    }

    async fn close(self) {}
}

pub fn entry(last: &str, first: &str, number: &str) -> DirectoryEntry {
    DirectoryEntry::new(
        Some(last.to_string()),
        Some(first.to_string()),
        Some(number.to_string()),
    )
}

pub fn server_config(results_per_page: usize) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 3000,
        public_url: "http://10.0.0.5:3000".to_string(),
        templates_dir: "templates/**/*".to_string(),
        static_dir: "./public".to_string(),
        secret: None,
        session_ttl_secs: 60,
        show_error_detail: false,
        directory: DirectoryConfig {
            address: "ldap.example.com".to_string(),
            port: 389,
            search_base: "dc=example,dc=com".to_string(),
            base_filter: "(objectClass=person)".to_string(),
            bind_dn: None,
            bind_password: None,
            allow_empty_search: true,
            results_per_page: NonZeroUsize::new(results_per_page).expect("positive page size"),
            timeout_secs: 5,
        },
        push: None,
    }
}
