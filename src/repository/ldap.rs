//! `ldap3`-backed directory client.

use std::collections::HashMap;
use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, ResultEntry, Scope, SearchEntry};

use crate::domain::entry::DirectoryEntry;
use crate::filter::{FIRST_NAME_ATTR, LAST_NAME_ATTR, NUMBER_ATTR, SearchRequest, SearchScope};
use crate::models::config::DirectoryConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DirectoryClient, DirectoryConnection};

/// Connects to `ldap://address:port` once per fresh search.
#[derive(Clone, Debug)]
pub struct LdapDirectory {
    url: String,
    timeout: Duration,
}

impl LdapDirectory {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            url: config.url(),
            timeout: config.timeout(),
        }
    }
}

pub struct LdapConnection {
    ldap: Ldap,
    timeout: Duration,
}

impl DirectoryClient for LdapDirectory {
    type Connection = LdapConnection;

    async fn connect(&self) -> RepositoryResult<LdapConnection> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.timeout);
        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.url)
            .await
            .map_err(|e| map_ldap_error(e, RepositoryError::ConnectionError))?;

        // The driver exits once every `Ldap` handle has been dropped.
        actix_web::rt::spawn(async move {
            if let Err(e) = conn.drive().await {
                log::warn!("LDAP connection error: {e}");
            }
        });

        log::debug!("Connected to {}", self.url);
        Ok(LdapConnection {
            ldap,
            timeout: self.timeout,
        })
    }
}

impl DirectoryConnection for LdapConnection {
    async fn authenticate(&mut self, principal: &str, secret: &str) -> RepositoryResult<()> {
        self.ldap
            .with_timeout(self.timeout)
            .simple_bind(principal, secret)
            .await
            .and_then(|result| result.success())
            .map(|_| ())
            .map_err(|e| map_ldap_error(e, RepositoryError::AuthenticationError))
    }

    async fn search(&mut self, request: &SearchRequest) -> RepositoryResult<Vec<DirectoryEntry>> {
        let search_error = |e: LdapError| map_ldap_error(e, RepositoryError::SearchError);

        let mut stream = self
            .ldap
            .with_timeout(self.timeout)
            .streaming_search(
                &request.base,
                scope(request.scope),
                request.filter.as_str(),
                request.attributes.to_vec(),
            )
            .await
            .map_err(search_error)?;

        let mut entries = Vec::new();
        while let Some(result) = stream.next().await.map_err(search_error)? {
            entries.extend(entry_from_result(result));
        }
        stream.finish().await.success().map_err(search_error)?;

        Ok(entries)
    }

    async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            log::debug!("LDAP unbind failed: {e}");
        }
    }
}

fn scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Base => Scope::Base,
        SearchScope::OneLevel => Scope::OneLevel,
        SearchScope::Subtree => Scope::Subtree,
    }
}

fn map_ldap_error(err: LdapError, phase: fn(String) -> RepositoryError) -> RepositoryError {
    match err {
        LdapError::Timeout { .. } => RepositoryError::Timeout(err.to_string()),
        other => phase(other.to_string()),
    }
}

/// First value of `name`; attribute names are matched case-insensitively.
fn first_value(attrs: &HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first().cloned())
}

/// Converts a streamed search result. Referrals and intermediate messages
/// carry no entry and are skipped.
fn entry_from_result(result: ResultEntry) -> Option<DirectoryEntry> {
    if result.is_ref() || result.is_intermediate() {
        log::debug!("Skipping non-entry search result (tag {})", result.0.id);
        return None;
    }
    Some(entry_from_attrs(&SearchEntry::construct(result).attrs))
}

fn entry_from_attrs(attrs: &HashMap<String, Vec<String>>) -> DirectoryEntry {
    DirectoryEntry::new(
        first_value(attrs, LAST_NAME_ATTR),
        first_value(attrs, FIRST_NAME_ATTR),
        first_value(attrs, NUMBER_ATTR),
    )
}
