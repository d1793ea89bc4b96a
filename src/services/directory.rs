//! Directory search and session-backed paging.
//!
//! A fresh search queries the directory exactly once, sorts the full result
//! set and caches it against the caller's session. Follow-up requests only
//! carry a cursor and are served from that cache.

use std::sync::Arc;

use crate::domain::entry::{DirectoryEntry, sort_entries};
use crate::domain::types::{Cursor, SearchCriteria, SessionKey};
use crate::dto::directory::{ListOutcome, ListRequest};
use crate::filter::{SearchRequest, build_filter};
use crate::models::config::DirectoryConfig;
use crate::pagination::Listing;
use crate::repository::{DirectoryClient, DirectoryConnection, ResultCache};
use crate::services::{ServiceError, ServiceResult};

/// Dispatches a `/list` request to [`search`] or [`page`].
///
/// A fresh search without an existing session gets a new session key; the
/// caller is expected to persist the returned key.
pub async fn list<D, C>(
    directory: &D,
    cache: &C,
    session: Option<SessionKey>,
    request: ListRequest,
    config: &DirectoryConfig,
) -> ServiceResult<ListOutcome>
where
    D: DirectoryClient,
    C: ResultCache + ?Sized,
{
    match request {
        ListRequest::Page(cursor) => {
            let session = session.ok_or(ServiceError::StaleCursor)?;
            let listing = page(cache, &session, cursor, config)?;
            Ok(ListOutcome { session, listing })
        }
        ListRequest::Search(criteria) => {
            let session = session.unwrap_or_default();
            let listing = search(directory, cache, session, &criteria, config).await?;
            Ok(ListOutcome { session, listing })
        }
    }
}

/// Runs a new directory query and returns its first page.
pub async fn search<D, C>(
    directory: &D,
    cache: &C,
    session: SessionKey,
    criteria: &SearchCriteria,
    config: &DirectoryConfig,
) -> ServiceResult<Listing<DirectoryEntry>>
where
    D: DirectoryClient,
    C: ResultCache + ?Sized,
{
    let filter = build_filter(criteria, config)?;
    log::debug!("Searching directory with filter {filter}");

    let request = SearchRequest::new(config, filter);
    let mut entries = fetch_entries(directory, &request, config).await?;
    log::info!("Directory search returned {} entries", entries.len());

    sort_entries(&mut entries);
    let entries: Arc<[DirectoryEntry]> = entries.into();
    cache.put(session, entries.clone());

    Ok(Listing::slice(&entries, Cursor::FIRST, config.results_per_page))
}

/// Serves the page starting at `cursor` from the session's cached results.
pub fn page<C>(
    cache: &C,
    session: &SessionKey,
    cursor: Cursor,
    config: &DirectoryConfig,
) -> ServiceResult<Listing<DirectoryEntry>>
where
    C: ResultCache + ?Sized,
{
    let entries = cache.get(session).ok_or_else(|| {
        log::info!("No cached results for session {session}");
        ServiceError::StaleCursor
    })?;

    Ok(Listing::slice(&entries, cursor, config.results_per_page))
}

/// Connects, binds when credentials are configured, searches, and always
/// closes the connection before returning.
async fn fetch_entries<D>(
    directory: &D,
    request: &SearchRequest,
    config: &DirectoryConfig,
) -> ServiceResult<Vec<DirectoryEntry>>
where
    D: DirectoryClient,
{
    let mut connection = directory.connect().await.map_err(|err| {
        log::error!("LDAP connection error: {err}");
        err
    })?;

    match config.credentials() {
        Some((principal, secret)) => {
            if let Err(err) = connection.authenticate(principal, secret).await {
                log::error!("LDAP bind error: {err}");
                connection.close().await;
                return Err(err.into());
            }
        }
        None if config.has_partial_credentials() => {
            log::warn!("Only one of bind_dn and bind_password is set; searching anonymously");
        }
        None => {}
    }

    let result = connection.search(request).await;
    connection.close().await;

    result.map_err(|err| {
        log::error!("LDAP search error: {err}");
        ServiceError::from(err)
    })
}
