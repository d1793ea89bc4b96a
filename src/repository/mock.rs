//! Mock cache implementation for isolating services in tests.

use std::sync::Arc;

use mockall::mock;

use crate::domain::entry::DirectoryEntry;
use crate::domain::types::SessionKey;
use crate::repository::ResultCache;

mock! {
    pub ResultCache {}

    impl ResultCache for ResultCache {
        fn get(&self, session: &SessionKey) -> Option<Arc<[DirectoryEntry]>>;
        fn put(&self, session: SessionKey, entries: Arc<[DirectoryEntry]>);
    }
}
