//! Domain types shared by the query builder and the paginator.

pub mod entry;
pub mod types;
