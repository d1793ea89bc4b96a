pub mod directory;
pub mod errors;

pub use errors::{ServiceError, ServiceResult};
