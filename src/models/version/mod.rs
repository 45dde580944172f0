mod catalog;
mod queries;
mod types;

pub use catalog::CachedVersionCatalog;
pub use queries::PgVersionTagStore;
pub use types::*;
