mod queries;
mod types;

pub use queries::PgPostStore;
pub use types::*;
