mod queries;
mod types;

pub use queries::PgContribStore;
pub use types::*;
