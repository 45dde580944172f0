mod queries;
mod types;

pub use queries::PgQueueStore;
pub use types::*;
