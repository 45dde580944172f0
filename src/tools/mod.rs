//! Administrative maintenance tools.

mod error;
mod packages;

pub use error::ToolError;
pub use packages::FsPackageStore;
pub use phpbb_version_test::{ToolInput, VersionOption, VersionTestTool};

/// Permission code for running the management tools.
pub const TOOLS_PERMISSION: &str = "tools.version_test";
