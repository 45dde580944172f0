use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ToolError {
    NoVersionSelected,
    /// Release package for the requested version is not on disk.
    PackageMissing(String),
    NothingToUpdate,
    Store(StoreError),
}

impl ToolError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NoVersionSelected => "NO_VERSION_SELECTED",
            ToolError::PackageMissing(_) => "FILE_NOT_EXIST",
            ToolError::NothingToUpdate => "NO_REVISIONS_UPDATED",
            ToolError::Store(_) => "GENERAL_ERROR",
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::NoVersionSelected => {
                f.write_str("Enter a full platform version, for example 3.1.10.")
            }
            ToolError::PackageMissing(path) => write!(f, "The file {path} does not exist."),
            ToolError::NothingToUpdate => f.write_str("No revisions were updated."),
            ToolError::Store(e) => write!(f, "Version tag store error: {e}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<StoreError> for ToolError {
    fn from(e: StoreError) -> Self {
        ToolError::Store(e)
    }
}
