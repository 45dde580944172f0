use std::path::PathBuf;

use crate::store::PackageStore;

/// Release packages under `<root>/phpbb_packages/phpBB-<version>.zip`.
#[derive(Debug, Clone)]
pub struct FsPackageStore {
    root: PathBuf,
}

impl FsPackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, version: &str) -> PathBuf {
        self.root
            .join("phpbb_packages")
            .join(format!("phpBB-{version}.zip"))
    }
}

impl PackageStore for FsPackageStore {
    fn package_path(&self, version: &str) -> String {
        self.full_path(version).display().to_string()
    }

    fn exists(&self, version: &str) -> bool {
        self.full_path(version).is_file()
    }
}
