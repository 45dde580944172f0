use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::models::contrib::PgContribStore;
use crate::models::post::PgPostStore;
use crate::models::queue::PgQueueStore;
use crate::models::version::{CachedVersionCatalog, PgVersionTagStore};
use crate::queue::{QueueServices, WorkflowSettings};
use crate::store::{PackageStore, VersionCatalog, VersionTagStore};
use crate::tools::{FsPackageStore, VersionTestTool};

/// Shared application state handed to every handler via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub queue: QueueServices,
    pub version_tags: Arc<dyn VersionTagStore>,
    pub catalog: Arc<dyn VersionCatalog>,
    pub packages: Arc<dyn PackageStore>,
}

impl AppState {
    pub fn postgres(pool: PgPool, config: AppConfig) -> Self {
        let version_tags: Arc<dyn VersionTagStore> = Arc::new(PgVersionTagStore::new(pool.clone()));
        let catalog = Arc::new(CachedVersionCatalog::new(version_tags.clone()));
        let packages = Arc::new(FsPackageStore::new(config.store_path.clone()));

        AppState {
            queue: QueueServices {
                queue: Arc::new(PgQueueStore::new(pool.clone())),
                contribs: Arc::new(PgContribStore::new(pool.clone())),
                posts: Arc::new(PgPostStore::new(pool)),
            },
            version_tags,
            catalog,
            packages,
            config,
        }
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            allow_self_validation: self.config.allow_self_validation,
        }
    }

    pub fn version_tool(&self) -> VersionTestTool {
        VersionTestTool::new(
            self.version_tags.clone(),
            self.catalog.clone(),
            self.packages.clone(),
        )
    }
}
