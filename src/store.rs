//! Storage seams. Handlers and the workflow only ever see these traits; the
//! Postgres implementations live next to their models, and the integration
//! tests provide an in-memory one.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::models::contrib::{ContribStatus, ContribType, Contribution, Revision, RevisionStatus};
use crate::models::post::{NewPost, Post, PostOrder, Topic};
use crate::models::queue::{QueueItem, QueueTag};
use crate::models::version::{RevisionRef, VersionTag};

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "database error: {e}"),
            StoreError::Backend(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Db(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn load(&self, id: i64) -> StoreResult<Option<QueueItem>>;

    async fn save(&self, item: &QueueItem) -> StoreResult<()>;

    /// Tags a queue item may sit in, keyed by tag id.
    async fn tags(&self) -> StoreResult<BTreeMap<i64, QueueTag>>;
}

#[async_trait]
pub trait ContribStore: Send + Sync {
    /// Load a contribution, with authorship computed for `viewer_id`.
    async fn load(&self, id: i64, viewer_id: Option<i64>) -> StoreResult<Option<Contribution>>;

    async fn revision(&self, id: i64) -> StoreResult<Option<Revision>>;

    async fn set_revision_status(&self, revision_id: i64, status: RevisionStatus) -> StoreResult<()>;

    async fn set_contrib_status(&self, contrib_id: i64, status: ContribStatus) -> StoreResult<()>;

    /// Flag every version tag of the revision as validated.
    async fn mark_version_tags_validated(&self, revision_id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn topic(&self, id: i64) -> StoreResult<Option<Topic>>;

    async fn posts(&self, topic_id: i64, order: PostOrder, include_deleted: bool) -> StoreResult<Vec<Post>>;

    async fn post(&self, id: i64) -> StoreResult<Option<Post>>;

    /// Store a new post and return its id. The first post of a topic becomes
    /// the topic's first post.
    async fn insert(&self, post: &NewPost) -> StoreResult<i64>;

    async fn update(&self, post: &Post) -> StoreResult<()>;
}

#[async_trait]
pub trait VersionTagStore: Send + Sync {
    /// Distinct (contribution, revision) pairs tagged with the given version,
    /// limited to `types`, newest validated first.
    async fn tagged_with(&self, branch: i32, point: &str, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>>;

    /// Every (contribution, revision) pair of the given types, same ordering.
    async fn all_revisions(&self, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>>;

    /// Subset of `revision_ids` already tagged with exactly (branch, point).
    async fn already_tagged(&self, revision_ids: &[i64], branch: i32, point: &str) -> StoreResult<Vec<i64>>;

    /// Insert all tags in one batch; returns rows written.
    async fn insert_tags(&self, tags: &[VersionTag]) -> StoreResult<u64>;

    /// Every distinct (branch, point) pair present.
    async fn known_versions(&self) -> StoreResult<Vec<(i32, String)>>;
}

/// Read-through catalog of known platform versions, keyed `"<branch><point>"`.
#[async_trait]
pub trait VersionCatalog: Send + Sync {
    async fn versions(&self) -> StoreResult<BTreeMap<String, String>>;

    /// Drop the cached catalog; the next read reloads it.
    fn invalidate(&self);
}

/// Release packages kept on disk for automated testing.
pub trait PackageStore: Send + Sync {
    fn package_path(&self, version: &str) -> String;

    fn exists(&self, version: &str) -> bool;
}
