//! Shared test infrastructure for workflow and tool tests.
//!
//! `MemoryStore` implements every storage trait over plain collections so the
//! queue workflow and the version tool run exactly as they do against
//! Postgres. `Fixture` seeds it with users, contributions and queue items.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use cdb_queue::auth::session::{Actor, Permissions};
use cdb_queue::models::contrib::{
    Authorship, ContribStatus, ContribType, Contribution, Revision, RevisionStatus,
};
use cdb_queue::models::post::{NewPost, Post, PostOrder, Topic};
use cdb_queue::models::queue::{QueueItem, QueueTag};
use cdb_queue::models::version::{RevisionRef, VersionTag};
use cdb_queue::queue::QueueServices;
use cdb_queue::store::{ContribStore, PostStore, QueueStore, StoreResult, VersionTagStore};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const AUTHOR_ID: i64 = 10;
pub const VALIDATOR_ID: i64 = 20;
pub const OTHER_ID: i64 = 30;

/// Queue tags seeded by `Fixture::new`.
pub const TAG_NEW: i64 = 1;
pub const TAG_ATTENTION: i64 = 2;
pub const TAG_REPACK: i64 = 3;

pub const MOD_VALIDATOR: &str = "queue.mod.view,queue.mod.validate";
pub const MOD_VIEWER: &str = "queue.mod.view";

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TagRow {
    pub tag: VersionTag,
    pub validated: bool,
}

#[derive(Default)]
pub struct Inner {
    pub users: HashMap<i64, String>,
    pub contribs: HashMap<i64, Contribution>,
    /// (contrib id, user id, active)
    pub coauthors: Vec<(i64, i64, bool)>,
    pub revisions: BTreeMap<i64, Revision>,
    pub queue: BTreeMap<i64, QueueItem>,
    pub tags: BTreeMap<i64, QueueTag>,
    pub topics: BTreeMap<i64, Topic>,
    pub posts: BTreeMap<i64, Post>,
    pub version_tags: Vec<TagRow>,
    pub insert_calls: usize,
    pub next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn ordered(&self, refs: impl Iterator<Item = (i64, i64)>) -> Vec<RevisionRef> {
        let mut seen = Vec::new();
        for (contrib_id, revision_id) in refs {
            if !seen.iter().any(|r: &RevisionRef| r.revision_id == revision_id) {
                seen.push(RevisionRef { contrib_id, revision_id });
            }
        }
        seen.sort_by_key(|r| {
            let rev = self.revisions.get(&r.revision_id);
            let validated = rev.map(|r| r.validated).unwrap_or(false);
            let time = rev.map(|r| r.time).unwrap_or(0);
            (std::cmp::Reverse(validated), std::cmp::Reverse(time))
        });
        seen
    }

    fn type_of(&self, contrib_id: i64) -> Option<ContribType> {
        self.contribs.get(&contrib_id).map(|c| c.contrib_type)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn item(&self, id: i64) -> QueueItem {
        self.lock().queue[&id].clone()
    }

    pub fn posts_of(&self, topic_id: i64) -> Vec<Post> {
        self.lock()
            .posts
            .values()
            .filter(|p| p.topic_id == topic_id)
            .cloned()
            .collect()
    }

    pub fn last_post(&self, topic_id: i64) -> Post {
        self.posts_of(topic_id).pop().unwrap()
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn load(&self, id: i64) -> StoreResult<Option<QueueItem>> {
        Ok(self.lock().queue.get(&id).cloned())
    }

    async fn save(&self, item: &QueueItem) -> StoreResult<()> {
        self.lock().queue.insert(item.id, item.clone());
        Ok(())
    }

    async fn tags(&self) -> StoreResult<BTreeMap<i64, QueueTag>> {
        Ok(self.lock().tags.clone())
    }
}

#[async_trait]
impl ContribStore for MemoryStore {
    async fn load(&self, id: i64, viewer_id: Option<i64>) -> StoreResult<Option<Contribution>> {
        let inner = self.lock();
        let Some(mut contrib) = inner.contribs.get(&id).cloned() else {
            return Ok(None);
        };
        let viewer = viewer_id.unwrap_or(0);
        let co = |active_only: bool| {
            inner
                .coauthors
                .iter()
                .any(|&(c, u, active)| c == id && u == viewer && (active || !active_only))
        };
        contrib.authorship = Authorship {
            is_author: viewer != 0 && contrib.user_id == viewer,
            is_active_coauthor: co(true),
            is_coauthor: co(false),
        };
        Ok(Some(contrib))
    }

    async fn revision(&self, id: i64) -> StoreResult<Option<Revision>> {
        Ok(self.lock().revisions.get(&id).cloned())
    }

    async fn set_revision_status(&self, revision_id: i64, status: RevisionStatus) -> StoreResult<()> {
        if let Some(rev) = self.lock().revisions.get_mut(&revision_id) {
            rev.status = status;
            rev.validated = status == RevisionStatus::Approved;
        }
        Ok(())
    }

    async fn set_contrib_status(&self, contrib_id: i64, status: ContribStatus) -> StoreResult<()> {
        if let Some(c) = self.lock().contribs.get_mut(&contrib_id) {
            c.status = status;
        }
        Ok(())
    }

    async fn mark_version_tags_validated(&self, revision_id: i64) -> StoreResult<()> {
        for row in self.lock().version_tags.iter_mut() {
            if row.tag.revision_id == revision_id {
                row.validated = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn topic(&self, id: i64) -> StoreResult<Option<Topic>> {
        Ok(self.lock().topics.get(&id).cloned())
    }

    async fn posts(&self, topic_id: i64, order: PostOrder, include_deleted: bool) -> StoreResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts_of(topic_id)
            .into_iter()
            .filter(|p| include_deleted || !p.is_deleted())
            .collect();
        posts.sort_by_key(|p| (p.time, p.id));
        if order == PostOrder::NewestFirst {
            posts.reverse();
        }
        Ok(posts)
    }

    async fn post(&self, id: i64) -> StoreResult<Option<Post>> {
        Ok(self.lock().posts.get(&id).cloned())
    }

    async fn insert(&self, post: &NewPost) -> StoreResult<i64> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let username = inner
            .users
            .get(&post.user_id)
            .cloned()
            .unwrap_or_else(|| "Anonymous".to_string());
        inner.posts.insert(
            id,
            Post {
                id,
                topic_id: post.topic_id,
                user_id: post.user_id,
                username,
                subject: post.subject.clone(),
                text: post.text.clone(),
                time: post.time,
                edit_time: None,
                edit_count: 0,
                deleted_time: None,
                deleted_user_id: None,
            },
        );
        if let Some(topic) = inner.topics.get_mut(&post.topic_id) {
            topic.first_post_id.get_or_insert(id);
        }
        Ok(id)
    }

    async fn update(&self, post: &Post) -> StoreResult<()> {
        self.lock().posts.insert(post.id, post.clone());
        Ok(())
    }
}

#[async_trait]
impl VersionTagStore for MemoryStore {
    async fn tagged_with(&self, branch: i32, point: &str, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>> {
        let inner = self.lock();
        let refs = inner
            .version_tags
            .iter()
            .filter(|r| r.tag.branch == branch && r.tag.point == point)
            .filter(|r| inner.type_of(r.tag.contrib_id).is_some_and(|t| types.contains(&t)))
            .map(|r| (r.tag.contrib_id, r.tag.revision_id));
        Ok(inner.ordered(refs))
    }

    async fn all_revisions(&self, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>> {
        let inner = self.lock();
        let refs = inner
            .revisions
            .values()
            .filter(|r| inner.type_of(r.contrib_id).is_some_and(|t| types.contains(&t)))
            .map(|r| (r.contrib_id, r.id));
        Ok(inner.ordered(refs))
    }

    async fn already_tagged(&self, revision_ids: &[i64], branch: i32, point: &str) -> StoreResult<Vec<i64>> {
        Ok(self
            .lock()
            .version_tags
            .iter()
            .filter(|r| revision_ids.contains(&r.tag.revision_id))
            .filter(|r| r.tag.branch == branch && r.tag.point == point)
            .map(|r| r.tag.revision_id)
            .collect())
    }

    async fn insert_tags(&self, tags: &[VersionTag]) -> StoreResult<u64> {
        let mut inner = self.lock();
        inner.insert_calls += 1;
        let mut written = 0;
        for tag in tags {
            let exists = inner.version_tags.iter().any(|r| {
                r.tag.revision_id == tag.revision_id && r.tag.branch == tag.branch && r.tag.point == tag.point
            });
            if !exists {
                inner.version_tags.push(TagRow { tag: tag.clone(), validated: false });
                written += 1;
            }
        }
        Ok(written)
    }

    async fn known_versions(&self) -> StoreResult<Vec<(i32, String)>> {
        let mut versions: Vec<(i32, String)> = self
            .lock()
            .version_tags
            .iter()
            .map(|r| (r.tag.branch, r.tag.point.clone()))
            .collect();
        versions.sort();
        versions.dedup();
        Ok(versions)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub struct Fixture {
    pub store: Arc<MemoryStore>,
}

impl Fixture {
    /// Store with an author, a validator, another user and three queue tags.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        {
            let mut inner = store.lock();
            inner.next_id = 1000;
            for (id, name) in [(AUTHOR_ID, "author"), (VALIDATOR_ID, "validator"), (OTHER_ID, "other")] {
                inner.users.insert(id, name.to_string());
            }
            for (id, name) in [(TAG_NEW, "New"), (TAG_ATTENTION, "Attention"), (TAG_REPACK, "Repack")] {
                inner.tags.insert(id, QueueTag { id, name: name.to_string() });
            }
        }
        Fixture { store }
    }

    pub fn services(&self) -> QueueServices {
        QueueServices {
            queue: self.store.clone(),
            contribs: self.store.clone(),
            posts: self.store.clone(),
        }
    }

    pub fn add_contrib(&self, contrib_type: ContribType, name: &str) -> i64 {
        let mut inner = self.store.lock();
        let id = inner.next_id();
        inner.contribs.insert(
            id,
            Contribution {
                id,
                contrib_type,
                name: name.to_string(),
                name_clean: name.to_lowercase().replace(' ', "_"),
                user_id: AUTHOR_ID,
                status: ContribStatus::New,
                authorship: Authorship::default(),
            },
        );
        id
    }

    pub fn add_coauthor(&self, contrib_id: i64, user_id: i64, active: bool) {
        self.store.lock().coauthors.push((contrib_id, user_id, active));
    }

    pub fn add_revision(&self, contrib_id: i64, version: &str, validated: bool, time: i64) -> i64 {
        let mut inner = self.store.lock();
        let id = inner.next_id();
        inner.revisions.insert(
            id,
            Revision {
                id,
                contrib_id,
                version: version.to_string(),
                name: String::new(),
                status: if validated { RevisionStatus::Approved } else { RevisionStatus::New },
                validated,
                time,
            },
        );
        id
    }

    pub fn tag_revision(&self, contrib_id: i64, revision_id: i64, branch: i32, point: &str) {
        self.store.lock().version_tags.push(TagRow {
            tag: VersionTag {
                revision_id,
                contrib_id,
                branch,
                point: point.to_string(),
            },
            validated: false,
        });
    }

    /// Open queue item for a new mod revision, with a discussion topic whose
    /// first post was written by the author. Returns the queue item id.
    pub fn add_queue_item(&self, status: i32) -> i64 {
        let contrib_id = self.add_contrib(ContribType::Mod, "Board Rules");
        let revision_id = self.add_revision(contrib_id, "1.0.0", false, 100);
        self.add_queue_item_for(contrib_id, revision_id, status)
    }

    pub fn add_queue_item_for(&self, contrib_id: i64, revision_id: i64, status: i32) -> i64 {
        let mut inner = self.store.lock();
        let queue_type = inner.contribs[&contrib_id].contrib_type;
        let topic_id = inner.next_id();
        let post_id = inner.next_id();
        let item_id = inner.next_id();

        inner.topics.insert(
            topic_id,
            Topic {
                id: topic_id,
                subject: "Validation: Board Rules 1.0.0".to_string(),
                first_post_id: Some(post_id),
            },
        );
        inner.posts.insert(
            post_id,
            Post {
                id: post_id,
                topic_id,
                user_id: AUTHOR_ID,
                username: "author".to_string(),
                subject: "Validation: Board Rules 1.0.0".to_string(),
                text: "Please review".to_string(),
                time: 100,
                edit_time: None,
                edit_count: 0,
                deleted_time: None,
                deleted_user_id: None,
            },
        );
        inner.queue.insert(
            item_id,
            QueueItem {
                id: item_id,
                contrib_id,
                revision_id,
                queue_type,
                status,
                tested: false,
                allow_author_repack: false,
                topic_id,
                progress_user_id: None,
                progress_time: None,
                submitter_user_id: AUTHOR_ID,
                submit_time: 100,
                notes: "First release".to_string(),
                validation_notes: String::new(),
                close_time: None,
                close_user_id: None,
            },
        );
        item_id
    }

    /// Add a post to an item's topic at `time`.
    pub fn add_post(&self, item_id: i64, user_id: i64, text: &str, time: i64) -> i64 {
        let mut inner = self.store.lock();
        let topic_id = inner.queue[&item_id].topic_id;
        let id = inner.next_id();
        let username = inner.users[&user_id].clone();
        inner.posts.insert(
            id,
            Post {
                id,
                topic_id,
                user_id,
                username,
                subject: "Re: Validation: Board Rules 1.0.0".to_string(),
                text: text.to_string(),
                time,
                edit_time: None,
                edit_count: 0,
                deleted_time: None,
                deleted_user_id: None,
            },
        );
        id
    }
}

// ============================================================================
// ACTORS
// ============================================================================

pub fn actor(user_id: i64, permissions: &str) -> Actor {
    Actor {
        user_id: Some(user_id),
        username: format!("user{user_id}"),
        is_founder: false,
        permissions: Permissions::from_csv(permissions),
    }
}

pub fn validator() -> Actor {
    actor(VALIDATOR_ID, MOD_VALIDATOR)
}

pub fn founder(user_id: i64) -> Actor {
    Actor {
        is_founder: true,
        ..actor(user_id, MOD_VALIDATOR)
    }
}
