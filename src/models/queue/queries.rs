use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::types::*;
use crate::models::contrib::ContribType;
use crate::store::{QueueStore, StoreError, StoreResult};

/// `tags.tag_type` value for validation queue tags.
const TAG_TYPE_QUEUE: i16 = 1;

#[derive(sqlx::FromRow)]
struct QueueRow {
    queue_id: i64,
    contrib_id: i64,
    revision_id: i64,
    queue_type: i16,
    queue_status: i32,
    queue_tested: bool,
    allow_author_repack: bool,
    queue_topic_id: i64,
    queue_progress: Option<i64>,
    queue_progress_time: Option<i64>,
    submitter_user_id: i64,
    queue_submit_time: i64,
    queue_notes: String,
    queue_validation_notes: String,
    queue_close_time: Option<i64>,
    queue_close_user: Option<i64>,
}

impl TryFrom<QueueRow> for QueueItem {
    type Error = StoreError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let queue_type = ContribType::from_id(row.queue_type).ok_or_else(|| {
            StoreError::Backend(format!("queue item {} has unknown type {}", row.queue_id, row.queue_type))
        })?;
        Ok(QueueItem {
            id: row.queue_id,
            contrib_id: row.contrib_id,
            revision_id: row.revision_id,
            queue_type,
            status: row.queue_status,
            tested: row.queue_tested,
            allow_author_repack: row.allow_author_repack,
            topic_id: row.queue_topic_id,
            progress_user_id: row.queue_progress,
            progress_time: row.queue_progress_time,
            submitter_user_id: row.submitter_user_id,
            submit_time: row.queue_submit_time,
            notes: row.queue_notes,
            validation_notes: row.queue_validation_notes,
            close_time: row.queue_close_time,
            close_user_id: row.queue_close_user,
        })
    }
}

/// Validation queue backed by Postgres.
#[derive(Clone)]
pub struct PgQueueStore {
    pool: PgPool,
}

impl PgQueueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for PgQueueStore {
    async fn load(&self, id: i64) -> StoreResult<Option<QueueItem>> {
        let row = sqlx::query_as::<_, QueueRow>(
            "SELECT queue_id, contrib_id, revision_id, queue_type, queue_status, queue_tested, \
                    allow_author_repack, queue_topic_id, queue_progress, queue_progress_time, \
                    submitter_user_id, queue_submit_time, queue_notes, queue_validation_notes, \
                    queue_close_time, queue_close_user \
             FROM queue WHERE queue_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QueueItem::try_from).transpose()
    }

    async fn save(&self, item: &QueueItem) -> StoreResult<()> {
        sqlx::query(
            "UPDATE queue SET \
                queue_status = $2, queue_tested = $3, allow_author_repack = $4, \
                queue_progress = $5, queue_progress_time = $6, \
                queue_validation_notes = $7, queue_close_time = $8, queue_close_user = $9 \
             WHERE queue_id = $1",
        )
        .bind(item.id)
        .bind(item.status)
        .bind(item.tested)
        .bind(item.allow_author_repack)
        .bind(item.progress_user_id)
        .bind(item.progress_time)
        .bind(&item.validation_notes)
        .bind(item.close_time)
        .bind(item.close_user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tags(&self) -> StoreResult<BTreeMap<i64, QueueTag>> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT tag_id, tag_field_name FROM tags WHERE tag_type = $1 ORDER BY tag_id",
        )
        .bind(TAG_TYPE_QUEUE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| (id, QueueTag { id, name }))
            .collect())
    }
}
