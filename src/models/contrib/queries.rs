use async_trait::async_trait;
use sqlx::PgPool;

use super::types::*;
use crate::store::{ContribStore, StoreResult};

#[derive(sqlx::FromRow)]
struct ContribRow {
    contrib_id: i64,
    contrib_type: i16,
    contrib_name: String,
    contrib_name_clean: String,
    contrib_user_id: i64,
    contrib_status: i16,
    is_active_coauthor: bool,
    is_coauthor: bool,
}

#[derive(sqlx::FromRow)]
struct RevisionRow {
    revision_id: i64,
    contrib_id: i64,
    revision_version: String,
    revision_name: String,
    revision_status: i16,
    revision_validated: bool,
    revision_time: i64,
}

impl From<RevisionRow> for Revision {
    fn from(row: RevisionRow) -> Self {
        Revision {
            id: row.revision_id,
            contrib_id: row.contrib_id,
            version: row.revision_version,
            name: row.revision_name,
            status: RevisionStatus::from_id(row.revision_status),
            validated: row.revision_validated,
            time: row.revision_time,
        }
    }
}

/// Contributions and revisions backed by Postgres.
#[derive(Clone)]
pub struct PgContribStore {
    pool: PgPool,
}

impl PgContribStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContribStore for PgContribStore {
    async fn load(&self, id: i64, viewer_id: Option<i64>) -> StoreResult<Option<Contribution>> {
        // Anonymous viewers are user 0, which never authors anything.
        let viewer = viewer_id.unwrap_or(0);
        let row = sqlx::query_as::<_, ContribRow>(
            "SELECT c.contrib_id, c.contrib_type, c.contrib_name, c.contrib_name_clean, \
                    c.contrib_user_id, c.contrib_status, \
                    EXISTS (SELECT 1 FROM contrib_coauthors ca \
                            WHERE ca.contrib_id = c.contrib_id AND ca.user_id = $2 AND ca.active) \
                        AS is_active_coauthor, \
                    EXISTS (SELECT 1 FROM contrib_coauthors ca \
                            WHERE ca.contrib_id = c.contrib_id AND ca.user_id = $2) \
                        AS is_coauthor \
             FROM contribs c \
             WHERE c.contrib_id = $1",
        )
        .bind(id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let Some(contrib_type) = ContribType::from_id(row.contrib_type) else {
            log::warn!("Contribution {} has unknown type {}", row.contrib_id, row.contrib_type);
            return Ok(None);
        };

        Ok(Some(Contribution {
            id: row.contrib_id,
            contrib_type,
            name: row.contrib_name,
            name_clean: row.contrib_name_clean,
            user_id: row.contrib_user_id,
            status: ContribStatus::from_id(row.contrib_status),
            authorship: Authorship {
                is_author: viewer != 0 && row.contrib_user_id == viewer,
                is_active_coauthor: row.is_active_coauthor,
                is_coauthor: row.is_coauthor,
            },
        }))
    }

    async fn revision(&self, id: i64) -> StoreResult<Option<Revision>> {
        let row = sqlx::query_as::<_, RevisionRow>(
            "SELECT revision_id, contrib_id, revision_version, revision_name, \
                    revision_status, revision_validated, revision_time \
             FROM revisions WHERE revision_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Revision::from))
    }

    async fn set_revision_status(&self, revision_id: i64, status: RevisionStatus) -> StoreResult<()> {
        sqlx::query(
            "UPDATE revisions \
             SET revision_status = $2, revision_validated = ($2 = $3) \
             WHERE revision_id = $1",
        )
        .bind(revision_id)
        .bind(status.id())
        .bind(RevisionStatus::Approved.id())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_contrib_status(&self, contrib_id: i64, status: ContribStatus) -> StoreResult<()> {
        sqlx::query("UPDATE contribs SET contrib_status = $2 WHERE contrib_id = $1")
            .bind(contrib_id)
            .bind(status.id())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_version_tags_validated(&self, revision_id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE revisions_phpbb SET revision_validated = TRUE WHERE revision_id = $1")
            .bind(revision_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
