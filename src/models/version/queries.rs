use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::types::*;
use crate::models::contrib::ContribType;
use crate::store::{StoreResult, VersionTagStore};

/// Bind parameters per row in `insert_tags`; Postgres caps a statement at 65535.
const INSERT_CHUNK_ROWS: usize = 10_000;

type CandidateRow = (i64, i64, bool, i64);

fn type_ids(types: &[ContribType]) -> Vec<i16> {
    types.iter().map(|t| t.id()).collect()
}

fn to_refs(rows: Vec<CandidateRow>) -> Vec<RevisionRef> {
    rows.into_iter()
        .map(|(contrib_id, revision_id, _, _)| RevisionRef { contrib_id, revision_id })
        .collect()
}

/// Revision version tags backed by Postgres.
#[derive(Clone)]
pub struct PgVersionTagStore {
    pool: PgPool,
}

impl PgVersionTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionTagStore for PgVersionTagStore {
    async fn tagged_with(&self, branch: i32, point: &str, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>> {
        let rows: Vec<CandidateRow> = sqlx::query_as(
            "SELECT DISTINCT rp.contrib_id, rp.revision_id, r.revision_validated, r.revision_time \
             FROM revisions_phpbb rp \
             JOIN contribs c ON c.contrib_id = rp.contrib_id \
             JOIN revisions r ON r.revision_id = rp.revision_id \
             WHERE rp.phpbb_version_branch = $1 \
               AND rp.phpbb_version_revision = $2 \
               AND c.contrib_type = ANY($3) \
             ORDER BY r.revision_validated DESC, r.revision_time DESC",
        )
        .bind(branch)
        .bind(point)
        .bind(type_ids(types))
        .fetch_all(&self.pool)
        .await?;
        Ok(to_refs(rows))
    }

    async fn all_revisions(&self, types: &[ContribType]) -> StoreResult<Vec<RevisionRef>> {
        let rows: Vec<CandidateRow> = sqlx::query_as(
            "SELECT DISTINCT r.contrib_id, r.revision_id, r.revision_validated, r.revision_time \
             FROM revisions r \
             JOIN contribs c ON c.contrib_id = r.contrib_id \
             WHERE c.contrib_type = ANY($1) \
             ORDER BY r.revision_validated DESC, r.revision_time DESC",
        )
        .bind(type_ids(types))
        .fetch_all(&self.pool)
        .await?;
        Ok(to_refs(rows))
    }

    async fn already_tagged(&self, revision_ids: &[i64], branch: i32, point: &str) -> StoreResult<Vec<i64>> {
        if revision_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT revision_id FROM revisions_phpbb \
             WHERE revision_id = ANY($1) \
               AND phpbb_version_branch = $2 \
               AND phpbb_version_revision = $3",
        )
        .bind(revision_ids)
        .bind(branch)
        .bind(point)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn insert_tags(&self, tags: &[VersionTag]) -> StoreResult<u64> {
        let mut written = 0;
        for chunk in tags.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO revisions_phpbb \
                 (revision_id, contrib_id, phpbb_version_branch, phpbb_version_revision) ",
            );
            builder.push_values(chunk, |mut row, tag| {
                row.push_bind(tag.revision_id)
                    .push_bind(tag.contrib_id)
                    .push_bind(tag.branch)
                    .push_bind(&tag.point);
            });
            builder.push(
                " ON CONFLICT (revision_id, phpbb_version_branch, phpbb_version_revision) DO NOTHING",
            );
            written += builder.build().execute(&self.pool).await?.rows_affected();
        }
        Ok(written)
    }

    async fn known_versions(&self) -> StoreResult<Vec<(i32, String)>> {
        let rows: Vec<(i32, String)> = sqlx::query_as(
            "SELECT DISTINCT phpbb_version_branch, phpbb_version_revision \
             FROM revisions_phpbb \
             ORDER BY phpbb_version_branch, phpbb_version_revision",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
