use async_trait::async_trait;
use sqlx::PgPool;

use super::types::*;
use crate::store::{PostStore, StoreResult};

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: i64,
    topic_id: i64,
    post_user_id: i64,
    username: String,
    post_subject: String,
    post_text: String,
    post_time: i64,
    post_edit_time: Option<i64>,
    post_edit_count: i32,
    post_deleted: Option<i64>,
    post_delete_user: Option<i64>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.post_id,
            topic_id: row.topic_id,
            user_id: row.post_user_id,
            username: row.username,
            subject: row.post_subject,
            text: row.post_text,
            time: row.post_time,
            edit_time: row.post_edit_time,
            edit_count: row.post_edit_count,
            deleted_time: row.post_deleted,
            deleted_user_id: row.post_delete_user,
        }
    }
}

const POST_COLUMNS: &str = "p.post_id, p.topic_id, p.post_user_id, \
    COALESCE(u.username, 'Anonymous') AS username, p.post_subject, p.post_text, \
    p.post_time, p.post_edit_time, p.post_edit_count, p.post_deleted, p.post_delete_user";

/// Queue discussion topics and posts backed by Postgres.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn topic(&self, id: i64) -> StoreResult<Option<Topic>> {
        let row: Option<(i64, String, Option<i64>)> = sqlx::query_as(
            "SELECT topic_id, topic_subject, topic_first_post_id FROM topics WHERE topic_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, subject, first_post_id)| Topic { id, subject, first_post_id }))
    }

    async fn posts(&self, topic_id: i64, order: PostOrder, include_deleted: bool) -> StoreResult<Vec<Post>> {
        let direction = match order {
            PostOrder::OldestFirst => "ASC",
            PostOrder::NewestFirst => "DESC",
        };
        let sql = format!(
            "SELECT {POST_COLUMNS} \
             FROM posts p LEFT JOIN users u ON u.user_id = p.post_user_id \
             WHERE p.topic_id = $1 AND ($2 OR p.post_deleted IS NULL) \
             ORDER BY p.post_time {direction}, p.post_id {direction}"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(topic_id)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn post(&self, id: i64) -> StoreResult<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} \
             FROM posts p LEFT JOIN users u ON u.user_id = p.post_user_id \
             WHERE p.post_id = $1"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Post::from))
    }

    async fn insert(&self, post: &NewPost) -> StoreResult<i64> {
        let (post_id,): (i64,) = sqlx::query_as(
            "INSERT INTO posts (topic_id, post_user_id, post_subject, post_text, post_time) \
             VALUES ($1, $2, $3, $4, $5) RETURNING post_id",
        )
        .bind(post.topic_id)
        .bind(post.user_id)
        .bind(&post.subject)
        .bind(&post.text)
        .bind(post.time)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query(
            "UPDATE topics SET \
                topic_first_post_id = COALESCE(topic_first_post_id, $2), \
                topic_last_post_id = $2, topic_last_post_time = $3 \
             WHERE topic_id = $1",
        )
        .bind(post.topic_id)
        .bind(post_id)
        .bind(post.time)
        .execute(&self.pool)
        .await?;

        Ok(post_id)
    }

    async fn update(&self, post: &Post) -> StoreResult<()> {
        sqlx::query(
            "UPDATE posts SET post_subject = $2, post_text = $3, post_edit_time = $4, \
                post_edit_count = $5, post_deleted = $6, post_delete_user = $7 \
             WHERE post_id = $1",
        )
        .bind(post.id)
        .bind(&post.subject)
        .bind(&post.text)
        .bind(post.edit_time)
        .bind(post.edit_count)
        .bind(post.deleted_time)
        .bind(post.deleted_user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
