use chrono::DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub id: i64,
    pub subject: String,
    pub first_post_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: i64,
    pub username: String,
    pub subject: String,
    pub text: String,
    pub time: i64,
    pub edit_time: Option<i64>,
    pub edit_count: i32,
    pub deleted_time: Option<i64>,
    pub deleted_user_id: Option<i64>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_time.is_some()
    }

    pub fn posted_at(&self) -> String {
        format_time(self.time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub topic_id: i64,
    pub user_id: i64,
    pub subject: String,
    pub text: String,
    pub time: i64,
}

/// Subject used for replies in a topic.
pub fn reply_subject(topic_subject: &str) -> String {
    format!("Re: {topic_subject}")
}

/// Render a unix timestamp the way the board shows dates.
pub fn format_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}
