use crate::models::contrib::ContribType;

/// Item closed without a verdict.
pub const QUEUE_CLOSED: i32 = 0;
pub const QUEUE_DENIED: i32 = -1;
pub const QUEUE_APPROVED: i32 = -2;

/// A tag (column) of the validation queue. Open items carry the id of the
/// tag they sit in as their status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub id: i64,
    pub contrib_id: i64,
    pub revision_id: i64,
    pub queue_type: ContribType,
    /// Positive: open, in the tag with this id. Zero or negative: closed.
    pub status: i32,
    pub tested: bool,
    pub allow_author_repack: bool,
    pub topic_id: i64,
    pub progress_user_id: Option<i64>,
    pub progress_time: Option<i64>,
    pub submitter_user_id: i64,
    pub submit_time: i64,
    pub notes: String,
    pub validation_notes: String,
    pub close_time: Option<i64>,
    pub close_user_id: Option<i64>,
}

impl QueueItem {
    pub fn is_open(&self) -> bool {
        self.status > 0
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            QUEUE_APPROVED => "Approved",
            QUEUE_DENIED => "Denied",
            s if s > 0 => "Open",
            _ => "Closed",
        }
    }

    pub fn url(&self) -> String {
        format!("/manage/queue/item/{}", self.id)
    }

    pub fn url_with_tag(&self, tag_id: i64) -> String {
        format!("{}?tag={}", self.url(), tag_id)
    }

    pub fn action_url(&self, action: &str) -> String {
        format!("{}/action/{}", self.url(), action)
    }

    pub fn mark_in_progress(&mut self, user_id: i64, now: i64) {
        self.progress_user_id = Some(user_id);
        self.progress_time = Some(now);
    }

    pub fn clear_progress(&mut self) {
        self.progress_user_id = None;
        self.progress_time = None;
    }

    pub fn set_tested(&mut self, tested: bool) {
        self.tested = tested;
    }

    /// Move the item into tag `tag_id`. Fails without touching the item when
    /// the id does not fit the status column or is not a tag id.
    pub fn move_to(&mut self, tag_id: i64) -> Result<(), i64> {
        match i32::try_from(tag_id) {
            Ok(status) if status > 0 => {
                self.status = status;
                Ok(())
            }
            _ => Err(tag_id),
        }
    }

    pub fn approve(&mut self, notes: &str, user_id: Option<i64>, now: i64) {
        self.close(QUEUE_APPROVED, notes, user_id, now);
    }

    pub fn deny(&mut self, notes: &str, user_id: Option<i64>, now: i64) {
        self.close(QUEUE_DENIED, notes, user_id, now);
    }

    fn close(&mut self, status: i32, notes: &str, user_id: Option<i64>, now: i64) {
        self.status = status;
        self.validation_notes = notes.to_string();
        self.close_time = Some(now);
        self.close_user_id = user_id;
        self.clear_progress();
    }
}
