use std::fmt;

use actix_web::http::StatusCode;

use super::lang;
use crate::store::StoreError;

#[derive(Debug)]
pub enum QueueError {
    NotFound(i64),
    ContribNotFound(i64),
    TopicNotFound(i64),
    PostNotFound(i64),
    InvalidAction(String),
    NoSuchTag(i64),
    /// One-click action without a valid link hash or form key.
    LinkInvalid,
    Store(StoreError),
}

impl QueueError {
    /// Language key shown on the error page.
    pub fn code(&self) -> &'static str {
        match self {
            QueueError::NotFound(_) => "NO_QUEUE_ITEM",
            QueueError::ContribNotFound(_) => "NO_CONTRIB",
            QueueError::TopicNotFound(_) => "NO_TOPIC",
            QueueError::PostNotFound(_) => "NO_POST",
            QueueError::InvalidAction(_) => "INVALID_ACTION",
            QueueError::NoSuchTag(_) => "NO_TAG",
            QueueError::LinkInvalid => "FORM_INVALID",
            QueueError::Store(_) => "GENERAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            QueueError::NoSuchTag(_) | QueueError::LinkInvalid => StatusCode::BAD_REQUEST,
            QueueError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::NOT_FOUND,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, QueueError::Store(_))
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::NotFound(_) => f.write_str(lang::NO_QUEUE_ITEM),
            QueueError::ContribNotFound(_) => f.write_str(lang::NO_CONTRIB),
            QueueError::TopicNotFound(_) => f.write_str(lang::NO_TOPIC),
            QueueError::PostNotFound(_) => f.write_str(lang::NO_POST),
            QueueError::InvalidAction(_) => f.write_str(lang::INVALID_ACTION),
            QueueError::NoSuchTag(_) => f.write_str(lang::NO_TAG),
            QueueError::LinkInvalid => f.write_str(lang::FORM_INVALID),
            QueueError::Store(e) => write!(f, "Queue store error: {e}"),
        }
    }
}

impl std::error::Error for QueueError {}

impl From<StoreError> for QueueError {
    fn from(e: StoreError) -> Self {
        QueueError::Store(e)
    }
}
