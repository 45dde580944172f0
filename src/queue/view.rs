//! What the workflow hands back to the HTTP layer: either a redirect, a
//! needs-auth signal, or one of the page models below for rendering.

use crate::models::contrib::{Contribution, Revision};
use crate::models::post::{Post, Topic};
use crate::models::queue::{QueueItem, QueueTag};

use super::action::OpenAction;

/// Where a two-phase form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// First request; nothing submitted.
    Display,
    /// Form posted back, with the anti-forgery check result.
    Submitted { token_valid: bool },
    /// One-click link carrying a link hash.
    QuickLink { hash_valid: bool },
}

/// Request data an action may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInput {
    pub phase: FormPhase,
    pub message: String,
    /// Destination tag for `move`.
    pub tag_id: Option<i64>,
    /// Target post for quote / edit / delete / undelete.
    pub post_id: Option<i64>,
}

impl ActionInput {
    pub fn display() -> Self {
        ActionInput {
            phase: FormPhase::Display,
            message: String::new(),
            tag_id: None,
            post_id: None,
        }
    }

    pub fn submitted(token_valid: bool, message: impl Into<String>) -> Self {
        ActionInput {
            phase: FormPhase::Submitted { token_valid },
            message: message.into(),
            ..ActionInput::display()
        }
    }

    pub fn quick_link(hash_valid: bool) -> Self {
        ActionInput {
            phase: FormPhase::QuickLink { hash_valid },
            ..ActionInput::display()
        }
    }

    pub fn with_tag(mut self, tag_id: i64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn with_post(mut self, post_id: i64) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Submitted with a valid form key, or followed a valid quick link.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.phase,
            FormPhase::Submitted { token_valid: true } | FormPhase::QuickLink { hash_valid: true }
        )
    }
}

#[derive(Debug)]
pub enum Outcome {
    Redirect(String),
    NeedsAuth,
    Page(Page),
}

#[derive(Debug)]
pub enum Page {
    Item(Box<ItemView>),
    Move(MoveView),
    Validate(ValidateView),
    PostForm(PostFormView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLink {
    pub name: &'static str,
    pub label: &'static str,
    pub url: String,
    /// Runs on click, so the link must carry the quick action hash.
    pub quick: bool,
}

#[derive(Debug)]
pub struct ItemView {
    pub title: String,
    pub item: QueueItem,
    pub contrib: Contribution,
    pub revision: Option<Revision>,
    pub topic: Topic,
    pub posts: Vec<Post>,
    pub current_tag: Option<QueueTag>,
    pub move_targets: Vec<QueueTag>,
    pub breadcrumb: Option<Breadcrumb>,
    pub actions: Vec<ActionLink>,
}

#[derive(Debug)]
pub struct MoveView {
    pub title: String,
    pub explain: &'static str,
    pub item_url: String,
    pub confirm_url: String,
    pub current_status: i32,
    pub tags: Vec<QueueTag>,
}

#[derive(Debug)]
pub struct ValidateView {
    pub action: OpenAction,
    pub title: String,
    pub explain: &'static str,
    pub contrib_name: String,
    pub message: String,
    pub errors: Vec<String>,
    pub confirm_url: String,
    pub review_title: &'static str,
    /// Discussion posts, newest first.
    pub review: Vec<Post>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFormMode {
    Compose,
    Edit,
    QuickEdit,
    Confirm,
}

#[derive(Debug)]
pub struct PostFormView {
    pub title: String,
    pub heading: String,
    pub subject: String,
    pub message: String,
    pub errors: Vec<String>,
    pub action_url: String,
    pub post_id: Option<i64>,
    pub mode: PostFormMode,
}

impl PostFormView {
    pub fn is_confirm(&self) -> bool {
        self.mode == PostFormMode::Confirm
    }

    pub fn is_quick(&self) -> bool {
        self.mode == PostFormMode::QuickEdit
    }
}
