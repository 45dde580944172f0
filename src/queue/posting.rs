//! Discussion posting on a queue topic: reply, quote, edit, quick edit,
//! delete and undelete, each as a display-then-submit form.

use crate::auth::session::Actor;
use crate::auth::validate::validate_message;
use crate::models::contrib::ContribType;
use crate::models::post::{NewPost, Post, Topic, reply_subject};
use crate::store::PostStore;

use super::action::PostingAction;
use super::error::QueueError;
use super::lang;
use super::now;
use super::view::{ActionInput, FormPhase, PostFormMode, PostFormView};

pub struct PostingRequest<'a> {
    pub actor: &'a Actor,
    pub action: PostingAction,
    pub topic: &'a Topic,
    /// Queue (contribution type) the discussion belongs to.
    pub parent_type: ContribType,
    pub item_id: i64,
    pub input: &'a ActionInput,
    pub action_url: String,
    /// Actor holds validate on the parent type and may moderate posts.
    pub can_moderate: bool,
}

#[derive(Debug)]
pub enum PostingOutcome {
    NeedsAuth,
    Form(PostFormView),
    Done,
}

pub struct Posting<'a> {
    posts: &'a dyn PostStore,
}

impl<'a> Posting<'a> {
    pub fn new(posts: &'a dyn PostStore) -> Self {
        Self { posts }
    }

    pub async fn act(&self, req: &PostingRequest<'_>) -> Result<PostingOutcome, QueueError> {
        let Some(user_id) = req.actor.user_id else {
            return Ok(PostingOutcome::NeedsAuth);
        };

        match req.action {
            PostingAction::Reply => self.compose(req, user_id, String::new()).await,
            PostingAction::Quote => {
                let post = self.load_post(req).await?;
                if post.is_deleted() && !req.can_moderate {
                    return Ok(PostingOutcome::NeedsAuth);
                }
                self.compose(req, user_id, quote_text(&post)).await
            }
            PostingAction::Edit | PostingAction::QuickEdit => {
                let post = self.load_post(req).await?;
                let own = post.user_id == user_id;
                if !(own || req.can_moderate) || (post.is_deleted() && !req.can_moderate) {
                    return Ok(PostingOutcome::NeedsAuth);
                }
                self.edit(req, post).await
            }
            PostingAction::Delete => {
                let post = self.load_post(req).await?;
                if !(post.user_id == user_id || req.can_moderate) {
                    return Ok(PostingOutcome::NeedsAuth);
                }
                if post.is_deleted() {
                    return Ok(PostingOutcome::Done);
                }
                self.confirm(req, post, user_id).await
            }
            PostingAction::Undelete => {
                if !req.can_moderate {
                    return Ok(PostingOutcome::NeedsAuth);
                }
                let post = self.load_post(req).await?;
                if !post.is_deleted() {
                    return Ok(PostingOutcome::Done);
                }
                self.confirm(req, post, user_id).await
            }
        }
    }

    async fn load_post(&self, req: &PostingRequest<'_>) -> Result<Post, QueueError> {
        let id = req.input.post_id.unwrap_or(0);
        match self.posts.post(id).await? {
            Some(post) if post.topic_id == req.topic.id => Ok(post),
            _ => Err(QueueError::PostNotFound(id)),
        }
    }

    async fn compose(
        &self,
        req: &PostingRequest<'_>,
        user_id: i64,
        prefill: String,
    ) -> Result<PostingOutcome, QueueError> {
        let subject = reply_subject(&req.topic.subject);

        let mut errors = Vec::new();
        if let FormPhase::Submitted { token_valid } = req.input.phase {
            errors = submission_errors(token_valid, &req.input.message);
            if errors.is_empty() {
                let post_id = self
                    .posts
                    .insert(&NewPost {
                        topic_id: req.topic.id,
                        user_id,
                        subject,
                        text: req.input.message.clone(),
                        time: now(),
                    })
                    .await?;
                log::info!(
                    "User {user_id} posted {post_id} in {} queue item {}",
                    req.parent_type,
                    req.item_id
                );
                return Ok(PostingOutcome::Done);
            }
        }

        let message = if req.input.phase == FormPhase::Display || errors.is_empty() {
            if prefill.is_empty() { req.input.message.clone() } else { prefill }
        } else {
            req.input.message.clone()
        };

        Ok(PostingOutcome::Form(PostFormView {
            title: lang::DISCUSSION_REPLY_MESSAGE.to_string(),
            heading: format!("{} validation discussion", req.parent_type),
            subject,
            message,
            errors,
            action_url: req.action_url.clone(),
            post_id: req.input.post_id,
            mode: PostFormMode::Compose,
        }))
    }

    async fn edit(&self, req: &PostingRequest<'_>, mut post: Post) -> Result<PostingOutcome, QueueError> {
        let mut errors = Vec::new();
        if let FormPhase::Submitted { token_valid } = req.input.phase {
            errors = submission_errors(token_valid, &req.input.message);
            if errors.is_empty() {
                post.text = req.input.message.clone();
                post.edit_time = Some(now());
                post.edit_count += 1;
                self.posts.update(&post).await?;
                log::info!("Post {} edited in queue item {}", post.id, req.item_id);
                return Ok(PostingOutcome::Done);
            }
        }

        let message = if errors.is_empty() { post.text.clone() } else { req.input.message.clone() };
        let mode = if req.action == PostingAction::QuickEdit {
            PostFormMode::QuickEdit
        } else {
            PostFormMode::Edit
        };

        Ok(PostingOutcome::Form(PostFormView {
            title: format!("Edit post - {}", post.subject),
            heading: format!("{} validation discussion", req.parent_type),
            subject: post.subject,
            message,
            errors,
            action_url: req.action_url.clone(),
            post_id: Some(post.id),
            mode,
        }))
    }

    /// Delete / undelete: a confirmation form, then a soft-delete toggle.
    async fn confirm(
        &self,
        req: &PostingRequest<'_>,
        mut post: Post,
        user_id: i64,
    ) -> Result<PostingOutcome, QueueError> {
        let mut errors = Vec::new();
        if let FormPhase::Submitted { token_valid } = req.input.phase {
            if token_valid {
                if req.action == PostingAction::Delete {
                    post.deleted_time = Some(now());
                    post.deleted_user_id = Some(user_id);
                } else {
                    post.deleted_time = None;
                    post.deleted_user_id = None;
                }
                self.posts.update(&post).await?;
                log::info!(
                    "Post {} {} by user {user_id} in queue item {}",
                    post.id,
                    if post.is_deleted() { "deleted" } else { "restored" },
                    req.item_id
                );
                return Ok(PostingOutcome::Done);
            }
            errors.push(lang::FORM_INVALID.to_string());
        }

        let explain = if req.action == PostingAction::Delete {
            lang::DELETE_POST_CONFIRM
        } else {
            lang::UNDELETE_POST_CONFIRM
        };

        Ok(PostingOutcome::Form(PostFormView {
            title: explain.to_string(),
            heading: format!("{} validation discussion", req.parent_type),
            subject: post.subject,
            message: post.text,
            errors,
            action_url: req.action_url.clone(),
            post_id: Some(post.id),
            mode: PostFormMode::Confirm,
        }))
    }
}

/// Errors for a submitted message form; empty when it may be stored.
pub(crate) fn submission_errors(token_valid: bool, message: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !token_valid {
        errors.push(lang::FORM_INVALID.to_string());
    }
    if let Some(e) = validate_message(message) {
        errors.push(e);
    }
    errors
}

pub fn quote_text(post: &Post) -> String {
    format!("[quote=\"{}\"]{}[/quote]\n", post.username, post.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_wraps_poster_and_text() {
        let post = Post {
            id: 1,
            topic_id: 1,
            user_id: 3,
            username: "validator".into(),
            subject: "Re: x".into(),
            text: "Please fix the install file".into(),
            time: 0,
            edit_time: None,
            edit_count: 0,
            deleted_time: None,
            deleted_user_id: None,
        };
        assert_eq!(
            quote_text(&post),
            "[quote=\"validator\"]Please fix the install file[/quote]\n"
        );
    }

    #[test]
    fn submission_errors_collects_every_problem() {
        assert!(submission_errors(true, "ok").is_empty());
        assert_eq!(submission_errors(false, "ok"), vec![lang::FORM_INVALID.to_string()]);
        assert_eq!(submission_errors(false, " ").len(), 2);
    }
}
