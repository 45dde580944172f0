use std::sync::Arc;

use crate::auth::session::Actor;
use crate::models::contrib::{Contribution, Revision};
use crate::models::post::{NewPost, PostOrder, Topic, reply_subject};
use crate::models::queue::QueueItem;
use crate::store::{ContribStore, PostStore, QueueStore};

use super::action::{AnyAction, OpenAction, PostingAction, QueueAction};
use super::auth::{can_validate, check_auth};
use super::error::QueueError;
use super::posting::{Posting, PostingOutcome, PostingRequest, submission_errors};
use super::view::{
    ActionInput, ActionLink, Breadcrumb, FormPhase, ItemView, MoveView, Outcome, Page, PostFormMode,
    PostFormView, ValidateView,
};
use super::{hooks, lang, now};

/// Stores the queue workflow reads and writes.
#[derive(Clone)]
pub struct QueueServices {
    pub queue: Arc<dyn QueueStore>,
    pub contribs: Arc<dyn ContribStore>,
    pub posts: Arc<dyn PostStore>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowSettings {
    pub allow_self_validation: bool,
}

/// One request's view of the queue: the acting user plus the stores.
pub struct QueueWorkflow<'a> {
    services: &'a QueueServices,
    settings: WorkflowSettings,
    actor: &'a Actor,
}

impl<'a> QueueWorkflow<'a> {
    pub fn new(services: &'a QueueServices, settings: WorkflowSettings, actor: &'a Actor) -> Self {
        Self {
            services,
            settings,
            actor,
        }
    }

    /// Item summary with its discussion. `tag` is the queue tag the user came
    /// from, used for the breadcrumb.
    pub async fn display_item(&self, id: i64, tag: Option<i64>) -> Result<Outcome, QueueError> {
        let (item, contrib) = self.load(id).await?;

        if !check_auth(self.actor, &contrib, None, self.settings.allow_self_validation) {
            log::warn!("User {:?} denied view of queue item {id}", self.actor.user_id);
            return Ok(Outcome::NeedsAuth);
        }

        let topic = self.topic(&item).await?;
        let validator = can_validate(self.actor, &contrib);
        let posts = self
            .services
            .posts
            .posts(topic.id, PostOrder::OldestFirst, validator)
            .await?;
        let revision = self.services.contribs.revision(item.revision_id).await?;

        let tags = self.services.queue.tags().await?;
        let current_tag = if item.is_open() {
            tags.get(&i64::from(item.status)).cloned()
        } else {
            None
        };
        let move_targets = tags
            .values()
            .filter(|t| t.id != i64::from(item.status))
            .cloned()
            .collect();
        let breadcrumb = tag.and_then(|t| tags.get(&t)).map(|t| Breadcrumb {
            name: t.name.clone(),
            url: item.url_with_tag(t.id),
        });

        let actions = self.available_actions(&item, &contrib);

        Ok(Outcome::Page(Page::Item(Box::new(ItemView {
            title: topic.subject.clone(),
            item,
            contrib,
            revision,
            topic,
            posts,
            current_tag,
            move_targets,
            breadcrumb,
            actions,
        }))))
    }

    /// Run `action` against the item. Unknown names, and open-only actions on a
    /// closed item, are rejected after authorisation without touching state.
    pub async fn item_action(&self, id: i64, action: &str, input: &ActionInput) -> Result<Outcome, QueueError> {
        let (mut item, contrib) = self.load(id).await?;
        let parsed = action.parse::<QueueAction>().ok();

        if !check_auth(self.actor, &contrib, parsed, self.settings.allow_self_validation) {
            log::warn!(
                "User {:?} denied action '{action}' on queue item {id}",
                self.actor.user_id
            );
            return Ok(Outcome::NeedsAuth);
        }

        let Some(user_id) = self.actor.user_id else {
            return Ok(Outcome::NeedsAuth);
        };

        match parsed {
            Some(QueueAction::Open(open)) if item.is_open() => {
                self.open_action(open, &mut item, &contrib, user_id, input).await
            }
            Some(QueueAction::Any(AnyAction::Rebuild)) => {
                if !input.is_confirmed() {
                    return Err(QueueError::LinkInvalid);
                }
                self.rebuild(&item, &contrib).await?;
                Ok(Outcome::Redirect(item.url()))
            }
            Some(QueueAction::Any(AnyAction::Posting(posting))) => {
                self.posting(posting, &item, &contrib, input).await
            }
            _ => Err(QueueError::InvalidAction(action.to_string())),
        }
    }

    async fn open_action(
        &self,
        action: OpenAction,
        item: &mut QueueItem,
        contrib: &Contribution,
        user_id: i64,
        input: &ActionInput,
    ) -> Result<Outcome, QueueError> {
        if action.is_one_click() && !input.is_confirmed() {
            log::warn!("Queue item {} action {} without a valid link hash", item.id, action.name());
            return Err(QueueError::LinkInvalid);
        }

        let reply = match action {
            OpenAction::InProgress => {
                item.mark_in_progress(user_id, now());
                lang::REPLY_IN_PROGRESS.to_string()
            }
            OpenAction::NoProgress => {
                item.clear_progress();
                lang::REPLY_NO_PROGRESS.to_string()
            }
            OpenAction::Tested => {
                item.set_tested(true);
                lang::REPLY_TESTED.to_string()
            }
            OpenAction::NotTested => {
                item.set_tested(false);
                lang::REPLY_NOT_TESTED.to_string()
            }
            OpenAction::Move => return self.move_item(item, user_id, input).await,
            OpenAction::AllowAuthorRepack => {
                return self.allow_author_repack(item, contrib, user_id, input).await;
            }
            OpenAction::Approve | OpenAction::Deny => {
                return self.validate(action, item, contrib, user_id, input).await;
            }
        };

        self.services.queue.save(item).await?;
        let topic = self.topic(item).await?;
        self.topic_reply(&topic, user_id, reply).await?;
        log::info!("Queue item {} marked {} by user {user_id}", item.id, action.name());
        Ok(Outcome::Redirect(item.url()))
    }

    async fn move_item(&self, item: &mut QueueItem, user_id: i64, input: &ActionInput) -> Result<Outcome, QueueError> {
        let tags = self.services.queue.tags().await?;

        if !input.is_confirmed() {
            return Ok(Outcome::Page(Page::Move(MoveView {
                title: lang::MOVE_QUEUE.to_string(),
                explain: lang::MOVE_QUEUE_CONFIRM,
                item_url: item.url(),
                confirm_url: item.action_url(OpenAction::Move.name()),
                current_status: item.status,
                tags: tags.into_values().collect(),
            })));
        }

        let target = input.tag_id.unwrap_or(0);
        let Some(to) = tags.get(&target) else {
            return Err(QueueError::NoSuchTag(target));
        };
        let from = tags
            .get(&i64::from(item.status))
            .map(|t| t.name.as_str())
            .unwrap_or_default();
        let reply = lang::reply_moved(from, &to.name);

        item.move_to(target).map_err(QueueError::NoSuchTag)?;
        self.services.queue.save(item).await?;
        let topic = self.topic(item).await?;
        self.topic_reply(&topic, user_id, reply).await?;
        log::info!("Queue item {} moved to tag {target} by user {user_id}", item.id);
        Ok(Outcome::Redirect(item.url()))
    }

    async fn allow_author_repack(
        &self,
        item: &mut QueueItem,
        contrib: &Contribution,
        user_id: i64,
        input: &ActionInput,
    ) -> Result<Outcome, QueueError> {
        let topic = self.topic(item).await?;
        let subject = reply_subject(&topic.subject);

        let mut errors = Vec::new();
        if let FormPhase::Submitted { token_valid } = input.phase {
            errors = submission_errors(token_valid, &input.message);
            if errors.is_empty() {
                item.allow_author_repack = true;

                let text = format!(
                    "{}\n\n[url={}]{}[/url]",
                    input.message,
                    contrib.repack_url(item.revision_id),
                    lang::AUTHOR_REPACK_LINK
                );
                self.services
                    .posts
                    .insert(&NewPost {
                        topic_id: topic.id,
                        user_id,
                        subject,
                        text,
                        time: now(),
                    })
                    .await?;
                self.services.queue.save(item).await?;
                self.topic_reply(&topic, user_id, lang::REPLY_ALLOW_REPACK.to_string())
                    .await?;

                log::info!(
                    "Author repack allowed on queue item {} (revision {}) by user {user_id}",
                    item.id,
                    item.revision_id
                );
                return Ok(Outcome::Redirect(item.url()));
            }
        }

        Ok(Outcome::Page(Page::PostForm(PostFormView {
            title: lang::DISCUSSION_REPLY_MESSAGE.to_string(),
            heading: contrib.name.clone(),
            subject,
            message: input.message.clone(),
            errors,
            action_url: item.action_url(OpenAction::AllowAuthorRepack.name()),
            post_id: None,
            mode: PostFormMode::Compose,
        })))
    }

    /// Approve / deny: form first, verdict on a submission with a valid key.
    async fn validate(
        &self,
        action: OpenAction,
        item: &mut QueueItem,
        contrib: &Contribution,
        user_id: i64,
        input: &ActionInput,
    ) -> Result<Outcome, QueueError> {
        let approve = action == OpenAction::Approve;

        let mut errors = Vec::new();
        match input.phase {
            FormPhase::Submitted { token_valid: true } => {
                let notes = input.message.trim();
                let reply = if approve {
                    item.approve(notes, Some(user_id), now());
                    lang::reply_approved(notes)
                } else {
                    item.deny(notes, Some(user_id), now());
                    lang::reply_denied(notes)
                };
                self.services.queue.save(item).await?;

                let topic = self.topic(item).await?;
                self.topic_reply(&topic, user_id, reply).await?;

                let contribs = self.services.contribs.as_ref();
                if approve {
                    hooks::on_approve(contribs, contrib, item).await?;
                } else {
                    hooks::on_deny(contribs, contrib, item).await?;
                }

                log::info!("Queue item {} {} by user {user_id}", item.id, item.status_label());
                return Ok(Outcome::Redirect(item.url()));
            }
            FormPhase::Submitted { token_valid: false } => errors.push(lang::FORM_INVALID.to_string()),
            FormPhase::Display | FormPhase::QuickLink { .. } => {}
        }

        let review = self
            .services
            .posts
            .posts(item.topic_id, PostOrder::NewestFirst, false)
            .await?;
        let (verb, explain) = if approve {
            (lang::APPROVE_QUEUE, lang::APPROVE_QUEUE_CONFIRM)
        } else {
            (lang::DENY_QUEUE, lang::DENY_QUEUE_CONFIRM)
        };

        Ok(Outcome::Page(Page::Validate(ValidateView {
            action,
            title: format!("{verb} - {}", contrib.name),
            explain,
            contrib_name: contrib.name.clone(),
            message: input.message.clone(),
            errors,
            confirm_url: item.action_url(action.name()),
            review_title: lang::QUEUE_REVIEW,
            review,
        })))
    }

    /// Regenerate the topic's first post from the revision and submission notes.
    async fn rebuild(&self, item: &QueueItem, contrib: &Contribution) -> Result<(), QueueError> {
        let topic = self.topic(item).await?;
        let revision = self.services.contribs.revision(item.revision_id).await?;
        let text = first_post_text(contrib, revision.as_ref(), item);

        let existing = match topic.first_post_id {
            Some(post_id) => self.services.posts.post(post_id).await?,
            None => None,
        };

        match existing {
            Some(mut post) => {
                post.text = text;
                self.services.posts.update(&post).await?;
            }
            None => {
                self.services
                    .posts
                    .insert(&NewPost {
                        topic_id: topic.id,
                        user_id: item.submitter_user_id,
                        subject: topic.subject.clone(),
                        text,
                        time: item.submit_time,
                    })
                    .await?;
            }
        }

        log::info!("Rebuilt first post of queue item {}", item.id);
        Ok(())
    }

    async fn posting(
        &self,
        action: PostingAction,
        item: &QueueItem,
        contrib: &Contribution,
        input: &ActionInput,
    ) -> Result<Outcome, QueueError> {
        let topic = self.topic(item).await?;
        let request = PostingRequest {
            actor: self.actor,
            action,
            topic: &topic,
            parent_type: item.queue_type,
            item_id: item.id,
            input,
            action_url: item.action_url(action.name()),
            can_moderate: can_validate(self.actor, contrib),
        };

        let outcome = Posting::new(self.services.posts.as_ref()).act(&request).await?;
        Ok(match outcome {
            PostingOutcome::NeedsAuth => Outcome::NeedsAuth,
            PostingOutcome::Form(form) => Outcome::Page(Page::PostForm(form)),
            PostingOutcome::Done => Outcome::Redirect(item.url()),
        })
    }

    fn available_actions(&self, item: &QueueItem, contrib: &Contribution) -> Vec<ActionLink> {
        let allow_self = self.settings.allow_self_validation;
        let mut links = Vec::new();

        if item.is_open() {
            for action in OpenAction::ALL {
                let applicable = match action {
                    OpenAction::InProgress => item.progress_user_id.is_none(),
                    OpenAction::NoProgress => item.progress_user_id.is_some(),
                    OpenAction::Tested => !item.tested,
                    OpenAction::NotTested => item.tested,
                    OpenAction::AllowAuthorRepack => !item.allow_author_repack,
                    OpenAction::Move | OpenAction::Approve | OpenAction::Deny => true,
                };
                if applicable && check_auth(self.actor, contrib, Some(QueueAction::Open(action)), allow_self) {
                    links.push(ActionLink {
                        name: action.name(),
                        label: open_action_label(action),
                        url: item.action_url(action.name()),
                        quick: action.is_one_click(),
                    });
                }
            }
        }

        if self.actor.is_registered() {
            links.push(ActionLink {
                name: PostingAction::Reply.name(),
                label: "Reply",
                url: item.action_url(PostingAction::Reply.name()),
                quick: false,
            });
        }
        if can_validate(self.actor, contrib) {
            links.push(ActionLink {
                name: "rebuild",
                label: "Rebuild first post",
                url: item.action_url("rebuild"),
                quick: true,
            });
        }
        links
    }

    async fn load(&self, id: i64) -> Result<(QueueItem, Contribution), QueueError> {
        let item = self
            .services
            .queue
            .load(id)
            .await?
            .ok_or(QueueError::NotFound(id))?;
        let contrib = self
            .services
            .contribs
            .load(item.contrib_id, self.actor.user_id)
            .await?
            .ok_or(QueueError::ContribNotFound(item.contrib_id))?;
        Ok((item, contrib))
    }

    async fn topic(&self, item: &QueueItem) -> Result<Topic, QueueError> {
        self.services
            .posts
            .topic(item.topic_id)
            .await?
            .ok_or(QueueError::TopicNotFound(item.topic_id))
    }

    async fn topic_reply(&self, topic: &Topic, user_id: i64, text: String) -> Result<i64, QueueError> {
        let id = self
            .services
            .posts
            .insert(&NewPost {
                topic_id: topic.id,
                user_id,
                subject: reply_subject(&topic.subject),
                text,
                time: now(),
            })
            .await?;
        Ok(id)
    }
}

fn open_action_label(action: OpenAction) -> &'static str {
    match action {
        OpenAction::InProgress => "Mark in progress",
        OpenAction::NoProgress => "Remove in progress",
        OpenAction::Tested => "Mark tested",
        OpenAction::NotTested => "Mark not tested",
        OpenAction::Move => "Move",
        OpenAction::AllowAuthorRepack => "Allow author repack",
        OpenAction::Approve => lang::APPROVE_QUEUE,
        OpenAction::Deny => lang::DENY_QUEUE,
    }
}

/// Body of a queue topic's first post.
pub fn first_post_text(contrib: &Contribution, revision: Option<&Revision>, item: &QueueItem) -> String {
    let mut text = format!("[b]{}[/b] ({})", contrib.name, contrib.contrib_type);
    if let Some(rev) = revision {
        text.push_str(&format!("\nRevision: {}", rev.version));
        if !rev.name.is_empty() {
            text.push_str(&format!(" ({})", rev.name));
        }
    }
    text.push_str(&format!("\n[url={}]{}[/url]", contrib.url(), contrib.url()));

    let notes = item.notes.trim();
    if !notes.is_empty() {
        text.push_str("\n\n[quote]");
        text.push_str(notes);
        text.push_str("[/quote]");
    }
    text
}
