use askama::Template;

use crate::queue::view::{ItemView, MoveView, PostFormView, ValidateView};
use super::PageContext;

#[derive(Template)]
#[template(path = "manage/queue.html")]
pub struct QueueItemTemplate {
    pub ctx: PageContext,
    pub view: ItemView,
}

#[derive(Template)]
#[template(path = "manage/queue_move.html")]
pub struct QueueMoveTemplate {
    pub ctx: PageContext,
    pub view: MoveView,
}

#[derive(Template)]
#[template(path = "manage/queue_validate.html")]
pub struct QueueValidateTemplate {
    pub ctx: PageContext,
    pub view: ValidateView,
}

#[derive(Template)]
#[template(path = "manage/queue_post.html")]
pub struct QueuePostTemplate {
    pub ctx: PageContext,
    pub view: PostFormView,
}
