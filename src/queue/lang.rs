//! User-facing strings of the queue pages and the system replies posted to
//! queue discussion topics.

pub const NO_QUEUE_ITEM: &str = "The requested queue item does not exist.";
pub const NO_CONTRIB: &str = "The contribution of this queue item does not exist.";
pub const NO_TOPIC: &str = "The discussion topic of this queue item does not exist.";
pub const NO_POST: &str = "The requested post does not exist.";
pub const INVALID_ACTION: &str = "Invalid action.";
pub const NO_TAG: &str = "The selected tag does not exist.";
pub const FORM_INVALID: &str = "The submitted form was invalid. Try submitting again.";

pub const MOVE_QUEUE: &str = "Move queue item";
pub const MOVE_QUEUE_CONFIRM: &str = "Select the tag this queue item should be moved to.";
pub const APPROVE_QUEUE: &str = "Approve";
pub const DENY_QUEUE: &str = "Deny";
pub const APPROVE_QUEUE_CONFIRM: &str = "Are you sure you want to approve this revision? Enter any notes for the author below.";
pub const DENY_QUEUE_CONFIRM: &str = "Are you sure you want to deny this revision? Explain the reasons to the author below.";
pub const QUEUE_REVIEW: &str = "Queue discussion review";
pub const DISCUSSION_REPLY_MESSAGE: &str = "Reply to queue discussion";
pub const AUTHOR_REPACK_LINK: &str = "Click here to repack the revision";
pub const DELETE_POST_CONFIRM: &str = "Are you sure you want to delete this post?";
pub const UNDELETE_POST_CONFIRM: &str = "Are you sure you want to restore this post?";

pub const REPLY_IN_PROGRESS: &str = "Marked as in-progress.";
pub const REPLY_NO_PROGRESS: &str = "Removed from in-progress.";
pub const REPLY_TESTED: &str = "Marked as tested.";
pub const REPLY_NOT_TESTED: &str = "Marked as not tested.";
pub const REPLY_ALLOW_REPACK: &str = "The author has been allowed to repack this revision.";

pub fn reply_moved(from: &str, to: &str) -> String {
    format!("Moved from \"{from}\" to \"{to}\".")
}

pub fn reply_approved(notes: &str) -> String {
    with_notes("[b]Approved.[/b]", notes)
}

pub fn reply_denied(notes: &str) -> String {
    with_notes("[b]Denied.[/b]", notes)
}

fn with_notes(head: &str, notes: &str) -> String {
    let notes = notes.trim();
    if notes.is_empty() {
        head.to_string()
    } else {
        format!("{head}\n\n{notes}")
    }
}
