use std::fmt;
use std::str::FromStr;

/// Actions that only run while the item is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAction {
    InProgress,
    NoProgress,
    Tested,
    NotTested,
    Move,
    AllowAuthorRepack,
    Approve,
    Deny,
}

/// Discussion actions handed to the posting helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingAction {
    Reply,
    Quote,
    Edit,
    QuickEdit,
    Delete,
    Undelete,
}

/// Actions valid whatever the item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyAction {
    Rebuild,
    Posting(PostingAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    Open(OpenAction),
    Any(AnyAction),
}

impl OpenAction {
    pub const ALL: [OpenAction; 8] = [
        OpenAction::InProgress,
        OpenAction::NoProgress,
        OpenAction::Tested,
        OpenAction::NotTested,
        OpenAction::Move,
        OpenAction::AllowAuthorRepack,
        OpenAction::Approve,
        OpenAction::Deny,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OpenAction::InProgress => "in_progress",
            OpenAction::NoProgress => "no_progress",
            OpenAction::Tested => "tested",
            OpenAction::NotTested => "not_tested",
            OpenAction::Move => "move",
            OpenAction::AllowAuthorRepack => "allow_author_repack",
            OpenAction::Approve => "approve",
            OpenAction::Deny => "deny",
        }
    }
    /// State changes that run straight from a link, with no form of their own.
    pub fn is_one_click(self) -> bool {
        matches!(
            self,
            OpenAction::InProgress | OpenAction::NoProgress | OpenAction::Tested | OpenAction::NotTested
        )
    }
}

impl PostingAction {
    pub const ALL: [PostingAction; 6] = [
        PostingAction::Reply,
        PostingAction::Quote,
        PostingAction::Edit,
        PostingAction::QuickEdit,
        PostingAction::Delete,
        PostingAction::Undelete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PostingAction::Reply => "reply",
            PostingAction::Quote => "quote",
            PostingAction::Edit => "edit",
            PostingAction::QuickEdit => "quick_edit",
            PostingAction::Delete => "delete",
            PostingAction::Undelete => "undelete",
        }
    }
}

impl QueueAction {
    pub fn name(self) -> &'static str {
        match self {
            QueueAction::Open(a) => a.name(),
            QueueAction::Any(AnyAction::Rebuild) => "rebuild",
            QueueAction::Any(AnyAction::Posting(p)) => p.name(),
        }
    }
}

impl fmt::Display for QueueAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for QueueAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "rebuild" {
            return Ok(QueueAction::Any(AnyAction::Rebuild));
        }
        if let Some(a) = OpenAction::ALL.into_iter().find(|a| a.name() == s) {
            return Ok(QueueAction::Open(a));
        }
        PostingAction::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .map(|p| QueueAction::Any(AnyAction::Posting(p)))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
