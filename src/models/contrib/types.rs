use std::fmt;

/// Kinds of contribution hosted in the directory. Each kind has its own
/// review queue and its own queue permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContribType {
    Mod,
    Style,
    Converter,
    Bbcode,
    Bridge,
    Translation,
    Extension,
}

/// Capabilities checked against a contribution type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    Validate,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Validate => "validate",
        }
    }
}

impl ContribType {
    pub const ALL: [ContribType; 7] = [
        ContribType::Mod,
        ContribType::Style,
        ContribType::Converter,
        ContribType::Bbcode,
        ContribType::Bridge,
        ContribType::Translation,
        ContribType::Extension,
    ];

    pub fn id(self) -> i16 {
        match self {
            ContribType::Mod => 1,
            ContribType::Style => 2,
            ContribType::Converter => 3,
            ContribType::Bbcode => 4,
            ContribType::Bridge => 5,
            ContribType::Translation => 6,
            ContribType::Extension => 7,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn slug(self) -> &'static str {
        match self {
            ContribType::Mod => "mod",
            ContribType::Style => "style",
            ContribType::Converter => "converter",
            ContribType::Bbcode => "bbcode",
            ContribType::Bridge => "bridge",
            ContribType::Translation => "translation",
            ContribType::Extension => "extension",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContribType::Mod => "Modification",
            ContribType::Style => "Style",
            ContribType::Converter => "Converter",
            ContribType::Bbcode => "BBCode",
            ContribType::Bridge => "Bridge",
            ContribType::Translation => "Translation",
            ContribType::Extension => "Extension",
        }
    }

    /// Permission code granting `cap` on this type's queue, e.g. `queue.mod.validate`.
    pub fn acl_code(self, cap: Capability) -> String {
        format!("queue.{}.{}", self.slug(), cap.as_str())
    }

    /// Whether revisions of this type are run through automated
    /// install testing against new platform releases.
    pub fn automod_test(self) -> bool {
        matches!(self, ContribType::Mod)
    }
}

impl fmt::Display for ContribType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContribStatus {
    New,
    Approved,
    Denied,
    Cleaned,
}

impl ContribStatus {
    pub fn id(self) -> i16 {
        match self {
            ContribStatus::New => 1,
            ContribStatus::Approved => 2,
            ContribStatus::Denied => 3,
            ContribStatus::Cleaned => 4,
        }
    }

    pub fn from_id(id: i16) -> Self {
        match id {
            2 => ContribStatus::Approved,
            3 => ContribStatus::Denied,
            4 => ContribStatus::Cleaned,
            _ => ContribStatus::New,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionStatus {
    New,
    Approved,
    Denied,
    Pulled,
}

impl RevisionStatus {
    pub fn id(self) -> i16 {
        match self {
            RevisionStatus::New => 1,
            RevisionStatus::Approved => 2,
            RevisionStatus::Denied => 3,
            RevisionStatus::Pulled => 4,
        }
    }

    pub fn from_id(id: i16) -> Self {
        match id {
            2 => RevisionStatus::Approved,
            3 => RevisionStatus::Denied,
            4 => RevisionStatus::Pulled,
            _ => RevisionStatus::New,
        }
    }
}

/// How the viewing user relates to a contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authorship {
    pub is_author: bool,
    pub is_active_coauthor: bool,
    pub is_coauthor: bool,
}

impl Authorship {
    pub fn any(&self) -> bool {
        self.is_author || self.is_active_coauthor || self.is_coauthor
    }
}

#[derive(Debug, Clone)]
pub struct Contribution {
    pub id: i64,
    pub contrib_type: ContribType,
    pub name: String,
    pub name_clean: String,
    pub user_id: i64,
    pub status: ContribStatus,
    /// Relative to the user the contribution was loaded for.
    pub authorship: Authorship,
}

impl Contribution {
    pub fn url(&self) -> String {
        format!("/db/{}/{}", self.contrib_type.slug(), self.name_clean)
    }

    /// Link offered to the author when a moderator allows a repack of `revision_id`.
    pub fn repack_url(&self, revision_id: i64) -> String {
        format!("{}/revision?repack={}", self.url(), revision_id)
    }
}

#[derive(Debug, Clone)]
pub struct Revision {
    pub id: i64,
    pub contrib_id: i64,
    pub version: String,
    pub name: String,
    pub status: RevisionStatus,
    pub validated: bool,
    pub time: i64,
}
