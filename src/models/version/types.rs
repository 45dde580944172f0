/// A platform version split the way revisions are tagged with it:
/// a two-digit `branch` (`31` for 3.1.x) and the raw point-release string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhpbbVersion {
    pub branch: i32,
    pub point: String,
}

impl PhpbbVersion {
    /// Parse a full version string shaped `D.D.<rest>`, e.g. `3.1.10` gives
    /// branch `31` and point `10`. Anything shorter than five characters or
    /// without dots at positions 1 and 3 is rejected.
    pub fn parse(version: &str) -> Option<Self> {
        let chars: Vec<char> = version.chars().collect();
        if chars.len() < 5 || chars[1] != '.' || chars[3] != '.' {
            return None;
        }
        let branch = digit_value(chars[0]) * 10 + digit_value(chars[2]);
        let point: String = chars[4..].iter().collect();
        Some(PhpbbVersion { branch, point })
    }

    /// Decompose a catalog key / filter value: the first two characters are
    /// the branch, the remainder is the point release (`"3110"` -> 31, `"10"`).
    pub fn from_catalog_key(key: &str) -> Self {
        let head: String = key.chars().take(2).collect();
        let point: String = key.chars().skip(2).collect();
        PhpbbVersion {
            branch: leading_int(&head),
            point,
        }
    }

    /// Branch digits followed by the point release (`"3110"`). A `0` major
    /// keeps its digit, so 0.1.x gives `"01x"`.
    pub fn catalog_key(&self) -> String {
        format!("{}{}{}", self.branch / 10, self.branch % 10, self.point)
    }

    /// Human form, `3.1.10`.
    pub fn display(&self) -> String {
        format!("{}.{}.{}", self.branch / 10, self.branch % 10, self.point)
    }
}

/// Value of a single character when read as an integer; non-digits count as 0.
fn digit_value(c: char) -> i32 {
    c.to_digit(10).map(|d| d as i32).unwrap_or(0)
}

/// Integer value of the leading digits of `s` (0 when there are none).
fn leading_int(s: &str) -> i32 {
    s.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0, |acc, c| acc * 10 + digit_value(c))
}

/// Keep only characters allowed in a package file name.
pub fn sanitize_version(version: &str) -> String {
    version
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .collect()
}

/// A (contribution, revision) pair picked up by the version tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRef {
    pub contrib_id: i64,
    pub revision_id: i64,
}

/// One row tagging a revision with a platform version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub revision_id: i64,
    pub contrib_id: i64,
    pub branch: i32,
    pub point: String,
}
