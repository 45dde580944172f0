use askama::Template;

use crate::tools::VersionOption;
use super::PageContext;

#[derive(Template)]
#[template(path = "manage/tool_version_test.html")]
pub struct VersionTestTemplate {
    pub ctx: PageContext,
    pub options: Vec<VersionOption>,
    pub new_version: String,
}
