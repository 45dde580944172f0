use askama::Template;

use super::PageContext;

/// Shown when the user may not perform the request; prompts anonymous
/// visitors to log in.
#[derive(Template)]
#[template(path = "auth/needs_auth.html")]
pub struct NeedsAuthTemplate {
    pub ctx: PageContext,
}
