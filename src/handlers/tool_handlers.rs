use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{Actor, require_permission, set_flash};
use crate::errors::{AppError, render};
use crate::state::AppState;
use crate::templates_structs::{PageContext, VersionTestTemplate};
use crate::tools::phpbb_version_test::success_message;
use crate::tools::{TOOLS_PERMISSION, ToolError, ToolInput};

pub const TOOL_PATH: &str = "/manage/tools/phpbb_version_test";

/// GET /manage/tools/phpbb_version_test
pub async fn form(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    require_permission(&session, TOOLS_PERMISSION)?;

    let actor = Actor::from_session(&session);
    let options = state.version_tool().version_options().await?;
    let ctx = PageContext::build(&session, &actor, &state.config.app_name, "administration", TOOL_PATH);

    render(VersionTestTemplate {
        ctx,
        options,
        new_version: String::new(),
    })
}

/// POST /manage/tools/phpbb_version_test
/// Runs the tool and reports the result as a flash message on the form.
pub async fn run(state: web::Data<AppState>, session: Session, body: String) -> Result<HttpResponse, AppError> {
    require_permission(&session, TOOLS_PERMISSION)?;

    let input = ToolInput::from_pairs(&super::form::parse_form_body(&body));
    csrf::validate_csrf(&session, &input.csrf_token)?;

    match state
        .version_tool()
        .run(&input.new_version, &input.limit_versions)
        .await
    {
        Ok(count) => set_flash(&session, success_message(count)),
        Err(ToolError::Store(e)) => return Err(ToolError::Store(e).into()),
        Err(e) => {
            log::info!("Version test tool rejected '{}': {}", input.new_version, e.code());
            set_flash(&session, e.to_string());
        }
    }

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", TOOL_PATH))
        .finish())
}
