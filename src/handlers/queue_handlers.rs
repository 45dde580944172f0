use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::Actor;
use crate::errors::{AppError, render, render_with_status};
use crate::queue::QueueWorkflow;
use crate::queue::view::{ActionInput, FormPhase, Outcome, Page};
use crate::state::AppState;
use crate::templates_structs::{
    NeedsAuthTemplate, PageContext, QUICK_ACTIONS, QueueItemTemplate, QueueMoveTemplate, QueuePostTemplate,
    QueueValidateTemplate,
};

// ---------------------------------------------------------------------------
// Query / Form Structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub tag: Option<i64>,
}

/// Query of a first-phase or one-click action link.
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub hash: String,
    /// Destination tag for `move`.
    pub id: Option<i64>,
    /// Target post for posting actions.
    pub p: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub message: String,
    pub id: Option<i64>,
    pub p: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /manage/queue/item/{id}
pub async fn display_item(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<ItemQuery>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actor = Actor::from_session(&session);
    let workflow = QueueWorkflow::new(&state.queue, state.workflow_settings(), &actor);

    let outcome = workflow.display_item(id, query.tag).await?;
    respond(&state, &session, &actor, outcome, &format!("/manage/queue/item/{id}"))
}

/// GET /manage/queue/item/{id}/action/{action}
/// First phase of a form action, a state action, or a one-click link
/// carrying `hash`.
pub async fn item_action_get(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, String)>,
    query: web::Query<ActionQuery>,
) -> Result<HttpResponse, AppError> {
    let (id, action) = path.into_inner();
    let phase = if query.hash.is_empty() {
        FormPhase::Display
    } else {
        FormPhase::QuickLink {
            hash_valid: csrf::check_link_hash(&session, QUICK_ACTIONS, &query.hash),
        }
    };
    let input = ActionInput {
        phase,
        message: String::new(),
        tag_id: query.id,
        post_id: query.p,
    };

    run_action(&state, &session, id, &action, &input).await
}

/// POST /manage/queue/item/{id}/action/{action}
pub async fn item_action_post(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, String)>,
    form: web::Form<ActionForm>,
) -> Result<HttpResponse, AppError> {
    let (id, action) = path.into_inner();
    let form = form.into_inner();
    let input = ActionInput {
        phase: FormPhase::Submitted {
            token_valid: csrf::is_valid_token(&session, &form.csrf_token),
        },
        message: form.message,
        tag_id: form.id,
        post_id: form.p,
    };

    run_action(&state, &session, id, &action, &input).await
}

async fn run_action(
    state: &AppState,
    session: &Session,
    id: i64,
    action: &str,
    input: &ActionInput,
) -> Result<HttpResponse, AppError> {
    let actor = Actor::from_session(session);
    let workflow = QueueWorkflow::new(&state.queue, state.workflow_settings(), &actor);

    let outcome = workflow.item_action(id, action, input).await?;
    respond(
        state,
        session,
        &actor,
        outcome,
        &format!("/manage/queue/item/{id}/action/{action}"),
    )
}

fn respond(
    state: &AppState,
    session: &Session,
    actor: &Actor,
    outcome: Outcome,
    current_path: &str,
) -> Result<HttpResponse, AppError> {
    let ctx = || PageContext::build(session, actor, &state.config.app_name, "queue", current_path);

    match outcome {
        Outcome::Redirect(url) => Ok(HttpResponse::SeeOther()
            .insert_header(("Location", url))
            .finish()),
        Outcome::NeedsAuth => needs_auth(ctx()),
        Outcome::Page(Page::Item(view)) => {
            let view = *view;
            let ctx = match &view.breadcrumb {
                Some(crumb) => ctx().with_breadcrumb(crumb.clone()),
                None => ctx(),
            };
            render(QueueItemTemplate { ctx, view })
        }
        Outcome::Page(Page::Move(view)) => render(QueueMoveTemplate { ctx: ctx(), view }),
        Outcome::Page(Page::Validate(view)) => render(QueueValidateTemplate { ctx: ctx(), view }),
        Outcome::Page(Page::PostForm(view)) => render(QueuePostTemplate { ctx: ctx(), view }),
    }
}

/// 401 for anonymous visitors (with a login prompt), 403 for logged-in users.
pub fn needs_auth(ctx: PageContext) -> Result<HttpResponse, AppError> {
    let status = if ctx.logged_in {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::UNAUTHORIZED
    };
    render_with_status(status, NeedsAuthTemplate { ctx })
}
