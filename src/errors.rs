use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use std::fmt;

use crate::queue::QueueError;
use crate::store::StoreError;
use crate::tools::ToolError;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Template(askama::Error),
    Session(String),
    Csrf(String),
    PermissionDenied(String),
    Queue(QueueError),
    Tool(ToolError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "Store error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf(e) => write!(f, "CSRF error: {e}"),
            AppError::PermissionDenied(code) => write!(f, "Permission denied: {code}"),
            AppError::Queue(e) => write!(f, "{e}"),
            AppError::Tool(e) => write!(f, "{e}"),
        }
    }
}

/// Bare error page; rendered without session chrome since the error may
/// come from anywhere in the request.
#[derive(Template)]
#[template(path = "errors/error.html")]
struct ErrorTemplate<'a> {
    code: &'a str,
    message: String,
}

fn error_page(status: StatusCode, code: &str, message: String) -> HttpResponse {
    let tmpl = ErrorTemplate { code, message };
    match tmpl.render() {
        Ok(html) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("Failed to render error page: {e}");
            HttpResponse::build(status).body(code.to_string())
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Csrf(_) | AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Queue(e) => e.status(),
            AppError::Tool(ToolError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Tool(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Csrf(_) => {
                log::warn!("{self}");
                error_page(status, "FORM_INVALID", "Invalid or missing CSRF token".to_string())
            }
            AppError::PermissionDenied(code) => {
                log::warn!("{self}");
                error_page(status, "NOT_AUTHORISED", format!("Missing permission {code}"))
            }
            AppError::Session(e) => error_page(status, "LOGIN_REQUIRED", e.clone()),
            AppError::Queue(e) if !e.is_internal() => error_page(status, e.code(), e.to_string()),
            AppError::Tool(e) if !matches!(e, ToolError::Store(_)) => {
                error_page(status, e.code(), e.to_string())
            }
            _ => {
                log::error!("{self}");
                error_page(status, "GENERAL_ERROR", "Internal Server Error".to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<QueueError> for AppError {
    fn from(e: QueueError) -> Self {
        AppError::Queue(e)
    }
}

impl From<ToolError> for AppError {
    fn from(e: ToolError) -> Self {
        AppError::Tool(e)
    }
}

/// Render a template into a 200 HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    render_with_status(StatusCode::OK, tmpl)
}

pub fn render_with_status(status: StatusCode, tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(html))
}
