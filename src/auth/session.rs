use actix_session::Session;

use crate::errors::AppError;

/// Wrapper around permission codes with a `has()` method for use in Askama templates.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }
}

/// The user acting on the current request, as established by the host's
/// login flow. Anonymous visitors get an actor with no id and no permissions.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub user_id: Option<i64>,
    pub username: String,
    pub is_founder: bool,
    pub permissions: Permissions,
}

impl Actor {
    pub fn from_session(session: &Session) -> Self {
        let Some(user_id) = get_user_id(session) else {
            return Actor::anonymous();
        };
        Actor {
            user_id: Some(user_id),
            username: get_username(session).unwrap_or_default(),
            is_founder: session
                .get::<String>("user_type")
                .unwrap_or(None)
                .is_some_and(|t| t == "founder"),
            permissions: get_permissions(session).unwrap_or_default(),
        }
    }

    pub fn anonymous() -> Self {
        Actor {
            username: "Anonymous".to_string(),
            ..Actor::default()
        }
    }

    pub fn is_registered(&self) -> bool {
        self.user_id.is_some()
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert("flash", message.into());
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    if get_user_id(session).is_none() {
        return Err(AppError::Session("Login required".to_string()));
    }
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;

    if permissions.has(code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}
