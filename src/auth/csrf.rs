use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const FORM_KEY: &str = "csrf_token";
const LINK_HASH_PREFIX: &str = "link_hash_";

/// Get the CSRF token from the session, or generate a new one.
pub fn get_or_create_token(session: &Session) -> String {
    get_or_create(session, FORM_KEY)
}

/// Whether the submitted form key matches the session token.
pub fn is_valid_token(session: &Session, submitted: &str) -> bool {
    matches_stored(session, FORM_KEY, submitted)
}

/// Validate the submitted CSRF token against the session token.
pub fn validate_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    if is_valid_token(session, submitted) {
        Ok(())
    } else {
        Err(AppError::Csrf("invalid or missing form key".to_string()))
    }
}

/// Per-session hash for one-click links (e.g. `quick_actions`). Lives apart
/// from the form key since it ends up in query strings.
pub fn get_or_create_link_hash(session: &Session, name: &str) -> String {
    get_or_create(session, &format!("{LINK_HASH_PREFIX}{name}"))
}

pub fn check_link_hash(session: &Session, name: &str, submitted: &str) -> bool {
    matches_stored(session, &format!("{LINK_HASH_PREFIX}{name}"), submitted)
}

fn get_or_create(session: &Session, key: &str) -> String {
    if let Ok(Some(token)) = session.get::<String>(key) {
        return token;
    }
    let token = generate_token();
    let _ = session.insert(key, &token);
    token
}

fn matches_stored(session: &Session, key: &str, submitted: &str) -> bool {
    let stored = session
        .get::<String>(key)
        .unwrap_or(None)
        .unwrap_or_default();
    !stored.is_empty() && constant_time_eq(&stored, submitted)
}

/// Generate a random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
