/// Longest message body accepted for a discussion post.
pub const MAX_MESSAGE_LEN: usize = 60_000;

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate a discussion post body.
pub fn validate_message(message: &str) -> Option<String> {
    validate_required(message, "Message", MAX_MESSAGE_LEN)
}
