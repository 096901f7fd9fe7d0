use regex::Regex;
use std::sync::OnceLock;

use super::ApiError;

pub fn validate_anime_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid anime ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_score(score: f32) -> Result<f32, ApiError> {
    if !(0.0..=10.0).contains(&score) {
        return Err(ApiError::validation(
            "Score must be between 0 and 10".to_string(),
        ));
    }
    Ok(score)
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }

    if username.len() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }

    if !email_regex().is_match(email) {
        return Err(ApiError::validation("A valid email is required"));
    }

    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    Ok(())
}

pub fn validate_comment_content(content: &str) -> Result<&str, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Comment content is required"));
    }
    Ok(trimmed)
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"))
}
