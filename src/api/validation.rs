use super::ApiError;

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }

    if username.len() > 100 {
        return Err(ApiError::validation(
            "Username must be 100 characters or less",
        ));
    }

    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.trim().is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    if password.len() > 255 {
        return Err(ApiError::validation(
            "Password must be 255 characters or less",
        ));
    }

    Ok(password)
}
