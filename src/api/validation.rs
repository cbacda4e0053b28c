use super::ApiError;

const MAX_NAME_LEN: usize = 100;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

/// Category and product names. Returns the trimmed name.
pub fn validate_name(field: &str, name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "{field} must be {MAX_NAME_LEN} characters or less"
        )));
    }

    Ok(trimmed.to_string())
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if username.len() < 3 || username.len() > 32 {
        return Err(ApiError::validation(
            "Username must be between 3 and 32 characters",
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(username)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@')
    });

    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ApiError::validation(format!(
            "Invalid email address: {email}"
        )));
    }

    Ok(email)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("review", 1).is_ok());
        assert!(validate_id("review", 0).is_err());
        assert!(validate_id("review", -4).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Name", "  Phones ").unwrap(), "Phones");
        assert!(validate_name("Name", "   ").is_err());
        assert!(validate_name("Name", &"x".repeat(101)).is_err());
        assert!(validate_name("Name", &"é".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("jane_doe").is_ok());
        assert!(validate_username("jd").is_err());
        assert!(validate_username("jane doe").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@@example.com").is_err());
        assert!(validate_email("jane @example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("short").is_err());
    }
}
