//! Registration form validation

use regex::Regex;
use std::sync::OnceLock;

/// Validate the full name field
pub fn validate_full_name(full_name: &str) -> Result<(), String> {
    if full_name.is_empty() {
        return Err("Укажите полное имя.".to_string());
    }

    if full_name.len() > 120 {
        return Err("Имя слишком длинное.".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Укажите email.".to_string());
    }

    if email.len() > 254 {
        return Err("Email слишком длинный.".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Введите корректный email.".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Укажите пароль.".to_string());
    }

    if password.len() < 8 {
        return Err("Пароль должен быть не короче 8 символов.".to_string());
    }

    if password.len() > 128 {
        return Err("Пароль слишком длинный.".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Artur Dent").is_ok());
        assert!(validate_full_name("").is_err());
        assert!(validate_full_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("candidate@alabuga.space").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("orbita123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
