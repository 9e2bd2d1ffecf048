//! Client-side form validation, checked before submission and rendered inline.

/// Minimal email shape check: one `@` with non-empty local part and a
/// domain containing a dot.
pub fn validate_email(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required");
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Some("Enter a valid email address");
    }
    None
}

pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("Password is required");
    }
    if password.len() < 6 {
        return Some("Password must be at least 6 characters");
    }
    None
}

pub fn validate_password_confirmation(password: &str, confirm: &str) -> Option<&'static str> {
    if password != confirm {
        return Some("Passwords do not match");
    }
    None
}

pub fn validate_username(username: &str) -> Option<&'static str> {
    if username.trim().is_empty() {
        return Some("Username is required");
    }
    None
}

pub fn validate_age(age: &str) -> Option<&'static str> {
    match age.trim().parse::<u8>() {
        Ok(n) if (1..=119).contains(&n) => None,
        Ok(_) => Some("Enter a valid age"),
        Err(_) => Some("Age must be a number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.com").is_none());
        assert!(validate_email("first.last@clinic.example.org").is_none());
        assert!(validate_email("").is_some());
        assert!(validate_email("nodomain@").is_some());
        assert!(validate_email("@nolocal.com").is_some());
        assert!(validate_email("a@nodot").is_some());
        assert!(validate_email("a@trailing.").is_some());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("secret1").is_none());
        assert!(validate_password("12345").is_some());
        assert!(validate_password("").is_some());
    }

    #[test]
    fn age_range() {
        assert!(validate_age("42").is_none());
        assert!(validate_age("1").is_none());
        assert!(validate_age("0").is_some());
        assert!(validate_age("120").is_some());
        assert!(validate_age("abc").is_some());
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_password_confirmation("abcdef", "abcdef").is_none());
        assert!(validate_password_confirmation("abcdef", "abcdeg").is_some());
    }
}
