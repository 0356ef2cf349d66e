//! Pure validators for the login and edit forms.
//!
//! Blank means empty after trimming. Email checks are structural only:
//! one `@`, a non-empty local part, and a dotted domain.

use crate::domain::UserChanges;

pub const REQUIRED: &str = "Required";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";

/// Per-field messages for the login form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Per-field messages for the edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFormErrors {
    pub first_name: Option<&'static str>,
    pub last_name: Option<&'static str>,
    pub email: Option<&'static str>,
}

impl UserFormErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

/// Checks the shape `local@domain.tld`.
///
/// No whitespace, exactly one `@`, a non-empty local part, and a domain of at
/// least two non-empty dot-separated labels.
///
/// ```
/// use zusers::forms::is_well_formed_email;
///
/// assert!(is_well_formed_email("eve.holt@reqres.in"));
/// assert!(!is_well_formed_email("eve.holt@reqres"));
/// ```
#[must_use]
pub fn is_well_formed_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates login input.
///
/// Both fields are required and the email must be well formed.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    let email = if is_blank(email) {
        Some(REQUIRED)
    } else if !is_well_formed_email(email) {
        Some(INVALID_EMAIL)
    } else {
        None
    };

    LoginErrors {
        email,
        password: is_blank(password).then_some(REQUIRED),
    }
}

/// Validates the edit form.
#[must_use]
pub fn validate_user_form(form: &UserChanges) -> UserFormErrors {
    let email = if is_blank(&form.email) {
        Some(EMAIL_REQUIRED)
    } else if !is_well_formed_email(&form.email) {
        Some(INVALID_EMAIL)
    } else {
        None
    };

    UserFormErrors {
        first_name: is_blank(&form.first_name).then_some(FIRST_NAME_REQUIRED),
        last_name: is_blank(&form.last_name).then_some(LAST_NAME_REQUIRED),
        email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first: &str, last: &str, email: &str) -> UserChanges {
        UserChanges {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_valid_login() {
        assert!(validate_login("eve.holt@reqres.in", "cityslicka").is_empty());
    }

    #[test]
    fn empty_login_fields_are_required() {
        let errors = validate_login("", "  ");
        assert_eq!(errors.email, Some(REQUIRED));
        assert_eq!(errors.password, Some(REQUIRED));
    }

    #[test]
    fn malformed_login_email() {
        let errors = validate_login("eve.holt", "cityslicka");
        assert_eq!(errors.email, Some(INVALID_EMAIL));
        assert_eq!(errors.password, None);
    }

    #[test]
    fn email_shapes() {
        for valid in ["a@b.co", "first.last+tag@sub.example.org"] {
            assert!(is_well_formed_email(valid), "{valid}");
        }
        for invalid in ["", "@b.co", "a@", "a@b", "a@b.", "a@.co", "a b@c.co", "a@b@c.co"] {
            assert!(!is_well_formed_email(invalid), "{invalid}");
        }
    }

    #[test]
    fn edit_form_messages() {
        let errors = validate_user_form(&form("", "", ""));
        assert_eq!(errors.first_name, Some(FIRST_NAME_REQUIRED));
        assert_eq!(errors.last_name, Some(LAST_NAME_REQUIRED));
        assert_eq!(errors.email, Some(EMAIL_REQUIRED));

        let errors = validate_user_form(&form("Janet", "Weaver", "janet"));
        assert_eq!(errors.email, Some(INVALID_EMAIL));
        assert_eq!(errors.first_name, None);

        assert!(validate_user_form(&form("Janet", "Weaver", "janet.weaver@reqres.in")).is_empty());
    }
}
