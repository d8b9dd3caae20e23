//! Field-level validation, independent of persistence.
//!
//! Handlers run these checks before touching the database and turn a
//! non-empty violation list into a 400 response.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

fn violation(field: &'static str, message: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field,
        message: message.into(),
    }
}

pub fn validate_subscription(
    name: &str,
    price: f64,
    payment_method: &str,
) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let name_len = name.trim().chars().count();
    if !(2..=100).contains(&name_len) {
        violations.push(violation("name", "must be between 2 and 100 characters"));
    }
    if !price.is_finite() || price < 0.0 {
        violations.push(violation("price", "must be a non-negative number"));
    }
    if payment_method.trim().is_empty() {
        violations.push(violation("paymentMethod", "is required"));
    }
    violations
}

pub fn validate_user(name: &str, email: &str, password: Option<&str>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let name_len = name.trim().chars().count();
    if !(2..=50).contains(&name_len) {
        violations.push(violation("name", "must be between 2 and 50 characters"));
    }
    if !is_valid_email(email) {
        violations.push(violation("email", "must be a valid email address"));
    }
    if let Some(password) = password {
        if password.chars().count() < 6 {
            violations.push(violation("password", "must be at least 6 characters long"));
        }
    }
    violations
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.chars().count() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_subscription() {
        assert!(validate_subscription("Netflix", 15.99, "credit card").is_empty());
    }

    #[test]
    fn rejects_out_of_range_subscription_fields() {
        let violations = validate_subscription("x", -1.0, "  ");
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "price", "paymentMethod"]);
    }

    #[test]
    fn rejects_nan_price() {
        assert!(!validate_subscription("Netflix", f64::NAN, "card").is_empty());
    }

    #[test]
    fn user_password_is_only_checked_when_present() {
        assert!(validate_user("Jane", "jane@example.com", None).is_empty());
        let violations = validate_user("Jane", "jane@example.com", Some("short"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "password");
    }

    #[test]
    fn email_format_checks() {
        assert!(is_valid_email("a.user@mail.example.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@example.c0m"));
        assert!(!is_valid_email("user name@example.com"));
    }
}
