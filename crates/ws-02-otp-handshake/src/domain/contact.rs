//! Contact shape checks.

use std::sync::LazyLock;

use regex::Regex;

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+\d{1,3}\d{4,}$").expect("phone pattern is a valid regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// What a contact must look like for a given OTP purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactShape {
    Phone,
    Email,
}

impl ContactShape {
    #[must_use]
    pub fn matches(self, contact: &str) -> bool {
        match self {
            Self::Phone => is_phone(contact),
            Self::Email => is_email(contact),
        }
    }
}

impl std::fmt::Display for ContactShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone => f.write_str("phone number"),
            Self::Email => f.write_str("email address"),
        }
    }
}

/// `+`, a 1-3 digit country code, then at least four digits.
#[must_use]
pub fn is_phone(contact: &str) -> bool {
    PHONE.is_match(contact)
}

#[must_use]
pub fn is_email(contact: &str) -> bool {
    EMAIL.is_match(contact)
}
