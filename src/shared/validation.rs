/**
 * Input Validation
 *
 * Pure checks applied to request bodies before any store call. A
 * `Validator` collects every failing field so the client gets the full
 * list in one response instead of fixing fields one at a time.
 */

use chrono::{DateTime, NaiveDate};

use crate::shared::error::{FieldError, SharedError};

/// Minimum password length accepted anywhere a password is set
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum length for person names
pub const MIN_NAME_LEN: usize = 2;

/// Accumulates field errors for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record a failure unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    /// Require a non-blank string, returning it trimmed
    pub fn require<'a>(&mut self, field: &str, value: Option<&'a str>, message: &str) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.push(field, message);
                None
            }
        }
    }

    /// Require a name of at least `MIN_NAME_LEN` characters
    pub fn name<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        let name = self.require(field, value, "Name is required")?;
        if name.chars().count() < MIN_NAME_LEN {
            self.push(field, "Name must be at least 2 characters long");
            return None;
        }
        Some(name)
    }

    /// Require a well-formed email, returning it normalized
    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let email = self.require(field, value, "Email is required")?;
        if !is_valid_email(email) {
            self.push(field, "Please provide a valid email address");
            return None;
        }
        Some(normalize_email(email))
    }

    /// Require a password of at least `MIN_PASSWORD_LEN` characters
    pub fn password<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => Some(p),
            Some(p) if !p.is_empty() => {
                self.push(field, "Password must be at least 6 characters long");
                None
            }
            _ => {
                self.push(field, "Password is required");
                None
            }
        }
    }

    /// Validate an optional phone number
    pub fn phone(&mut self, field: &str, value: Option<&str>) {
        if let Some(phone) = value.map(str::trim).filter(|p| !p.is_empty()) {
            self.check(is_valid_phone(phone), field, "Please provide a valid phone number");
        }
    }

    /// Reject a negative or non-finite number
    pub fn non_negative(&mut self, field: &str, value: Option<f64>, label: &str) {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                self.push(field, format!("{} cannot be negative", label));
            }
        }
    }

    /// Reject a negative count
    pub fn non_negative_count(&mut self, field: &str, value: Option<i32>, label: &str) {
        if let Some(v) = value {
            if v < 0 {
                self.push(field, format!("{} cannot be negative", label));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation
    ///
    /// # Returns
    ///
    /// `Ok(())` when no field failed, otherwise a `ValidationError` with all
    /// collected field errors.
    pub fn finish(self) -> Result<(), SharedError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SharedError::ValidationError { errors: self.errors })
        }
    }
}

/// Lowercase and trim an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// E.164-style phone number: optional `+`, no leading zero, 10 to 15 digits
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let len = digits.len();
    (10..=15).contains(&len)
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// 24-hour `HH:mm` or `HH:mm:ss`
pub fn is_valid_time(time: &str) -> bool {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return false;
    }
    let two_digits = |s: &str, max: u32| {
        s.len() == 2 && s.chars().all(|c| c.is_ascii_digit()) && s.parse::<u32>().map_or(false, |n| n <= max)
    };
    two_digits(parts[0], 23) && parts[1..].iter().all(|p| two_digits(*p, 59))
}

/// Parse an ISO 8601 date (`2025-06-01`) or date-time (`2025-06-01T10:00:00Z`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
