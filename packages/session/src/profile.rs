use thiserror::Error;
use time::Date;

use crate::gateway::Registration;

const SPECIAL_CHARS: &str = "@$!%*?&";
const PHONE_PREFIXES: [&str; 3] = ["809", "829", "849"];

/// Registration field validation failures, in user-facing wording.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("username must be 3-20 characters using letters, digits, '-' or '_'")]
    InvalidUsername,
    #[error("email address is not well-formed")]
    InvalidEmail,
    #[error("password needs 8+ characters with an uppercase letter, a lowercase letter, a digit and one of {SPECIAL_CHARS}")]
    WeakPassword,
    #[error("you must be at least 18 years old")]
    Underage,
    #[error("phone must start with 809, 829 or 849 followed by 7 digits")]
    InvalidPhone,
}

pub fn validate_username(username: &str) -> Result<(), ProfileError> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(ProfileError::InvalidUsername);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ProfileError::InvalidUsername);
    }
    Ok(())
}

/// RFC-shaped check: one '@', non-empty local part, domain containing a dot
/// with non-empty labels around it, no whitespace anywhere.
pub fn validate_email(email: &str) -> Result<(), ProfileError> {
    if email.chars().any(char::is_whitespace) {
        return Err(ProfileError::InvalidEmail);
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ProfileError::InvalidEmail),
    };
    if local.is_empty() || domain.is_empty() {
        return Err(ProfileError::InvalidEmail);
    }
    match domain.rsplit_once('.') {
        Some((head, tld)) if !head.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(ProfileError::InvalidEmail),
    }
}

pub fn validate_password(password: &str) -> Result<(), ProfileError> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));
    let allowed_only = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(c));

    if long_enough && has_upper && has_lower && has_digit && has_special && allowed_only {
        Ok(())
    } else {
        Err(ProfileError::WeakPassword)
    }
}

/// Calendar-aware age: year difference, minus one if the birthday has not
/// occurred yet this year.
pub fn age_on(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month() as u8, today.day()) < (birth.month() as u8, birth.day()) {
        age -= 1;
    }
    age
}

pub fn validate_age(birth: Date, today: Date) -> Result<(), ProfileError> {
    if age_on(birth, today) < 18 {
        return Err(ProfileError::Underage);
    }
    Ok(())
}

/// Strips formatting characters before matching, so "809-555-1234" passes.
pub fn validate_phone(phone: &str) -> Result<(), ProfileError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return Err(ProfileError::InvalidPhone);
    }
    if !PHONE_PREFIXES.iter().any(|p| digits.starts_with(p)) {
        return Err(ProfileError::InvalidPhone);
    }
    Ok(())
}

/// Checks all fields in registration-form order and reports the first
/// failure.
pub fn validate_registration(registration: &Registration, today: Date) -> Result<(), ProfileError> {
    validate_username(&registration.username)?;
    validate_email(&registration.email)?;
    validate_password(&registration.password)?;
    validate_age(registration.birth_date, today)?;
    validate_phone(&registration.phone)?;
    Ok(())
}
