//! Data models for ShareIt

pub mod booking;
pub mod comment;
pub mod item;
pub mod page;
pub mod request;
pub mod user;

use chrono::{Local, NaiveDateTime};
use validator::{ValidateEmail, ValidationError};

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingState, BookingStatus};
pub use comment::{Comment, CommentDetails};
pub use item::Item;
pub use page::PageRequest;
pub use request::{ItemRequest, ItemRequestDetails};
pub use user::User;

/// Current wall-clock time. Clients send booking periods in local time
/// without an offset, so every rule compares against local time as well.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Email check for optional updates: blank means "leave unchanged"
pub fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some("Invalid email format".into());
    Err(error)
}

/// Returns the trimmed value when it carries any text
pub(crate) fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("drill").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("  \t").is_err());
    }

    #[test]
    fn test_blank_or_email() {
        assert!(blank_or_email("").is_ok());
        assert!(blank_or_email("   ").is_ok());
        assert!(blank_or_email("bob@example.com").is_ok());
        assert!(blank_or_email("bob.example.com").is_err());
    }

    #[test]
    fn test_non_blank_trims() {
        let value = "  saw ".to_string();
        assert_eq!(non_blank(Some(&value)), Some("saw"));
        assert_eq!(non_blank(Some(&"   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
