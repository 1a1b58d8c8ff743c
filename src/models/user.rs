//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{blank_or_email, non_blank, not_blank};

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"), email(message = "Invalid email format"))]
    pub email: String,
}

/// Partial user update; absent or blank fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// New email, if the update actually changes it
    pub fn changed_email<'a>(&'a self, user: &User) -> Option<&'a str> {
        non_blank(self.email.as_ref()).filter(|email| *email != user.email)
    }

    /// Apply the update to `user`, returning the modified copy
    pub fn apply(&self, user: &User) -> User {
        let mut updated = user.clone();
        if let Some(name) = non_blank(self.name.as_ref()) {
            updated.name = name.to_string();
        }
        if let Some(email) = self.changed_email(user) {
            updated.email = email.to_string();
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User { id: 1, name: "Alice".into(), email: "alice@example.com".into() }
    }

    #[test]
    fn test_create_user_requires_name_and_valid_email() {
        let ok = CreateUser { name: "Bob".into(), email: "bob@example.com".into() };
        assert!(ok.validate().is_ok());

        let blank_name = CreateUser { name: "  ".into(), email: "bob@example.com".into() };
        assert!(blank_name.validate().is_err());

        let bad_email = CreateUser { name: "Bob".into(), email: "bob.example.com".into() };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_create_user_missing_fields_deserialize_as_blank() {
        let user: CreateUser = serde_json::from_str(r#"{"name": "Bob"}"#).unwrap();
        assert_eq!(user.email, "");
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_update_ignores_blank_fields() {
        let update = UpdateUser { name: Some("   ".into()), email: None };
        assert_eq!(update.apply(&alice()), alice());
    }

    #[test]
    fn test_update_blank_email_passes_validation() {
        let update = UpdateUser { name: Some("Robert".into()), email: Some("".into()) };
        assert!(update.validate().is_ok());
        assert_eq!(update.changed_email(&alice()), None);

        let bad = UpdateUser { name: None, email: Some("robert".into()) };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_same_email_is_not_a_change() {
        let update = UpdateUser { name: Some("Alicia".into()), email: Some("alice@example.com".into()) };
        assert_eq!(update.changed_email(&alice()), None);
        let updated = update.apply(&alice());
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alice@example.com");
    }

    #[test]
    fn test_update_new_email() {
        let update = UpdateUser { name: None, email: Some("alicia@example.com".into()) };
        assert_eq!(update.changed_email(&alice()), Some("alicia@example.com"));
        assert_eq!(update.apply(&alice()).email, "alicia@example.com");
    }
}
