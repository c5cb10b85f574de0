// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Represents the 'User' table in the database.
/// The password column is never loaded into this struct.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct User {
    /// Assigned by storage on first insert; `None` until then.
    #[sqlx(rename = "UserId")]
    pub id: Option<i64>,

    /// Unique username. Identity key of the user.
    pub username: String,

    pub firstname: String,
    pub lastname: String,
}

impl User {
    pub fn new(username: &str, firstname: &str, lastname: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        }
    }
}

/// Input checked before a user is added or updated.
#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(custom(function = validate_not_blank))]
    pub username: String,
    #[validate(custom(function = validate_not_blank))]
    pub password: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("must_not_be_blank"));
    }
    Ok(())
}
