// src/repositories/users.rs

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::DbError,
    models::user::{Credentials, User},
};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds a user, or updates names and password of the user with the same username.
    ///
    /// Returns the user's id either way, or `None` if the username or password is blank.
    pub async fn upsert_user(&self, user: &User, password: &str) -> Result<Option<i64>, DbError> {
        let credentials = Credentials {
            username: user.username.clone(),
            password: password.to_string(),
        };
        if let Err(validation_errors) = credentials.validate() {
            tracing::warn!("Rejected user '{}': {}", user.username, validation_errors);
            return Ok(None);
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO User (Username, Firstname, Lastname, Password)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(Username) DO UPDATE SET
                Firstname = excluded.Firstname,
                Lastname = excluded.Lastname,
                Password = excluded.Password
            RETURNING UserId
            "#,
        )
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert user '{}': {:?}", user.username, e);
            DbError::from(e)
        })?;

        tracing::debug!("Stored user '{}' as {}", user.username, id);
        Ok(Some(id))
    }

    /// True iff a user with exactly this username and password exists.
    ///
    /// Note: passwords are compared in plaintext. This is not how credentials
    /// should be stored; a real system keeps only a salted hash.
    pub async fn verify_login(&self, username: &str, password: &str) -> Result<bool, DbError> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM User WHERE Username = ? AND Password = ?)",
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            DbError::from(e)
        })?;

        Ok(found)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT UserId, Username, Firstname, Lastname FROM User WHERE Username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user '{}': {:?}", username, e);
            DbError::from(e)
        })?;

        Ok(user)
    }
}
