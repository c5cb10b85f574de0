// src/db.rs

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{
    error::DbError,
    repositories::{
        exercises::ExerciseRepository, submissions::SubmissionRepository, users::UserRepository,
    },
};

/// Tables created on open. `IF NOT EXISTS` keeps re-opening an existing store harmless.
const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS User (
        UserId INTEGER PRIMARY KEY,
        Username TEXT UNIQUE,
        Firstname TEXT,
        Lastname TEXT,
        Password TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Exercise (
        ExerciseId INTEGER PRIMARY KEY,
        Name TEXT,
        DueDate INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Question (
        ExerciseId INTEGER,
        QuestionId INTEGER,
        Name TEXT,
        "Desc" TEXT,
        Points INTEGER,
        PRIMARY KEY (ExerciseId, QuestionId)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Submission (
        SubmissionId INTEGER PRIMARY KEY,
        UserId INTEGER,
        ExerciseId INTEGER,
        SubmissionTime INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS QuestionGrade (
        SubmissionId INTEGER,
        QuestionId INTEGER,
        Grade REAL,
        PRIMARY KEY (SubmissionId, QuestionId)
    )
    "#,
];

/// Handle to the grading database.
///
/// Backed by a pool holding a single connection that never expires, so an
/// in-memory store lives exactly as long as the handle. Clones share it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database at `url`, creating the file if needed, and makes sure
    /// every table exists.
    pub async fn open(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| {
                tracing::error!("Invalid database url {}: {:?}", url, e);
                DbError::from(e)
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to open database {}: {:?}", url, e);
                DbError::from(e)
            })?;

        if let Err(e) = create_tables(&pool).await {
            tracing::error!("Failed to create tables, closing database: {:?}", e);
            pool.close().await;
            return Err(e.into());
        }

        tracing::info!("Database opened at {}", url);
        Ok(Self { pool })
    }

    /// Closes the handle. Calling it again is a no-op.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("Database closed");
    }

    pub fn is_open(&self) -> bool {
        !self.pool.is_closed()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn exercises(&self) -> ExerciseRepository {
        ExerciseRepository::new(self.pool.clone())
    }

    pub fn submissions(&self) -> SubmissionRepository {
        SubmissionRepository::new(self.pool.clone())
    }
}

async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
