// src/models/exercise.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::time::truncate_to_millis;

/// A graded assignment made of an ordered list of questions.
///
/// The due date is kept with millisecond precision, the precision of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Caller-assigned and immutable once stored.
    pub id: i64,
    pub name: String,
    pub due_date: DateTime<Utc>,

    /// Order matters: grades of a submission are aligned to it by position.
    pub questions: Vec<Question>,
}

impl Exercise {
    pub fn new(id: i64, name: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            due_date: truncate_to_millis(due_date),
            questions: Vec::new(),
        }
    }

    pub fn add_question(&mut self, name: &str, desc: &str, points: i64) {
        self.questions.push(Question {
            name: name.to_string(),
            desc: desc.to_string(),
            points,
        });
    }
}

/// Represents a row of the 'Question' table, minus its keys.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct Question {
    pub name: String,
    pub desc: String,
    pub points: i64,
}
