// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    models::{exercise::Exercise, user::User},
    utils::time::truncate_to_millis,
};

/// One attempt by a user at an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// `None` asks storage to assign a fresh id.
    pub id: Option<i64>,
    pub user: User,
    pub exercise: Exercise,
    pub submitted_at: DateTime<Utc>,

    /// One grade per question, in the exercise's question order.
    pub grades: Vec<f64>,
}

impl Submission {
    /// `submitted_at` is truncated to milliseconds, the precision of the store.
    pub fn new(
        user: User,
        exercise: Exercise,
        submitted_at: DateTime<Utc>,
        grades: Vec<f64>,
    ) -> Self {
        Self {
            id: None,
            user,
            exercise,
            submitted_at: truncate_to_millis(submitted_at),
            grades,
        }
    }

    /// Sum of grade x points over the exercise's questions.
    pub fn total_score(&self) -> f64 {
        self.grades
            .iter()
            .zip(&self.exercise.questions)
            .map(|(grade, question)| grade * question.points as f64)
            .sum()
    }
}

/// One row of the latest/best submission queries.
#[derive(Debug, Clone, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct GradeRow {
    pub submission_id: i64,
    pub question_id: i64,
    pub grade: f64,
    pub submission_time: i64,
}
