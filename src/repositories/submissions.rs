// src/repositories/submissions.rs

use sqlx::SqlitePool;

use crate::{
    error::DbError,
    models::{
        exercise::Exercise,
        submission::{GradeRow, Submission},
        user::User,
    },
    utils::time::{from_millis, to_millis},
};

/// Which submission of a (user, exercise) pair to fetch.
///
/// Both queries bind the username, the exercise id and the question count (as
/// the row limit), and return one `GradeRow` per question ordered by question id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionQuery {
    /// Greatest submission time; the later-stored one on equal times.
    Latest,
    /// Greatest sum of grade x points; the earliest one on equal totals.
    Best,
}

impl SubmissionQuery {
    fn sql(self) -> &'static str {
        match self {
            SubmissionQuery::Latest => {
                r#"
                SELECT
                    s.SubmissionId AS SubmissionId,
                    g.QuestionId AS QuestionId,
                    g.Grade AS Grade,
                    s.SubmissionTime AS SubmissionTime
                FROM Submission s
                JOIN User u ON u.UserId = s.UserId
                JOIN QuestionGrade g ON g.SubmissionId = s.SubmissionId
                WHERE u.Username = ? AND s.ExerciseId = ?
                ORDER BY s.SubmissionTime DESC, s.SubmissionId DESC, g.QuestionId ASC
                LIMIT ?
                "#
            }
            SubmissionQuery::Best => {
                r#"
                WITH Totals AS (
                    SELECT s.SubmissionId, s.SubmissionTime, SUM(g.Grade * q.Points) AS Total
                    FROM Submission s
                    JOIN User u ON u.UserId = s.UserId
                    JOIN QuestionGrade g ON g.SubmissionId = s.SubmissionId
                    JOIN Question q
                        ON q.ExerciseId = s.ExerciseId AND q.QuestionId = g.QuestionId
                    WHERE u.Username = ? AND s.ExerciseId = ?
                    GROUP BY s.SubmissionId, s.SubmissionTime
                ),
                Best AS (
                    SELECT SubmissionId, SubmissionTime
                    FROM Totals
                    ORDER BY Total DESC, SubmissionTime ASC, SubmissionId ASC
                    LIMIT 1
                )
                SELECT
                    g.SubmissionId AS SubmissionId,
                    g.QuestionId AS QuestionId,
                    g.Grade AS Grade,
                    b.SubmissionTime AS SubmissionTime
                FROM Best b
                JOIN QuestionGrade g ON g.SubmissionId = b.SubmissionId
                ORDER BY g.QuestionId ASC
                LIMIT ?
                "#
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    pool: SqlitePool,
}

impl SubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a submission header and one grade row per question.
    ///
    /// Returns the submission id, or `None` when the user or the exercise is not
    /// stored, or when the number of grades differs from the exercise's
    /// question count. Nothing is written in those cases.
    pub async fn store_submission(&self, submission: &Submission) -> Result<Option<i64>, DbError> {
        let username = &submission.user.username;
        let exercise_id = submission.exercise.id;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            DbError::from(e)
        })?;

        let user_id: Option<i64> = sqlx::query_scalar("SELECT UserId FROM User WHERE Username = ?")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_id) = user_id else {
            tracing::warn!("Rejected submission: user '{}' does not exist", username);
            return Ok(None);
        };

        let exercise_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM Exercise WHERE ExerciseId = ?)")
                .bind(exercise_id)
                .fetch_one(&mut *tx)
                .await?;

        if !exercise_exists {
            tracing::warn!("Rejected submission: exercise {} does not exist", exercise_id);
            return Ok(None);
        }

        let question_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM Question WHERE ExerciseId = ?")
                .bind(exercise_id)
                .fetch_one(&mut *tx)
                .await?;

        if question_count != submission.grades.len() as i64 {
            tracing::warn!(
                "Rejected submission: {} grades for exercise {} with {} questions",
                submission.grades.len(),
                exercise_id,
                question_count
            );
            return Ok(None);
        }

        let submission_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO Submission (SubmissionId, UserId, ExerciseId, SubmissionTime)
            VALUES (?, ?, ?, ?)
            RETURNING SubmissionId
            "#,
        )
        .bind(submission.id)
        .bind(user_id)
        .bind(exercise_id)
        .bind(to_millis(&submission.submitted_at))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission for '{}': {:?}", username, e);
            DbError::from(e)
        })?;

        for (question_id, grade) in (1_i64..).zip(&submission.grades) {
            sqlx::query(
                "INSERT INTO QuestionGrade (SubmissionId, QuestionId, Grade) VALUES (?, ?, ?)",
            )
            .bind(submission_id)
            .bind(question_id)
            .bind(grade)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to insert grade {} of submission {}: {:?}",
                    question_id,
                    submission_id,
                    e
                );
                DbError::from(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit submission {}: {:?}", submission_id, e);
            DbError::from(e)
        })?;

        tracing::info!(
            "Stored submission {} by '{}' for exercise {}",
            submission_id,
            username,
            exercise_id
        );
        Ok(Some(submission_id))
    }

    /// The most recent submission of `exercise` by `user`, if any.
    pub async fn latest_submission(
        &self,
        user: &User,
        exercise: &Exercise,
    ) -> Result<Option<Submission>, DbError> {
        self.fetch_submission(SubmissionQuery::Latest, user, exercise).await
    }

    /// The highest-scoring submission of `exercise` by `user`, if any.
    pub async fn best_submission(
        &self,
        user: &User,
        exercise: &Exercise,
    ) -> Result<Option<Submission>, DbError> {
        self.fetch_submission(SubmissionQuery::Best, user, exercise).await
    }

    /// Runs `query` for the pair and assembles its rows into a submission.
    ///
    /// Returns `None` if the user has not submitted the exercise (or is not stored).
    pub async fn fetch_submission(
        &self,
        query: SubmissionQuery,
        user: &User,
        exercise: &Exercise,
    ) -> Result<Option<Submission>, DbError> {
        let rows = sqlx::query_as::<_, GradeRow>(query.sql())
            .bind(&user.username)
            .bind(exercise.id)
            .bind(exercise.questions.len() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch {:?} submission of '{}' for exercise {}: {:?}",
                    query,
                    user.username,
                    exercise.id,
                    e
                );
                DbError::from(e)
            })?;

        assemble_submission(rows, user, exercise)
    }
}

/// Folds the flat per-question rows into one submission with a dense grade vector.
fn assemble_submission(
    rows: Vec<GradeRow>,
    user: &User,
    exercise: &Exercise,
) -> Result<Option<Submission>, DbError> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let id = first.submission_id;
    let submitted_at = from_millis(first.submission_time)?;

    let mut grades = vec![0.0; exercise.questions.len()];
    for (slot, row) in grades.iter_mut().zip(&rows) {
        *slot = row.grade;
    }

    Ok(Some(Submission {
        id: Some(id),
        user: user.clone(),
        exercise: exercise.clone(),
        submitted_at,
        grades,
    }))
}
