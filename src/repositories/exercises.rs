// src/repositories/exercises.rs

use sqlx::{FromRow, SqlitePool};

use crate::{
    error::DbError,
    models::exercise::{Exercise, Question},
    utils::time::{from_millis, to_millis},
};

/// Helper struct for reading the 'Exercise' table.
#[derive(FromRow)]
#[sqlx(rename_all = "PascalCase")]
struct ExerciseRow {
    exercise_id: i64,
    name: String,
    due_date: i64,
}

#[derive(Debug, Clone)]
pub struct ExerciseRepository {
    pool: SqlitePool,
}

impl ExerciseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores an exercise together with its questions.
    ///
    /// Returns the exercise id, or `None` if an exercise with that id already
    /// exists (the store is left untouched). Question `i` gets `QuestionId = i + 1`.
    pub async fn add_exercise(&self, exercise: &Exercise) -> Result<Option<i64>, DbError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            DbError::from(e)
        })?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM Exercise WHERE ExerciseId = ?)")
                .bind(exercise.id)
                .fetch_one(&mut *tx)
                .await?;

        if exists {
            tracing::warn!("Exercise {} already exists", exercise.id);
            return Ok(None);
        }

        sqlx::query("INSERT INTO Exercise (ExerciseId, Name, DueDate) VALUES (?, ?, ?)")
            .bind(exercise.id)
            .bind(&exercise.name)
            .bind(to_millis(&exercise.due_date))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert exercise {}: {:?}", exercise.id, e);
                DbError::from(e)
            })?;

        for (question_id, question) in (1_i64..).zip(&exercise.questions) {
            sqlx::query(
                r#"
                INSERT INTO Question (ExerciseId, QuestionId, Name, "Desc", Points)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(exercise.id)
            .bind(question_id)
            .bind(&question.name)
            .bind(&question.desc)
            .bind(question.points)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to insert question {} of exercise {}: {:?}",
                    question_id,
                    exercise.id,
                    e
                );
                DbError::from(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit exercise {}: {:?}", exercise.id, e);
            DbError::from(e)
        })?;

        tracing::info!(
            "Added exercise {} with {} questions",
            exercise.id,
            exercise.questions.len()
        );
        Ok(Some(exercise.id))
    }

    /// All exercises sorted by id, each with its questions in stored order.
    pub async fn load_exercises(&self) -> Result<Vec<Exercise>, DbError> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            "SELECT ExerciseId, Name, DueDate FROM Exercise ORDER BY ExerciseId ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load exercises: {:?}", e);
            DbError::from(e)
        })?;

        let mut exercises = Vec::with_capacity(rows.len());
        for row in rows {
            let questions = self.load_questions(row.exercise_id).await?;
            exercises.push(Exercise {
                id: row.exercise_id,
                name: row.name,
                due_date: from_millis(row.due_date)?,
                questions,
            });
        }

        Ok(exercises)
    }

    async fn load_questions(&self, exercise_id: i64) -> Result<Vec<Question>, DbError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT Name, "Desc", Points
            FROM Question
            WHERE ExerciseId = ?
            ORDER BY QuestionId ASC
            "#,
        )
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load questions of exercise {}: {:?}", exercise_id, e);
            DbError::from(e)
        })?;

        Ok(questions)
    }
}
