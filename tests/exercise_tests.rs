// tests/exercise_tests.rs

use chrono::{DateTime, Utc};
use gradebook::{Database, models::exercise::Exercise};

async fn open_db() -> Database {
    Database::open("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

fn at(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap()
}

fn sample_exercise(id: i64, name: &str) -> Exercise {
    let mut exercise = Exercise::new(id, name, at(1_700_000_000_123));
    exercise.add_question("Warm-up", "Print hello world", 5);
    exercise.add_question("Loops", "Sum the numbers 1..n", 10);
    exercise.add_question("Recursion", "Compute fibonacci", 20);
    exercise
}

#[tokio::test]
async fn add_exercise_returns_its_id() {
    let db = open_db().await;
    let id = db
        .exercises()
        .add_exercise(&sample_exercise(11, "Basics"))
        .await
        .unwrap();
    assert_eq!(id, Some(11));
}

#[tokio::test]
async fn added_exercise_loads_back_equal() {
    let db = open_db().await;
    let exercises = db.exercises();
    let exercise = sample_exercise(1, "Basics");

    exercises.add_exercise(&exercise).await.unwrap();

    let loaded = exercises.load_exercises().await.unwrap();
    assert_eq!(loaded, vec![exercise]);
}

#[tokio::test]
async fn duplicate_id_is_rejected_without_changes() {
    let db = open_db().await;
    let exercises = db.exercises();
    let original = sample_exercise(5, "Original");

    assert_eq!(exercises.add_exercise(&original).await.unwrap(), Some(5));

    let mut impostor = Exercise::new(5, "Impostor", at(42));
    impostor.add_question("Extra", "Should never be stored", 99);
    assert_eq!(exercises.add_exercise(&impostor).await.unwrap(), None);

    let loaded = exercises.load_exercises().await.unwrap();
    assert_eq!(loaded, vec![original]);

    let question_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Question")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(question_count, 3);
}

#[tokio::test]
async fn load_exercises_is_sorted_by_id() {
    let db = open_db().await;
    let exercises = db.exercises();

    for (id, name) in [(30, "Thirty"), (10, "Ten"), (20, "Twenty")] {
        exercises.add_exercise(&sample_exercise(id, name)).await.unwrap();
    }

    let loaded = exercises.load_exercises().await.unwrap();
    let ids: Vec<i64> = loaded.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert!(loaded.iter().all(|e| e.questions.len() == 3));
}

#[tokio::test]
async fn exercise_without_questions_round_trips() {
    let db = open_db().await;
    let exercises = db.exercises();
    let empty = Exercise::new(2, "Reading", at(0));

    assert_eq!(exercises.add_exercise(&empty).await.unwrap(), Some(2));
    assert_eq!(exercises.load_exercises().await.unwrap(), vec![empty]);
}

#[tokio::test]
async fn questions_stay_with_their_exercise() {
    let db = open_db().await;
    let exercises = db.exercises();

    let mut first = Exercise::new(1, "First", at(1_000));
    first.add_question("Only", "Belongs to first", 1);
    let mut second = Exercise::new(2, "Second", at(2_000));
    second.add_question("A", "Belongs to second", 2);
    second.add_question("B", "Also second", 3);

    exercises.add_exercise(&second).await.unwrap();
    exercises.add_exercise(&first).await.unwrap();

    let loaded = exercises.load_exercises().await.unwrap();
    assert_eq!(loaded, vec![first, second]);
}

#[tokio::test]
async fn empty_store_loads_nothing() {
    let db = open_db().await;
    assert!(db.exercises().load_exercises().await.unwrap().is_empty());
}

#[tokio::test]
async fn due_date_from_clock_round_trips() {
    let db = open_db().await;
    let exercises = db.exercises();

    // The clock has sub-millisecond precision; the store does not
    let mut exercise = Exercise::new(4, "Deadline", Utc::now());
    exercise.add_question("Now", "Submit before the clock runs out", 1);

    exercises.add_exercise(&exercise).await.unwrap();

    let loaded = exercises.load_exercises().await.unwrap();
    assert_eq!(loaded, vec![exercise]);
}
