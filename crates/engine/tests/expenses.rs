use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Category, Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password, role) VALUES (?, ?, 'member')",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

/// Household with alice (admin) and bob (member).
async fn household_of_two() -> (Engine, DatabaseConnection) {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;
    let nest = engine.create_household("alice", "Nest", None).await.unwrap();
    engine.join_household("bob", &nest.invite_code).await.unwrap();
    (engine, db)
}

fn splits(entries: &[(&str, i64)]) -> Vec<(String, i64)> {
    entries
        .iter()
        .map(|(username, amount)| (username.to_string(), *amount))
        .collect()
}

#[tokio::test]
async fn record_expense_requires_a_household() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;

    let err = engine
        .record_expense(
            "alice",
            "Groceries",
            100,
            Category::Food,
            None,
            &splits(&[("alice", 100)]),
            Utc::now(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NotInHousehold(_)));
}

#[tokio::test]
async fn record_expense_rejects_split_users_outside_the_household() {
    let (engine, db) = household_of_two().await;
    seed_user(&db, "carol").await;

    let err = engine
        .record_expense(
            "alice",
            "Dinner",
            90,
            Category::Food,
            None,
            &splits(&[("alice", 30), ("carol", 60)]),
            Utc::now(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Forbidden(_)));
    // The rejected expense left nothing behind.
    let expenses = engine.list_expenses("alice").await.unwrap();
    assert!(expenses.is_empty());
}

#[tokio::test]
async fn record_expense_rejects_non_positive_amount() {
    let (engine, _db) = household_of_two().await;

    let err = engine
        .record_expense(
            "alice",
            "Nothing",
            0,
            Category::Other,
            None,
            &[],
            Utc::now(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn split_sums_are_not_validated_against_the_amount() {
    let (engine, _db) = household_of_two().await;

    // Splits sum to 70, amount is 100. Stored as-is.
    let expense = engine
        .record_expense(
            "alice",
            "Utilities",
            100,
            Category::Utilities,
            None,
            &splits(&[("alice", 30), ("bob", 40)]),
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(expense.amount_minor, 100);
    assert_eq!(
        expense.splits.iter().map(|s| s.amount_minor).sum::<i64>(),
        70
    );
}

#[tokio::test]
async fn summary_for_even_split_paid_by_admin() {
    let (engine, _db) = household_of_two().await;

    engine
        .record_expense(
            "alice",
            "Groceries",
            100,
            Category::Food,
            None,
            &splits(&[("alice", 50), ("bob", 50)]),
            Utc::now(),
        )
        .await
        .unwrap();

    let summary = engine.summarize("alice").await.unwrap();
    assert_eq!(summary.total_minor, 100);
    assert_eq!(summary.by_category[&Category::Food], 100);

    let alice = &summary.user_balances["alice"];
    assert_eq!((alice.owes_minor, alice.owed_minor), (0, 50));
    let bob = &summary.user_balances["bob"];
    assert_eq!((bob.owes_minor, bob.owed_minor), (50, 0));
}

#[tokio::test]
async fn summary_accumulates_per_category() {
    let (engine, _db) = household_of_two().await;

    engine
        .record_expense(
            "alice",
            "Groceries",
            120,
            Category::Food,
            None,
            &splits(&[("alice", 60), ("bob", 60)]),
            Utc::now(),
        )
        .await
        .unwrap();
    engine
        .record_expense(
            "bob",
            "Internet",
            80,
            Category::Utilities,
            None,
            &splits(&[("alice", 40), ("bob", 40)]),
            Utc::now(),
        )
        .await
        .unwrap();

    let summary = engine.summarize("bob").await.unwrap();
    assert_eq!(summary.total_minor, 200);
    assert_eq!(summary.by_category[&Category::Food], 120);
    assert_eq!(summary.by_category[&Category::Utilities], 80);

    let alice = &summary.user_balances["alice"];
    assert_eq!((alice.owes_minor, alice.owed_minor), (40, 60));
    let bob = &summary.user_balances["bob"];
    assert_eq!((bob.owes_minor, bob.owed_minor), (60, 40));
}

#[tokio::test]
async fn expenses_are_listed_with_splits_in_submission_order() {
    let (engine, _db) = household_of_two().await;

    engine
        .record_expense(
            "alice",
            "Dinner",
            90,
            Category::Food,
            Some("Friday takeout"),
            &splits(&[("bob", 45), ("alice", 45)]),
            Utc::now(),
        )
        .await
        .unwrap();

    let expenses = engine.list_expenses("bob").await.unwrap();
    assert_eq!(expenses.len(), 1);
    let expense = &expenses[0];
    assert_eq!(expense.title, "Dinner");
    assert_eq!(expense.description.as_deref(), Some("Friday takeout"));
    let usernames: Vec<&str> = expense.splits.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(usernames, ["bob", "alice"]);
}
