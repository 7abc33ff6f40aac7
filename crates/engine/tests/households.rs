use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, Role};
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

async fn stored_household_id(db: &DatabaseConnection, username: &str) -> Option<String> {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT household_id FROM users WHERE username = ?",
            vec![username.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "household_id").unwrap()
}

#[tokio::test]
async fn create_household_makes_caller_sole_admin() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;

    let household = engine
        .create_household("alice", "Nest", Some("shared flat"))
        .await
        .unwrap();

    assert_eq!(household.invite_code.len(), 6);
    assert!(
        household
            .invite_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
    assert_eq!(household.admin_id, "alice");
    assert_eq!(household.members.len(), 1);
    assert_eq!(household.members[0].role, Role::Admin);
    assert_eq!(
        stored_household_id(&db, "alice").await,
        Some(household.id.clone())
    );
}

#[tokio::test]
async fn create_fails_when_already_in_a_household() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;

    engine.create_household("alice", "Nest", None).await.unwrap();
    let err = engine
        .create_household("alice", "Second", None)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::AlreadyMember(_)));
}

#[tokio::test]
async fn create_rejects_blank_name() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;

    let err = engine.create_household("alice", "  ", None).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn join_with_invite_code_keeps_creator_admin() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let created = engine.create_household("alice", "Nest", None).await.unwrap();
    let joined = engine
        .join_household("bob", &created.invite_code)
        .await
        .unwrap();

    assert_eq!(joined.id, created.id);
    assert_eq!(joined.admin_id, "alice");
    assert_eq!(joined.members.len(), 2);
    assert_eq!(joined.member("bob").map(|m| m.role), Some(Role::Member));
    assert_eq!(joined.member("alice").map(|m| m.role), Some(Role::Admin));
}

#[tokio::test]
async fn join_with_unknown_code_is_not_found() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "bob").await;

    let err = engine.join_household("bob", "ZZZZZZ").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn join_fails_when_already_in_a_household() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let nest = engine.create_household("alice", "Nest", None).await.unwrap();
    engine.create_household("bob", "Den", None).await.unwrap();

    let err = engine
        .join_household("bob", &nest.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyMember(_)));
}

#[tokio::test]
async fn join_with_stale_membership_row_is_a_duplicate() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let nest = engine.create_household("alice", "Nest", None).await.unwrap();

    // A membership row without the matching users.household_id write-back,
    // as a half-applied mutation would leave behind.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO household_members (household_id, username, role, joined_at) VALUES (?, ?, 'member', ?)",
        vec![nest.id.clone().into(), "bob".into(), Utc::now().into()],
    ))
    .await
    .unwrap();

    let err = engine
        .join_household("bob", &nest.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateMembership(_)));
}

#[tokio::test]
async fn leave_without_household_fails() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;

    let err = engine.leave_household("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::NotInHousehold(_)));
}

#[tokio::test]
async fn sole_member_leave_deletes_the_household() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let nest = engine.create_household("alice", "Nest", None).await.unwrap();
    engine.leave_household("alice").await.unwrap();

    assert_eq!(stored_household_id(&db, "alice").await, None);
    // Deletion is terminal: the code no longer resolves.
    let err = engine
        .join_household("bob", &nest.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.household_snapshot("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::NotInHousehold(_)));
}

#[tokio::test]
async fn admin_leave_promotes_first_remaining_member() {
    let (engine, db) = engine_with_db().await;
    for name in ["alice", "bob", "carol"] {
        seed_user(&db, name).await;
    }

    let nest = engine.create_household("alice", "Nest", None).await.unwrap();
    engine.join_household("bob", &nest.invite_code).await.unwrap();
    engine
        .join_household("carol", &nest.invite_code)
        .await
        .unwrap();

    engine.leave_household("alice").await.unwrap();

    let household = engine.household_snapshot("bob").await.unwrap();
    // Bob joined before Carol, so he is the first remaining member.
    assert_eq!(household.admin_id, "bob");
    assert_eq!(household.member("bob").map(|m| m.role), Some(Role::Admin));
    assert_eq!(household.members.len(), 2);
    assert!(household.member("alice").is_none());
    assert_eq!(stored_household_id(&db, "alice").await, None);

    // The former admin can start over.
    engine.create_household("alice", "Roost", None).await.unwrap();
}

#[tokio::test]
async fn non_admin_leave_keeps_the_admin() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let nest = engine.create_household("alice", "Nest", None).await.unwrap();
    engine.join_household("bob", &nest.invite_code).await.unwrap();
    engine.leave_household("bob").await.unwrap();

    let household = engine.household_snapshot("alice").await.unwrap();
    assert_eq!(household.admin_id, "alice");
    assert_eq!(household.members.len(), 1);
    assert_eq!(stored_household_id(&db, "bob").await, None);
}

#[tokio::test]
async fn invite_codes_are_unique_across_households() {
    let (engine, db) = engine_with_db().await;

    let mut codes = HashSet::new();
    for i in 0..20 {
        let username = format!("user{i}");
        seed_user(&db, &username).await;
        let household = engine
            .create_household(&username, &format!("Home {i}"), None)
            .await
            .unwrap();
        assert_eq!(household.invite_code.len(), 6);
        codes.insert(household.invite_code);
    }

    assert_eq!(codes.len(), 20);
}
