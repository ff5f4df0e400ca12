use futures::future::join_all;
use numera::db;
use numera::domain::errors::DomainError;
use numera::models::counter;
use numera::services::numbering_service;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serial_test::serial;

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a file-backed test database, for tests that need more
// than one connection (transactions held open, concurrent tasks)
async fn setup_file_db(name: &str) -> DatabaseConnection {
    let path = std::env::temp_dir().join(format!("numera_test_{}.db", name));
    let _ = std::fs::remove_file(&path);
    db::init_db(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to init DB")
}

// Helper to insert a counter definition
async fn create_test_counter(
    db: &DatabaseConnection,
    screen_id: &str,
    prefix: &str,
    format_style: &str,
    date_format: Option<&str>,
    sequence_value: Option<i64>,
) {
    let now = chrono::Utc::now().to_rfc3339();
    counter::ActiveModel {
        screen_id: Set(screen_id.to_string()),
        description: Set(None),
        prefix: Set(prefix.to_string()),
        separator: Set("-".to_string()),
        date_format: Set(date_format.map(|s| s.to_string())),
        digit_width: Set(4),
        max_length: Set(20),
        format_style: Set(format_style.to_string()),
        sequence_value: Set(sequence_value),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert counter");
}

#[tokio::test]
async fn sequential_allocations_are_strictly_increasing_and_gap_free() {
    let db = setup_test_db().await;
    create_test_counter(&db, "QT", "QT", "transactional", Some("YYMMDD"), None).await;

    let mut values = Vec::new();
    for _ in 0..5 {
        values.push(
            numbering_service::allocate(&db, "QT")
                .await
                .expect("Allocation failed"),
        );
    }

    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn allocation_continues_from_the_stored_value() {
    let db = setup_test_db().await;
    create_test_counter(&db, "USR", "MS", "master_data", None, Some(41)).await;

    let value = numbering_service::allocate(&db, "USR")
        .await
        .expect("Allocation failed");

    assert_eq!(value, 42);
}

#[tokio::test]
async fn allocation_fails_for_unknown_screen() {
    let db = setup_test_db().await;

    let result = numbering_service::allocate(&db, "NOPE").await;

    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn next_code_renders_master_data_codes() {
    let db = setup_test_db().await;
    create_test_counter(&db, "USR", "MS", "master_data", None, Some(6)).await;

    let today = chrono::NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    let code = numbering_service::next_code(&db, "USR", today)
        .await
        .expect("next_code failed");

    assert_eq!(code, "USR-0007");
}

#[tokio::test]
async fn next_code_renders_transactional_codes() {
    let db = setup_test_db().await;

    // The INV counter is seeded by the migrations; move it to 11 so the next
    // allocation yields 12
    counter::ActiveModel {
        screen_id: Set("INV".to_string()),
        sequence_value: Set(Some(11)),
        ..Default::default()
    }
    .update(&db)
    .await
    .expect("Failed to update counter");

    let today = chrono::NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    let code = numbering_service::next_code(&db, "INV", today)
        .await
        .expect("next_code failed");

    assert_eq!(code, "INV--250309-0012");
}

#[tokio::test]
async fn next_code_fails_for_unknown_screen() {
    let db = setup_test_db().await;

    let today = chrono::NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    let result = numbering_service::next_code(&db, "NOPE", today).await;

    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
#[serial]
async fn rolled_back_transaction_discards_the_allocation() {
    let db = setup_file_db("rollback").await;
    create_test_counter(&db, "RB", "RB", "transactional", Some("YYMMDD"), None).await;

    let txn = db.begin().await.expect("Failed to begin transaction");
    let inside = numbering_service::allocate(&txn, "RB")
        .await
        .expect("Allocation failed");
    assert_eq!(inside, 1);
    txn.rollback().await.expect("Rollback failed");

    // The discarded allocation must be re-issued
    let after = numbering_service::allocate(&db, "RB")
        .await
        .expect("Allocation failed");
    assert_eq!(after, 1);
}

#[tokio::test]
#[serial]
async fn concurrent_allocations_yield_distinct_covering_values() {
    let db = setup_file_db("concurrent").await;
    create_test_counter(&db, "CC", "CC", "transactional", Some("YYMMDD"), None).await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                numbering_service::allocate(&db, "CC")
                    .await
                    .expect("Allocation failed")
            })
        })
        .collect();

    let mut values: Vec<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|res| res.expect("Task panicked"))
        .collect();
    values.sort_unstable();

    assert_eq!(values, (1..=8).collect::<Vec<i64>>());
}
