use numera::db;
use numera::domain::errors::DomainError;
use numera::models::budget;
use numera::models::budget::BudgetDto;
use numera::models::category_budget::CategoryBudgetDto;
use numera::services::budget_service;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn budget_dto(company_code: &str, fiscal_year: &str) -> BudgetDto {
    BudgetDto {
        company_code: company_code.to_string(),
        fiscal_year: fiscal_year.to_string(),
        description: None,
        amount: 1000.0,
    }
}

// Helper to insert a budget row with a fixed code
async fn create_test_budget(db: &DatabaseConnection, code: &str, company: &str, year: &str) {
    let now = chrono::Utc::now().to_rfc3339();
    budget::ActiveModel {
        budget_code: Set(code.to_string()),
        company_code: Set(company.to_string()),
        fiscal_year: Set(year.to_string()),
        description: Set(None),
        amount: Set(0.0),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert budget");
}

#[tokio::test]
async fn first_budget_code_in_a_scope_starts_at_one() {
    let db = setup_test_db().await;

    let saved = budget_service::create_budget(&db, budget_dto("EAU", "2025"))
        .await
        .expect("Create failed");

    assert_eq!(saved.budget_code, "B-EAU-25-0001");
}

#[tokio::test]
async fn budget_codes_increment_within_their_scope() {
    let db = setup_test_db().await;

    budget_service::create_budget(&db, budget_dto("EAU", "2025"))
        .await
        .expect("Create failed");
    let second = budget_service::create_budget(&db, budget_dto("EAU", "2025"))
        .await
        .expect("Create failed");

    assert_eq!(second.budget_code, "B-EAU-25-0002");

    // A different company or year is an independent scope
    let other_company = budget_service::create_budget(&db, budget_dto("XYZ", "2025"))
        .await
        .expect("Create failed");
    assert_eq!(other_company.budget_code, "B-XYZ-25-0001");

    let other_year = budget_service::create_budget(&db, budget_dto("EAU", "2026"))
        .await
        .expect("Create failed");
    assert_eq!(other_year.budget_code, "B-EAU-26-0001");
}

#[tokio::test]
async fn generation_continues_from_the_highest_existing_suffix() {
    let db = setup_test_db().await;
    create_test_budget(&db, "B-EAU-25-0005", "EAU", "2025").await;

    let code = budget_service::generate_budget_code(&db, "EAU", "2025")
        .await
        .expect("Generation failed");

    assert_eq!(code, "B-EAU-25-0006");
}

#[tokio::test]
async fn fixed_width_padding_keeps_the_text_scan_numeric() {
    let db = setup_test_db().await;
    create_test_budget(&db, "B-EAU-25-0009", "EAU", "2025").await;
    create_test_budget(&db, "B-EAU-25-0010", "EAU", "2025").await;

    // Without zero padding, '9' would sort above '10' and the scan would
    // re-issue 0010
    let code = budget_service::generate_budget_code(&db, "EAU", "2025")
        .await
        .expect("Generation failed");

    assert_eq!(code, "B-EAU-25-0011");
}

#[tokio::test]
async fn generated_budget_codes_round_trip() {
    let db = setup_test_db().await;
    create_test_budget(&db, "B-EAU-25-0041", "EAU", "2025").await;

    let code = budget_service::generate_budget_code(&db, "EAU", "2025")
        .await
        .expect("Generation failed");

    let suffix: i64 = code[code.len() - 4..].parse().expect("Suffix is not numeric");
    assert_eq!(format!("B-EAU-25-{:04}", suffix), code);
}

#[tokio::test]
async fn category_codes_are_scoped_by_department() {
    let db = setup_test_db().await;

    let it = budget_service::create_category_budget(
        &db,
        CategoryBudgetDto {
            company_code: "EAU".to_string(),
            department_code: "IT".to_string(),
            fiscal_year: "2025".to_string(),
            description: None,
            amount: 500.0,
        },
    )
    .await
    .expect("Create failed");
    assert_eq!(it.category_budget_code, "B-EAU-IT-25-0001");

    let hr = budget_service::create_category_budget(
        &db,
        CategoryBudgetDto {
            company_code: "EAU".to_string(),
            department_code: "HR".to_string(),
            fiscal_year: "2025".to_string(),
            description: None,
            amount: 500.0,
        },
    )
    .await
    .expect("Create failed");
    assert_eq!(hr.category_budget_code, "B-EAU-HR-25-0001");

    let it_again = budget_service::generate_category_budget_code(&db, "EAU", "IT", "2025")
        .await
        .expect("Generation failed");
    assert_eq!(it_again, "B-EAU-IT-25-0002");
}

#[tokio::test]
async fn fiscal_year_must_be_four_digits() {
    let db = setup_test_db().await;

    let result = budget_service::generate_budget_code(&db, "EAU", "25").await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}
