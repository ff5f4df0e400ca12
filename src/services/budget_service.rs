//! Budget code generation
//!
//! Budget and category-budget codes do not use the counter table: the next
//! sequence is derived by scanning existing codes for the (company, [dept],
//! year) scope and incrementing the highest suffix. The scan orders the code
//! column descending as text, which is numerically correct only because the
//! suffix is zero-padded to a fixed four digits; suffixes past 9999 are not
//! handled. The scan and the insert must share one write transaction so two
//! generations for the same scope cannot return the same code.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::errors::DomainError;
use crate::models::budget::{self, BudgetDto, Entity as Budget};
use crate::models::category_budget::{self, CategoryBudgetDto, Entity as CategoryBudget};

/// Next budget code for a company and fiscal year, e.g. `B-EAU-25-0006`.
pub async fn generate_budget_code<C: ConnectionTrait>(
    conn: &C,
    company_code: &str,
    fiscal_year: &str,
) -> Result<String, DomainError> {
    let yy = year_suffix(fiscal_year)?;

    let pattern = format!("%{}-{}%", company_code, yy);
    let latest = Budget::find()
        .filter(budget::Column::BudgetCode.like(pattern.as_str()))
        .order_by_desc(budget::Column::BudgetCode)
        .one(conn)
        .await?;

    let next = next_suffix(latest.as_ref().map(|b| b.budget_code.as_str()))?;

    Ok(format!("B-{}-{}-{:04}", company_code, yy, next))
}

/// Next category budget code for a company, department and fiscal year,
/// e.g. `B-EAU-IT-25-0006`.
pub async fn generate_category_budget_code<C: ConnectionTrait>(
    conn: &C,
    company_code: &str,
    department_code: &str,
    fiscal_year: &str,
) -> Result<String, DomainError> {
    let yy = year_suffix(fiscal_year)?;

    let pattern = format!("%{}-{}-{}%", company_code, department_code, yy);
    let latest = CategoryBudget::find()
        .filter(category_budget::Column::CategoryBudgetCode.like(pattern.as_str()))
        .order_by_desc(category_budget::Column::CategoryBudgetCode)
        .one(conn)
        .await?;

    let next = next_suffix(latest.as_ref().map(|b| b.category_budget_code.as_str()))?;

    Ok(format!(
        "B-{}-{}-{}-{:04}",
        company_code, department_code, yy, next
    ))
}

/// Create a budget row with a freshly generated code.
pub async fn create_budget(
    db: &DatabaseConnection,
    dto: BudgetDto,
) -> Result<budget::Model, DomainError> {
    if dto.company_code.trim().is_empty() {
        return Err(DomainError::Validation(
            "Company code must not be empty".to_string(),
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Mint the code while holding the write transaction
    let code = generate_budget_code(&txn, &dto.company_code, &dto.fiscal_year).await?;

    // 2. Insert the budget row
    let new_budget = budget::ActiveModel {
        budget_code: Set(code),
        company_code: Set(dto.company_code),
        fiscal_year: Set(dto.fiscal_year),
        description: Set(dto.description),
        amount: Set(dto.amount),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = new_budget.insert(&txn).await?;

    txn.commit().await?;

    Ok(saved)
}

/// Create a category budget row with a freshly generated code.
pub async fn create_category_budget(
    db: &DatabaseConnection,
    dto: CategoryBudgetDto,
) -> Result<category_budget::Model, DomainError> {
    if dto.company_code.trim().is_empty() || dto.department_code.trim().is_empty() {
        return Err(DomainError::Validation(
            "Company and department codes must not be empty".to_string(),
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Mint the code while holding the write transaction
    let code = generate_category_budget_code(
        &txn,
        &dto.company_code,
        &dto.department_code,
        &dto.fiscal_year,
    )
    .await?;

    // 2. Insert the category budget row
    let new_budget = category_budget::ActiveModel {
        category_budget_code: Set(code),
        company_code: Set(dto.company_code),
        department_code: Set(dto.department_code),
        fiscal_year: Set(dto.fiscal_year),
        description: Set(dto.description),
        amount: Set(dto.amount),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = new_budget.insert(&txn).await?;

    txn.commit().await?;

    Ok(saved)
}

/// Two-digit suffix of a four-digit fiscal year.
fn year_suffix(fiscal_year: &str) -> Result<&str, DomainError> {
    if fiscal_year.len() != 4 || !fiscal_year.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::Validation(format!(
            "Fiscal year must be four digits, got '{}'",
            fiscal_year
        )));
    }
    Ok(&fiscal_year[2..])
}

/// The sequence after the one encoded in the trailing four characters of the
/// latest matching code; 1 when no code matched.
fn next_suffix(latest_code: Option<&str>) -> Result<i64, DomainError> {
    let Some(code) = latest_code else {
        return Ok(1);
    };

    let chars: Vec<char> = code.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    let prior: i64 = tail.parse().map_err(|_| {
        DomainError::Validation(format!("Malformed code suffix in '{}'", code))
    })?;

    Ok(prior + 1)
}
