use sea_orm::DatabaseConnection;

use crate::domain::errors::DomainError;
use crate::models::budget::BudgetDto;
use crate::models::category_budget::CategoryBudgetDto;
use crate::models::vendor::VendorDto;
use crate::services::{budget_service, vendor_service};

/// Seed demo master data through the service layer, so seeding exercises the
/// same numbering and audit path as any other caller.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    if vendor_service::count_vendors(db).await? > 0 {
        tracing::info!("Demo data already present, skipping seed");
        return Ok(());
    }

    // 1. Vendors
    let vendors = vec![
        VendorDto {
            name: "Acme Supplies".to_string(),
            email: Some("sales@acme.example".to_string()),
            phone: Some("+1-555-0101".to_string()),
            address: Some("1 Industrial Way".to_string()),
            city: Some("Springfield".to_string()),
            country: Some("US".to_string()),
        },
        VendorDto {
            name: "Globex Logistics".to_string(),
            email: Some("contact@globex.example".to_string()),
            phone: None,
            address: None,
            city: Some("Rotterdam".to_string()),
            country: Some("NL".to_string()),
        },
        VendorDto {
            name: "Initech Services".to_string(),
            email: None,
            phone: None,
            address: None,
            city: None,
            country: None,
        },
    ];

    for dto in vendors {
        vendor_service::create_vendor(db, "system", dto).await?;
    }

    // 2. Budgets
    budget_service::create_budget(
        db,
        BudgetDto {
            company_code: "EAU".to_string(),
            fiscal_year: "2025".to_string(),
            description: Some("Operations".to_string()),
            amount: 250_000.0,
        },
    )
    .await?;

    budget_service::create_category_budget(
        db,
        CategoryBudgetDto {
            company_code: "EAU".to_string(),
            department_code: "IT".to_string(),
            fiscal_year: "2025".to_string(),
            description: Some("Infrastructure".to_string()),
            amount: 80_000.0,
        },
    )
    .await?;

    Ok(())
}
