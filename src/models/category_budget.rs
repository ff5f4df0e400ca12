use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_budget_code: String,
    pub company_code: String,
    pub department_code: String,
    pub fiscal_year: String,
    pub description: Option<String>,
    pub amount: f64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryBudgetDto {
    pub company_code: String,
    pub department_code: String,
    pub fiscal_year: String,
    pub description: Option<String>,
    pub amount: f64,
}
