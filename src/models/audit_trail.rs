use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_trails")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub actor_id: String,
    pub module: String,
    pub old_data: Option<String>,
    pub new_data: String,
    pub execution_type: String, // 'INSERT', 'UPDATE', 'DELETE'
    pub executed_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
