use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub screen_id: String,
    pub description: Option<String>,
    pub prefix: String,
    pub separator: String,
    pub date_format: Option<String>,
    pub digit_width: i32,
    pub max_length: i32,
    pub format_style: String, // 'master_data', 'transactional'
    pub sequence_value: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
