use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prefix: String, // SDEV
    pub number: String, // 255
    pub name: String,
    pub program: Option<String>,
    pub description: Option<String>,
    /// Course codes, in catalog order
    pub prerequisites: Vec<String>,
    pub credit_hours_min: f64,
    pub credit_hours_max: Option<f64>,
    pub lecture_hours_min: Option<f64>,
    pub date_of_last_revision: DateTimeUtc,
    pub learning_objectives: Vec<String>,
    pub topics: Vec<String>,
    /// Number of times the course's details were viewed
    pub click_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
