use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub ingredients: String,
    pub portion_size: String,
    pub portion_unit: String,
    pub logged_at: DateTimeWithTimeZone,
    pub overall_risk: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub fodmap: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub nutrition: Option<Json>,
    pub user_feedback: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
