use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "problem")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub contest_id: Option<String>,
    pub title: String,
    pub description: String,
    pub difficulty: i16,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub test_cases: String,
    pub points: i32,
    pub is_premium: bool,
    pub boilerplate: String,
    pub company_tag: String,
    pub signature_enabled: bool,
    pub signature_name: String,
    pub signature_params: String,
    pub signature_return: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contest::Entity",
        from = "Column::ContestId",
        to = "super::contest::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Contest,
    #[sea_orm(has_many = "super::submission::Entity")]
    Submission,
}

impl Related<super::contest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
