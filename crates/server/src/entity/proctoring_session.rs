use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "proctoring_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub contest_id: String,
    pub face_detected: bool,
    pub faces_count: i32,
    pub details: String,
    pub is_monitoring_active: bool,
    pub violation_count: i32,
    pub warning_count: i32,
    pub contest_terminated: bool,
    pub practice_mode: bool,
    pub last_face_check: Option<DateTime>,
    pub monitoring_started_at: Option<DateTime>,
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
    #[sea_orm(has_many = "super::proctoring_violation::Entity")]
    ProctoringViolation,
}

impl Related<super::contest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::proctoring_violation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProctoringViolation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
