use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub is_active: bool,
    pub first_prize: i64,
    pub second_prize: i64,
    pub third_prize: i64,
    pub requires_proctoring: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::problem::Entity")]
    Problem,
    #[sea_orm(has_many = "super::participant::Entity")]
    Participant,
    #[sea_orm(has_many = "super::proctoring_session::Entity")]
    ProctoringSession,
}

impl Related<super::problem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Problem.def()
    }
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participant.def()
    }
}

impl Related<super::proctoring_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProctoringSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
