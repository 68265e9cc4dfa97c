use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "proctoring_violation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub session_id: String,
    pub kind: i16,
    pub details: String,
    pub warning_given: bool,
    pub occurred_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proctoring_session::Entity",
        from = "Column::SessionId",
        to = "super::proctoring_session::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ProctoringSession,
}

impl Related<super::proctoring_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProctoringSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
