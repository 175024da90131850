//! SeaORM entity for the `members` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Store-assigned monotonic sequence (BIGSERIAL), cursor ordering key
    #[sea_orm(unique)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub changed_at: DateTimeUtc,
    pub changed_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Member {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            seq: model.seq,
            email: model.email,
            name: model.name,
            age: model.age,
            created_at: model.created_at,
            created_by: model.created_by,
            changed_at: model.changed_at,
            changed_by: model.changed_by,
        }
    }
}
