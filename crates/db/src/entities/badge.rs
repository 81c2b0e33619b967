//! Badge entity. Badges are non-revocable: created once, never mutated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Badge types awarded for activity milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum BadgeType {
    /// First report submitted.
    #[sea_orm(string_value = "firstReport")]
    FirstReport,
    /// Five comments posted.
    #[sea_orm(string_value = "helper")]
    Helper,
    /// Two of the user's reports confirmed resolved.
    #[sea_orm(string_value = "resolver")]
    Resolver,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "badge")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    pub badge_type: BadgeType,

    pub awarded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
