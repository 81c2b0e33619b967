//! Attachment entity (uploaded report images).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Original file name
    pub name: String,

    /// MIME content type
    pub content_type: String,

    /// File size in bytes
    pub size: i64,

    /// Public URL
    pub url: String,

    /// Storage key within the backend
    pub storage_key: String,

    /// MD5 hash of the content
    pub md5: String,

    /// Image width in pixels
    #[sea_orm(nullable)]
    pub width: Option<i32>,

    /// Image height in pixels
    #[sea_orm(nullable)]
    pub height: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
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
