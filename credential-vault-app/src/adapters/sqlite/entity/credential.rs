use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub platform: String,
    pub account_name: Option<String>,
    pub url: Option<String>,
    pub username: String,
    pub password: String,
    pub account_identity: String,
    pub account_type: String,
    pub status: String,
    pub special_pin: Option<String>,
    pub recovery_number: Option<String>,
    pub recovery_email: Option<String>,
    /// RFC3339, fixed width
    pub last_changed: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
