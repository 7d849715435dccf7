use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login name, unique across accounts (max 100 chars, enforced at the API).
    #[sea_orm(column_name = "user_name", unique)]
    pub username: String,

    /// Argon2id password hash in PHC string form. Never the plaintext.
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
