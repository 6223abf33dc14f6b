//! Account credit entity - money returned to an account in a given month
//! (reimbursements, refunds).
use super::enums::AccountType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account credit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_credits")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the credit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// What the credit is for
    pub description: String,
    /// Amount credited
    pub amount: f64,
    /// Account receiving the credit
    pub account_type: AccountType,
    /// Month the credit applies to, `YYYY-MM`
    pub month: String,
    /// When the credit was created
    pub created_at: DateTimeUtc,
    /// When the credit was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `AccountCredit` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each credit belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
