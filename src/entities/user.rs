//! User entity - an authenticated household member.
//!
//! Users are created the first time an identity-provider login succeeds and own
//! exactly one settings row plus any number of expenses, income and credit records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Email address reported by the identity provider
    pub email: String,
    /// Display name reported by the identity provider
    pub name: Option<String>,
    /// Stable subject identifier issued by the identity provider
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub provider_id: String,
    /// When the user first signed in
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and the records it owns
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has one settings row
    #[sea_orm(has_one = "super::settings::Entity")]
    Settings,
    /// One user has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One user has many income records
    #[sea_orm(has_many = "super::income::Entity")]
    Income,
    /// One user has many account credits
    #[sea_orm(has_many = "super::account_credit::Entity")]
    AccountCredits,
}

impl Related<super::settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Income.def()
    }
}

impl Related<super::account_credit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountCredits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
