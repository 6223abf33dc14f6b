//! Expense entity - a recurring or one-off cost charged to an account.
//!
//! Expenses are never physically deleted; archiving hides them from calculations
//! while keeping the record.

use super::enums::{AccountType, Frequency, PaymentType};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Months (1-12) in which an expense is charged, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ActiveMonths(pub Vec<u32>);

impl ActiveMonths {
    /// Whether the expense is charged in `month` (1-12).
    #[must_use]
    pub fn contains(&self, month: u32) -> bool {
        self.0.contains(&month)
    }
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Short name (e.g., "Rent", "Netflix")
    pub name: String,
    /// Free-text category
    pub category: String,
    /// Amount charged in each active month
    pub amount: f64,
    /// Account the expense is paid from
    pub account_type: AccountType,
    /// Automatic or manual payment
    pub payment_type: PaymentType,
    /// Recurrence label
    pub frequency: Frequency,
    /// Months in which the expense applies
    pub active_months: ActiveMonths,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Soft delete flag
    pub is_archived: bool,
    /// When the expense was created
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
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
