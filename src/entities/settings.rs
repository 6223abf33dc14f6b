//! Settings entity - per-user household configuration.
//!
//! Holds the two people's names, the split ratio, current account balances,
//! monthly savings goals and their assignment, and the email allowlist.

use super::enums::SavingsAssignment;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// List of email addresses, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct EmailList(pub Vec<String>);

/// Settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the settings row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; each user has at most one settings row
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Label for the first person
    pub person1_name: String,
    /// Label for the second person
    pub person2_name: String,
    /// Percentage of shared costs carried by person 1
    pub split_ratio_person1: i32,
    /// Percentage of shared costs carried by person 2
    pub split_ratio_person2: i32,
    /// Derive the ratio from each month's income instead of the stored values
    pub auto_calculate_split_ratio: bool,
    /// Current checking balance
    pub checking_balance: f64,
    /// Current credit card balance (negative means debt)
    pub credit_card_balance: f64,
    /// Current line of credit balance (negative means debt)
    pub line_of_credit_balance: f64,
    /// Current student line of credit balance (negative means debt)
    pub student_line_of_credit_balance: f64,
    /// Monthly travel savings goal
    pub travel_savings: f64,
    /// Monthly home savings goal
    pub home_savings: f64,
    /// Monthly general savings goal
    pub general_savings: f64,
    /// Who funds the travel goal
    pub travel_savings_assigned_to: SavingsAssignment,
    /// Who funds the home goal
    pub home_savings_assigned_to: SavingsAssignment,
    /// Who funds the general goal
    pub general_savings_assigned_to: SavingsAssignment,
    /// Emails allowed to access this household
    pub authorized_emails: EmailList,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Settings and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each settings row belongs to one user
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
