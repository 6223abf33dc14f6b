//! String-backed enums shared by several tables.
//!
//! Each enum is stored as its snake_case string so the database stays readable and
//! the JSON wire format matches the stored value exactly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The four money buckets expenses are charged to and credits are applied to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Everyday checking account
    #[sea_orm(string_value = "checking")]
    Checking,
    /// Credit card
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Personal line of credit
    #[sea_orm(string_value = "line_of_credit")]
    LineOfCredit,
    /// Student line of credit
    #[sea_orm(string_value = "student_line_of_credit")]
    StudentLineOfCredit,
}

/// Whether an expense is paid automatically or by hand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Pre-authorized debit
    #[sea_orm(string_value = "automatic")]
    Automatic,
    /// Paid manually each time
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// How often an expense recurs. Informational only: the amount charged in an
/// active month is always the full amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every three months
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Once a year
    #[sea_orm(string_value = "yearly")]
    Yearly,
    /// Arbitrary set of months
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// One of the two pay periods a person's monthly income is split into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentPeriod {
    /// First paycheck of the month
    #[sea_orm(string_value = "part1")]
    Part1,
    /// Second paycheck of the month
    #[sea_orm(string_value = "part2")]
    Part2,
}

/// Who funds a savings goal.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SavingsAssignment {
    /// Entirely funded by person 1
    #[sea_orm(string_value = "person1")]
    Person1,
    /// Entirely funded by person 2
    #[sea_orm(string_value = "person2")]
    Person2,
    /// Split by the household ratio
    #[default]
    #[sea_orm(string_value = "shared")]
    Shared,
}
