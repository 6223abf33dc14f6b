//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account_credit;
pub mod enums;
pub mod expense;
pub mod income;
pub mod settings;
pub mod user;

// Re-export specific types to avoid conflicts
pub use account_credit::{
    Column as AccountCreditColumn, Entity as AccountCredit, Model as AccountCreditModel,
};
pub use enums::{AccountType, Frequency, PaymentPeriod, PaymentType, SavingsAssignment};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
pub use settings::{Column as SettingsColumn, Entity as Settings, Model as SettingsModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
