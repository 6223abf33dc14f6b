//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        credit::{self, NewCredit},
        expense::{self, NewExpense},
        income::{self, NewIncome},
        user::{ProviderProfile, find_or_create_user},
    },
    entities::{
        self,
        enums::{AccountType, Frequency, PaymentPeriod, PaymentType},
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

/// Creates a user without a settings row.
///
/// # Defaults
/// * `provider_id`: `"test-<email>"`
/// * `name`: None
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    entities::user::ActiveModel {
        email: Set(email.to_string()),
        name: Set(None),
        provider_id: Set(format!("test-{email}")),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Signs a user in the way the OAuth callback does, creating default settings.
pub async fn create_signed_up_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    let profile = ProviderProfile {
        provider_id: format!("test-{email}"),
        email: email.to_string(),
        name: Some("Test User".to_string()),
    };
    Ok(find_or_create_user(db, &profile).await?.0)
}

/// Creates a test expense active in every month.
///
/// # Defaults
/// * `category`: `"Housing"`
/// * `payment_type`: automatic
/// * `frequency`: monthly
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    amount: f64,
    account_type: AccountType,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        user_id,
        NewExpense {
            name: name.to_string(),
            category: "Housing".to_string(),
            amount,
            account_type,
            payment_type: PaymentType::Automatic,
            frequency: Frequency::Monthly,
            active_months: (1..=12).collect(),
            notes: None,
        },
    )
    .await
}

/// Creates a test income record. `month` must be `YYYY-MM`.
pub async fn create_test_income(
    db: &DatabaseConnection,
    user_id: i64,
    person_name: &str,
    amount: f64,
    month: &str,
    payment_period: PaymentPeriod,
) -> Result<entities::income::Model> {
    income::create_income(
        db,
        user_id,
        NewIncome {
            person_name: person_name.to_string(),
            amount,
            month: month.parse()?,
            payment_period,
        },
    )
    .await
}

/// Creates a test account credit. `month` must be `YYYY-MM`.
///
/// # Defaults
/// * `description`: `"Test credit"`
pub async fn create_test_credit(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
    account_type: AccountType,
    month: &str,
) -> Result<entities::account_credit::Model> {
    credit::create_credit(
        db,
        user_id,
        NewCredit {
            description: "Test credit".to_string(),
            amount,
            account_type,
            month: month.parse()?,
        },
    )
    .await
}
