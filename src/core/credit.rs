//! Account credit business logic.
//!
//! Credits are money coming back into an account for a month (refunds,
//! reimbursements). They share month inheritance with income.

use crate::{
    core::{
        expense::validate_amount,
        ledger::{self, LedgerEntry, MonthlyLedger, MonthlyRecord},
        month::Month,
    },
    entities::{AccountCredit, account_credit, enums::AccountType},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Input for creating a credit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCredit {
    /// What the credit is for
    pub description: String,
    /// Amount credited
    pub amount: f64,
    /// Account receiving the credit
    pub account_type: AccountType,
    /// Month the credit applies to
    pub month: Month,
}

/// Partial credit update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreditUpdate {
    /// New description
    pub description: Option<String>,
    /// New amount
    pub amount: Option<f64>,
    /// New account
    pub account_type: Option<AccountType>,
    /// Move the credit to another month
    pub month: Option<Month>,
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::validation("description", "Description is required"));
    }
    Ok(())
}

impl NewCredit {
    /// Validates the input.
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }
}

impl CreditUpdate {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

/// Sum of one month's credits per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTotals {
    /// Checking account credits
    pub checking: f64,
    /// Credit card credits
    pub credit_card: f64,
    /// Line of credit credits
    pub line_of_credit: f64,
    /// Student line of credit credits
    pub student_line_of_credit: f64,
}

impl CreditTotals {
    /// Total for one account.
    #[must_use]
    pub fn for_account(&self, account: AccountType) -> f64 {
        match account {
            AccountType::Checking => self.checking,
            AccountType::CreditCard => self.credit_card,
            AccountType::LineOfCredit => self.line_of_credit,
            AccountType::StudentLineOfCredit => self.student_line_of_credit,
        }
    }

    fn add(&mut self, account: AccountType, amount: f64) {
        let slot = match account {
            AccountType::Checking => &mut self.checking,
            AccountType::CreditCard => &mut self.credit_card,
            AccountType::LineOfCredit => &mut self.line_of_credit,
            AccountType::StudentLineOfCredit => &mut self.student_line_of_credit,
        };
        *slot += amount;
    }
}

impl<'a> FromIterator<&'a account_credit::Model> for CreditTotals {
    fn from_iter<I: IntoIterator<Item = &'a account_credit::Model>>(iter: I) -> Self {
        let mut totals = Self::default();
        for credit in iter {
            totals.add(credit.account_type, credit.amount);
        }
        totals
    }
}

impl MonthlyRecord for account_credit::Model {
    fn month(&self) -> &str {
        &self.month
    }

    fn set_month(&mut self, month: String) {
        self.month = month;
    }
}

/// Account credit storage as seen by the inheritance logic.
pub struct CreditLedger;

#[async_trait]
impl MonthlyLedger for CreditLedger {
    type Record = account_credit::Model;

    const NAME: &'static str = "account credit";

    async fn find_for_month(
        db: &DatabaseConnection,
        user_id: i64,
        month: &Month,
    ) -> Result<Vec<account_credit::Model>> {
        get_credits_for_month(db, user_id, month).await
    }

    async fn find_all(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Vec<account_credit::Model>> {
        AccountCredit::find()
            .filter(account_credit::Column::UserId.eq(user_id))
            .order_by_desc(account_credit::Column::Month)
            .order_by_desc(account_credit::Column::CreatedAt)
            .order_by_desc(account_credit::Column::Id)
            .all(db)
            .await
            .map_err(Into::into)
    }

    async fn copy_to_month(
        db: &DatabaseConnection,
        user_id: i64,
        source: &account_credit::Model,
        month: &Month,
    ) -> Result<account_credit::Model> {
        insert_credit(
            db,
            user_id,
            source.description.clone(),
            source.amount,
            source.account_type,
            month,
        )
        .await
    }
}

async fn insert_credit(
    db: &DatabaseConnection,
    user_id: i64,
    description: String,
    amount: f64,
    account_type: AccountType,
    month: &Month,
) -> Result<account_credit::Model> {
    let now = Utc::now();
    account_credit::ActiveModel {
        user_id: Set(user_id),
        description: Set(description),
        amount: Set(amount),
        account_type: Set(account_type),
        month: Set(month.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Stored credits for exactly `month`, newest first.
pub async fn get_credits_for_month(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<Vec<account_credit::Model>> {
    AccountCredit::find()
        .filter(account_credit::Column::UserId.eq(user_id))
        .filter(account_credit::Column::Month.eq(month.to_string()))
        .order_by_desc(account_credit::Column::CreatedAt)
        .order_by_desc(account_credit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists credits with previous-month inheritance.
pub async fn get_credits(
    db: &DatabaseConnection,
    user_id: i64,
    month: Option<&Month>,
) -> Result<Vec<LedgerEntry<account_credit::Model>>> {
    ledger::read_with_inheritance::<CreditLedger>(db, user_id, month).await
}

/// Looks up a credit owned by `user_id`.
pub async fn get_credit_by_id(
    db: &DatabaseConnection,
    user_id: i64,
    credit_id: i64,
) -> Result<Option<account_credit::Model>> {
    AccountCredit::find_by_id(credit_id)
        .filter(account_credit::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a credit.
#[instrument(skip(db, input))]
pub async fn create_credit(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewCredit,
) -> Result<account_credit::Model> {
    input.validate()?;
    let created = insert_credit(
        db,
        user_id,
        input.description.trim().to_string(),
        input.amount,
        input.account_type,
        &input.month,
    )
    .await?;
    info!(credit_id = created.id, month = %input.month, "Account credit created");
    Ok(created)
}

/// Applies a partial update to a credit owned by `user_id`.
#[instrument(skip(db, update))]
pub async fn update_credit(
    db: &DatabaseConnection,
    user_id: i64,
    credit_id: i64,
    update: CreditUpdate,
) -> Result<account_credit::Model> {
    update.validate()?;
    let existing = get_credit_by_id(db, user_id, credit_id)
        .await?
        .ok_or_else(|| Error::not_found("Account credit", credit_id))?;

    let mut active: account_credit::ActiveModel = existing.into();
    if let Some(v) = update.description {
        active.description = Set(v.trim().to_string());
    }
    if let Some(v) = update.amount {
        active.amount = Set(v);
    }
    if let Some(v) = update.account_type {
        active.account_type = Set(v);
    }
    if let Some(v) = update.month {
        active.month = Set(v.to_string());
    }
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a credit owned by `user_id`, returning what was deleted.
#[instrument(skip(db))]
pub async fn delete_credit(
    db: &DatabaseConnection,
    user_id: i64,
    credit_id: i64,
) -> Result<account_credit::Model> {
    let existing = get_credit_by_id(db, user_id, credit_id)
        .await?
        .ok_or_else(|| Error::not_found("Account credit", credit_id))?;
    existing.clone().delete(db).await?;
    info!(credit_id, "Account credit deleted");
    Ok(existing)
}

/// Per-account credit totals for exactly `month`. Accounts with no credits are 0.
pub async fn get_credit_totals(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<CreditTotals> {
    let credits = get_credits_for_month(db, user_id, month).await?;
    Ok(credits.iter().collect())
}

/// Copies the previous month's credits into `month`.
pub async fn apply_inherited_credits(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<Vec<account_credit::Model>> {
    ledger::apply_inherited::<CreditLedger>(db, user_id, month).await
}
