//! Expense business logic - Handles all expense-related operations.
//!
//! Provides functions for listing, creating, updating, and archiving expenses. Every
//! lookup filters on both the record id and the owning user, so a record belonging
//! to someone else behaves exactly like a missing one.

use crate::{
    entities::{
        Expense,
        enums::{AccountType, Frequency, PaymentType},
        expense::{self, ActiveMonths},
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

const MAX_NAME_LEN: usize = 255;

/// Input for creating an expense.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewExpense {
    /// Short name
    pub name: String,
    /// Free-text category
    pub category: String,
    /// Amount charged per active month
    pub amount: f64,
    /// Account the expense is paid from
    pub account_type: AccountType,
    /// Automatic or manual
    pub payment_type: PaymentType,
    /// Recurrence label
    pub frequency: Frequency,
    /// Months (1-12) the expense applies to
    pub active_months: Vec<u32>,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial expense update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpenseUpdate {
    /// New name
    pub name: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New amount
    pub amount: Option<f64>,
    /// New account
    pub account_type: Option<AccountType>,
    /// New payment type
    pub payment_type: Option<PaymentType>,
    /// New frequency
    pub frequency: Option<Frequency>,
    /// Replacement set of active months
    pub active_months: Option<Vec<u32>>,
    /// Replacement notes
    pub notes: Option<String>,
    /// Archive or restore
    pub is_archived: Option<bool>,
}

/// Filters accepted by [`list_expenses`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilters {
    /// Exact category match
    pub category: Option<String>,
    /// Only this account
    pub account_type: Option<AccountType>,
    /// Only this payment type
    pub payment_type: Option<PaymentType>,
    /// `"true"` lists archived expenses instead of active ones
    pub is_archived: Option<String>,
    /// Case-insensitive substring match on name or notes
    pub search: Option<String>,
}

impl ExpenseFilters {
    fn archived(&self) -> bool {
        self.is_archived.as_deref() == Some("true")
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::validation("category", "Category is required"));
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Validates a set of active months and returns it sorted and de-duplicated.
fn normalize_active_months(months: &[u32]) -> Result<ActiveMonths> {
    if months.is_empty() {
        return Err(Error::validation(
            "activeMonths",
            "At least one month must be selected",
        ));
    }
    if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(Error::validation(
            "activeMonths",
            format!("{bad} is not a month between 1 and 12"),
        ));
    }
    let mut sorted = months.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    Ok(ActiveMonths(sorted))
}

impl NewExpense {
    /// Validates every field; returns the normalized active months on success.
    pub fn validate(&self) -> Result<ActiveMonths> {
        validate_name(&self.name)?;
        validate_category(&self.category)?;
        validate_amount(self.amount)?;
        normalize_active_months(&self.active_months)
    }
}

impl ExpenseUpdate {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<Option<ActiveMonths>> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        self.active_months
            .as_deref()
            .map(normalize_active_months)
            .transpose()
    }
}

/// Lists a user's expenses matching `filters`, newest first.
#[instrument(skip(db))]
pub async fn list_expenses(
    db: &DatabaseConnection,
    user_id: i64,
    filters: &ExpenseFilters,
) -> Result<Vec<expense::Model>> {
    let mut query = Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(expense::Column::IsArchived.eq(filters.archived()));

    if let Some(category) = &filters.category {
        query = query.filter(expense::Column::Category.eq(category.as_str()));
    }
    if let Some(account_type) = filters.account_type {
        query = query.filter(expense::Column::AccountType.eq(account_type));
    }
    if let Some(payment_type) = filters.payment_type {
        query = query.filter(expense::Column::PaymentType.eq(payment_type));
    }

    let mut expenses = query
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?;

    // Literal match with full Unicode case folding; SQL LIKE gives neither.
    if let Some(needle) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        expenses.retain(|e| matches_search(e, &needle));
    }
    Ok(expenses)
}

/// Case-insensitive substring match on name or notes. `needle` must already be lowercase.
fn matches_search(expense: &expense::Model, needle: &str) -> bool {
    expense.name.to_lowercase().contains(needle)
        || expense
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

/// All unarchived expenses for a user; the input to the monthly calculation.
pub async fn get_active_expenses(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(expense::Column::IsArchived.eq(false))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one expense owned by `user_id`.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    user_id: i64,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .filter(expense::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new expense after validating the input.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_expense(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewExpense,
) -> Result<expense::Model> {
    let active_months = input.validate()?;
    let now = Utc::now();

    let model = expense::ActiveModel {
        user_id: Set(user_id),
        name: Set(input.name.trim().to_string()),
        category: Set(input.category.trim().to_string()),
        amount: Set(input.amount),
        account_type: Set(input.account_type),
        payment_type: Set(input.payment_type),
        frequency: Set(input.frequency),
        active_months: Set(active_months),
        notes: Set(input.notes),
        is_archived: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(expense_id = created.id, "Expense created");
    Ok(created)
}

/// Applies a partial update to an expense owned by `user_id`.
#[instrument(skip(db, update))]
pub async fn update_expense(
    db: &DatabaseConnection,
    user_id: i64,
    expense_id: i64,
    update: ExpenseUpdate,
) -> Result<expense::Model> {
    let active_months = update.validate()?;

    let existing = get_expense_by_id(db, user_id, expense_id)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))?;

    let mut active: expense::ActiveModel = existing.into();
    if let Some(v) = update.name {
        active.name = Set(v.trim().to_string());
    }
    if let Some(v) = update.category {
        active.category = Set(v.trim().to_string());
    }
    if let Some(v) = update.amount {
        active.amount = Set(v);
    }
    if let Some(v) = update.account_type {
        active.account_type = Set(v);
    }
    if let Some(v) = update.payment_type {
        active.payment_type = Set(v);
    }
    if let Some(v) = update.frequency {
        active.frequency = Set(v);
    }
    if let Some(v) = active_months {
        active.active_months = Set(v);
    }
    if let Some(v) = update.notes {
        active.notes = Set(Some(v));
    }
    if let Some(v) = update.is_archived {
        active.is_archived = Set(v);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Soft-deletes an expense by archiving it. The row is kept.
#[instrument(skip(db))]
pub async fn archive_expense(
    db: &DatabaseConnection,
    user_id: i64,
    expense_id: i64,
) -> Result<expense::Model> {
    let existing = get_expense_by_id(db, user_id, expense_id)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))?;

    let mut active: expense::ActiveModel = existing.into();
    active.is_archived = Set(true);
    active.updated_at = Set(Utc::now());
    let archived = active.update(db).await?;
    info!(expense_id, "Expense archived");
    Ok(archived)
}

/// Distinct categories across all of a user's expenses, archived included.
pub async fn get_categories(db: &DatabaseConnection, user_id: i64) -> Result<Vec<String>> {
    Expense::find()
        .select_only()
        .column(expense::Column::Category)
        .distinct()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_asc(expense::Column::Category)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}
