//! Income business logic - per-person, per-pay-period income records.
//!
//! Reads by month go through [`crate::core::ledger`] so an empty month shows the
//! previous month's income until it is either entered or applied.

use crate::{
    core::{
        expense::validate_amount,
        ledger::{self, LedgerEntry, MonthlyLedger, MonthlyRecord},
        month::Month,
    },
    entities::{Income, enums::PaymentPeriod, income},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Input for creating an income record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewIncome {
    /// Whose income this is
    pub person_name: String,
    /// Amount received
    pub amount: f64,
    /// Month the income belongs to
    pub month: Month,
    /// Pay period within the month
    pub payment_period: PaymentPeriod,
}

/// Partial income update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncomeUpdate {
    /// New person name
    pub person_name: Option<String>,
    /// New amount
    pub amount: Option<f64>,
    /// Move to another month
    pub month: Option<Month>,
    /// New pay period
    pub payment_period: Option<PaymentPeriod>,
}

fn validate_person_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("personName", "Person name is required"));
    }
    Ok(())
}

impl NewIncome {
    /// Validates the input.
    pub fn validate(&self) -> Result<()> {
        validate_person_name(&self.person_name)?;
        validate_amount(self.amount)
    }
}

impl IncomeUpdate {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.person_name {
            validate_person_name(name)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

/// Income totals for one exact month (no inheritance).
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    /// The month summarized
    pub month: String,
    /// Every income record stored for that month
    pub incomes: Vec<income::Model>,
    /// Sum of all amounts
    pub total: f64,
}

impl MonthlyRecord for income::Model {
    fn month(&self) -> &str {
        &self.month
    }

    fn set_month(&mut self, month: String) {
        self.month = month;
    }
}

/// Income storage as seen by the inheritance logic.
pub struct IncomeLedger;

#[async_trait]
impl MonthlyLedger for IncomeLedger {
    type Record = income::Model;

    const NAME: &'static str = "income";

    async fn find_for_month(
        db: &DatabaseConnection,
        user_id: i64,
        month: &Month,
    ) -> Result<Vec<income::Model>> {
        get_income_for_month(db, user_id, month).await
    }

    async fn find_all(db: &DatabaseConnection, user_id: i64) -> Result<Vec<income::Model>> {
        Income::find()
            .filter(income::Column::UserId.eq(user_id))
            .order_by_desc(income::Column::Month)
            .order_by_asc(income::Column::PersonName)
            .order_by_asc(income::Column::PaymentPeriod)
            .all(db)
            .await
            .map_err(Into::into)
    }

    async fn copy_to_month(
        db: &DatabaseConnection,
        user_id: i64,
        source: &income::Model,
        month: &Month,
    ) -> Result<income::Model> {
        insert_income(
            db,
            user_id,
            source.person_name.clone(),
            source.amount,
            month,
            source.payment_period,
        )
        .await
    }
}

async fn insert_income(
    db: &DatabaseConnection,
    user_id: i64,
    person_name: String,
    amount: f64,
    month: &Month,
    payment_period: PaymentPeriod,
) -> Result<income::Model> {
    let now = Utc::now();
    let model = income::ActiveModel {
        user_id: Set(user_id),
        person_name: Set(person_name),
        amount: Set(amount),
        month: Set(month.to_string()),
        payment_period: Set(payment_period),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Stored income rows for exactly `month`, ordered by person then pay period.
pub async fn get_income_for_month(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<Vec<income::Model>> {
    Income::find()
        .filter(income::Column::UserId.eq(user_id))
        .filter(income::Column::Month.eq(month.to_string()))
        .order_by_asc(income::Column::PersonName)
        .order_by_asc(income::Column::PaymentPeriod)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists income with previous-month inheritance; see [`ledger::read_with_inheritance`].
pub async fn get_income(
    db: &DatabaseConnection,
    user_id: i64,
    month: Option<&Month>,
) -> Result<Vec<LedgerEntry<income::Model>>> {
    ledger::read_with_inheritance::<IncomeLedger>(db, user_id, month).await
}

/// Finds one income record owned by `user_id`.
pub async fn get_income_by_id(
    db: &DatabaseConnection,
    user_id: i64,
    income_id: i64,
) -> Result<Option<income::Model>> {
    Income::find_by_id(income_id)
        .filter(income::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates an income record.
#[instrument(skip(db, input))]
pub async fn create_income(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewIncome,
) -> Result<income::Model> {
    input.validate()?;
    let created = insert_income(
        db,
        user_id,
        input.person_name.trim().to_string(),
        input.amount,
        &input.month,
        input.payment_period,
    )
    .await?;
    info!(income_id = created.id, month = %input.month, "Income created");
    Ok(created)
}

/// Applies a partial update to an income record owned by `user_id`.
#[instrument(skip(db, update))]
pub async fn update_income(
    db: &DatabaseConnection,
    user_id: i64,
    income_id: i64,
    update: IncomeUpdate,
) -> Result<income::Model> {
    update.validate()?;
    let existing = get_income_by_id(db, user_id, income_id)
        .await?
        .ok_or_else(|| Error::not_found("Income record", income_id))?;

    let mut active: income::ActiveModel = existing.into();
    if let Some(v) = update.person_name {
        active.person_name = Set(v.trim().to_string());
    }
    if let Some(v) = update.amount {
        active.amount = Set(v);
    }
    if let Some(v) = update.month {
        active.month = Set(v.to_string());
    }
    if let Some(v) = update.payment_period {
        active.payment_period = Set(v);
    }
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Deletes an income record owned by `user_id`, returning what was deleted.
#[instrument(skip(db))]
pub async fn delete_income(
    db: &DatabaseConnection,
    user_id: i64,
    income_id: i64,
) -> Result<income::Model> {
    let existing = get_income_by_id(db, user_id, income_id)
        .await?
        .ok_or_else(|| Error::not_found("Income record", income_id))?;
    existing.clone().delete(db).await?;
    info!(income_id, "Income deleted");
    Ok(existing)
}

/// Stored income for exactly `month` with its total.
pub async fn get_month_summary(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<MonthSummary> {
    let incomes = get_income_for_month(db, user_id, month).await?;
    let total = incomes.iter().map(|i| i.amount).sum();
    Ok(MonthSummary {
        month: month.to_string(),
        incomes,
        total,
    })
}

/// Copies the previous month's income into `month`; see [`ledger::apply_inherited`].
pub async fn apply_inherited_income(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<Vec<income::Model>> {
    ledger::apply_inherited::<IncomeLedger>(db, user_id, month).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_income_validation() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let bad_name = NewIncome {
            person_name: " ".to_string(),
            amount: 10.0,
            month: month("2024-03"),
            payment_period: PaymentPeriod::Part1,
        };
        assert!(create_income(&db, 1, bad_name).await.is_err());

        let zero = NewIncome {
            person_name: "Alex".to_string(),
            amount: 0.0,
            month: month("2024-03"),
            payment_period: PaymentPeriod::Part1,
        };
        assert!(matches!(
            create_income(&db, 1, zero).await,
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_month_inherits_previous() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        create_test_income(&db, user.id, "Alex", 3000.0, "2024-03", PaymentPeriod::Part1).await?;
        create_test_income(&db, user.id, "Alex", 3000.0, "2024-03", PaymentPeriod::Part2).await?;

        let april = get_income(&db, user.id, Some(&month("2024-04"))).await?;
        assert_eq!(april.len(), 2);
        for entry in &april {
            assert!(entry.is_inherited);
            assert_eq!(entry.record.month, "2024-04");
            assert_eq!(entry.original_month.as_deref(), Some("2024-03"));
        }

        // Read path never persists the inherited rows
        assert!(get_income_for_month(&db, user.id, &month("2024-04")).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_month_with_records_does_not_inherit() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        create_test_income(&db, user.id, "Alex", 3000.0, "2024-03", PaymentPeriod::Part1).await?;
        let own =
            create_test_income(&db, user.id, "Sam", 2000.0, "2024-04", PaymentPeriod::Part2).await?;

        let april = get_income(&db, user.id, Some(&month("2024-04"))).await?;
        assert_eq!(april.len(), 1);
        assert!(!april[0].is_inherited);
        assert!(april[0].original_month.is_none());
        assert_eq!(april[0].record, own);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_month_returns_everything() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        create_test_income(&db, user.id, "Alex", 1.0, "2024-01", PaymentPeriod::Part1).await?;
        create_test_income(&db, user.id, "Alex", 2.0, "2024-02", PaymentPeriod::Part1).await?;

        let all = get_income(&db, user.id, None).await?;
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|e| !e.is_inherited));
        assert_eq!(all[0].record.month, "2024-02");
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_inherited_copies_and_duplicates_on_repeat() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        let source =
            create_test_income(&db, user.id, "Alex", 3000.0, "2023-12", PaymentPeriod::Part2).await?;

        let applied = apply_inherited_income(&db, user.id, &month("2024-01")).await?;
        assert_eq!(applied.len(), 1);
        assert_ne!(applied[0].id, source.id);
        assert_eq!(applied[0].month, "2024-01");
        assert_eq!(applied[0].person_name, "Alex");
        assert_eq!(applied[0].amount, 3000.0);
        assert_eq!(applied[0].payment_period, PaymentPeriod::Part2);

        // No idempotence guard: a second apply copies again.
        apply_inherited_income(&db, user.id, &month("2024-01")).await?;
        let january = get_income_for_month(&db, user.id, &month("2024-01")).await?;
        assert_eq!(january.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_inherited_with_nothing_to_copy() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        let applied = apply_inherited_income(&db, user.id, &month("2024-05")).await?;
        assert!(applied.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_delete_and_summary() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        let first =
            create_test_income(&db, user.id, "Alex", 1000.0, "2024-06", PaymentPeriod::Part1).await?;
        create_test_income(&db, user.id, "Sam", 500.0, "2024-06", PaymentPeriod::Part1).await?;

        let updated = update_income(
            &db,
            user.id,
            first.id,
            IncomeUpdate {
                amount: Some(1500.0),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.amount, 1500.0);

        let summary = get_month_summary(&db, user.id, &month("2024-06")).await?;
        assert_eq!(summary.incomes.len(), 2);
        assert_eq!(summary.total, 2000.0);

        let deleted = delete_income(&db, user.id, first.id).await?;
        assert_eq!(deleted.id, first.id);
        assert!(get_income_by_id(&db, user.id, first.id).await?.is_none());
        assert!(matches!(
            delete_income(&db, user.id, first.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
