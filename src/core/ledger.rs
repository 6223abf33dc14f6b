//! Month-to-month inheritance shared by the income and account-credit ledgers.
//!
//! Reading a month that has no records falls back to the previous month's records,
//! relabelled for display. Nothing is written on that path. Writing the inherited
//! records for real is a separate, explicit operation ([`apply_inherited`]).

use crate::{core::month::Month, errors::Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A record that belongs to a single month.
pub trait MonthlyRecord: Clone + Send + Sync {
    /// The record's month as stored, `YYYY-MM`.
    fn month(&self) -> &str;

    /// Overwrites the record's month (display only, never persisted by the read path).
    fn set_month(&mut self, month: String);
}

/// Storage operations a ledger must provide to get inheritance behaviour.
#[async_trait]
pub trait MonthlyLedger: Send + Sync {
    /// Stored record type.
    type Record: MonthlyRecord;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Records for one month, in display order.
    async fn find_for_month(
        db: &DatabaseConnection,
        user_id: i64,
        month: &Month,
    ) -> Result<Vec<Self::Record>>;

    /// Every record across all months, in display order.
    async fn find_all(db: &DatabaseConnection, user_id: i64) -> Result<Vec<Self::Record>>;

    /// Inserts a copy of `source` dated `month`, with a fresh identity.
    async fn copy_to_month(
        db: &DatabaseConnection,
        user_id: i64,
        source: &Self::Record,
        month: &Month,
    ) -> Result<Self::Record>;
}

/// A record as returned by the read path, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry<T> {
    /// The record itself; `month` is the requested month when inherited
    #[serde(flatten)]
    pub record: T,
    /// True when the record was surfaced from the previous month
    pub is_inherited: bool,
    /// The month the inherited record really belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_month: Option<String>,
}

impl<T: MonthlyRecord> LedgerEntry<T> {
    fn own(record: T) -> Self {
        Self {
            record,
            is_inherited: false,
            original_month: None,
        }
    }

    fn inherited(mut record: T, requested: &Month) -> Self {
        let original = record.month().to_string();
        record.set_month(requested.to_string());
        Self {
            record,
            is_inherited: true,
            original_month: Some(original),
        }
    }
}

/// Reads a ledger with inheritance.
///
/// * `month = None`: every record, none inherited.
/// * `month = Some(m)` with records in `m`: those records, none inherited.
/// * `month = Some(m)` with no records: the records of `m - 1`, relabelled to `m`
///   and marked inherited. Empty if `m - 1` is empty too.
#[instrument(skip(db), fields(ledger = L::NAME))]
pub async fn read_with_inheritance<L: MonthlyLedger>(
    db: &DatabaseConnection,
    user_id: i64,
    month: Option<&Month>,
) -> Result<Vec<LedgerEntry<L::Record>>> {
    let Some(month) = month else {
        let all = L::find_all(db, user_id).await?;
        return Ok(all.into_iter().map(LedgerEntry::own).collect());
    };

    let current = L::find_for_month(db, user_id, month).await?;
    if !current.is_empty() {
        return Ok(current.into_iter().map(LedgerEntry::own).collect());
    }

    let previous_month = month.previous();
    let previous = L::find_for_month(db, user_id, &previous_month).await?;
    debug!(
        requested = %month,
        previous = %previous_month,
        count = previous.len(),
        "No records for month, falling back to previous month"
    );
    Ok(previous
        .into_iter()
        .map(|record| LedgerEntry::inherited(record, month))
        .collect())
}

/// Materializes the previous month's records as real rows dated `month`.
///
/// Each copy is inserted independently; there is no surrounding transaction and no
/// duplicate guard, so applying twice copies twice. Returns an empty list when the
/// previous month has nothing to copy.
#[instrument(skip(db), fields(ledger = L::NAME))]
pub async fn apply_inherited<L: MonthlyLedger>(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<Vec<L::Record>> {
    let previous = L::find_for_month(db, user_id, &month.previous()).await?;
    if previous.is_empty() {
        return Ok(Vec::new());
    }

    let created = try_join_all(
        previous
            .iter()
            .map(|record| L::copy_to_month(db, user_id, record, month)),
    )
    .await?;

    info!(
        month = %month,
        count = created.len(),
        "Applied inherited {} records",
        L::NAME
    );
    Ok(created)
}
