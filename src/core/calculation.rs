//! Monthly calculation engine.
//!
//! Turns a user's expenses, income, settings and credits for one month into a
//! per-account, per-person breakdown of who pays what out of which paycheck.
//! Everything below [`get_month_calculations`] is pure arithmetic.

use crate::{
    core::{
        credit::{self, CreditTotals},
        expense, income,
        month::Month,
        settings::{default_settings, find_settings},
    },
    entities::{
        ExpenseModel, IncomeModel, SettingsModel,
        enums::{AccountType, PaymentPeriod, PaymentType, SavingsAssignment},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// Expense sums for one account in one month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountTotals {
    /// Everything charged to the account
    pub total: f64,
    /// Portion paid automatically
    pub automatic: f64,
    /// Portion paid by hand
    pub manual: f64,
}

/// Sums the unarchived expenses charged to `account` in `month` (1-12).
///
/// Every active expense contributes its full amount regardless of frequency;
/// nothing is divided across the year.
#[must_use]
pub fn calculate_account_total(
    expenses: &[ExpenseModel],
    account: AccountType,
    month: u32,
) -> AccountTotals {
    expenses
        .iter()
        .filter(|e| !e.is_archived && e.account_type == account && e.active_months.contains(month))
        .fold(AccountTotals::default(), |mut totals, e| {
            totals.total += e.amount;
            match e.payment_type {
                PaymentType::Automatic => totals.automatic += e.amount,
                PaymentType::Manual => totals.manual += e.amount,
            }
            totals
        })
}

/// Percentages of shared costs carried by each person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitRatio {
    /// Person 1's percentage
    pub person1: i32,
    /// Person 2's percentage
    pub person2: i32,
}

impl SplitRatio {
    /// The ratio stored in settings.
    #[must_use]
    pub const fn from_settings(settings: &SettingsModel) -> Self {
        Self {
            person1: settings.split_ratio_person1,
            person2: settings.split_ratio_person2,
        }
    }

    /// Ratio proportional to each person's income, or `None` when nobody earned
    /// anything. Person 1's share is rounded; person 2 gets the remainder.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_income(income: &IncomeBreakdown) -> Option<Self> {
        let combined = income.total();
        if combined <= 0.0 {
            return None;
        }
        // Bounded to 0..=100 by construction.
        let person1 = (income.person1.total() / combined * 100.0).round() as i32;
        Some(Self {
            person1,
            person2: 100 - person1,
        })
    }

    const fn sole(assignment: SavingsAssignment) -> Option<Self> {
        match assignment {
            SavingsAssignment::Person1 => Some(Self {
                person1: 100,
                person2: 0,
            }),
            SavingsAssignment::Person2 => Some(Self {
                person1: 0,
                person2: 100,
            }),
            SavingsAssignment::Shared => None,
        }
    }
}

/// One person's income for the month, split by pay period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodIncome {
    /// Received in the first pay period
    pub part1: f64,
    /// Received in the second pay period
    pub part2: f64,
}

impl PeriodIncome {
    /// Both periods combined.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.part1 + self.part2
    }

    /// Fractions of the month's income received in each period. 50/50 when the
    /// person earned nothing.
    fn period_ratios(&self) -> (f64, f64) {
        let total = self.total();
        if total > 0.0 {
            (self.part1 / total, self.part2 / total)
        } else {
            (0.5, 0.5)
        }
    }

    fn add(&mut self, period: PaymentPeriod, amount: f64) {
        match period {
            PaymentPeriod::Part1 => self.part1 += amount,
            PaymentPeriod::Part2 => self.part2 += amount,
        }
    }
}

/// Both people's income for the month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeBreakdown {
    /// Income matched to person 1
    pub person1: PeriodIncome,
    /// Income matched to person 2
    pub person2: PeriodIncome,
}

impl IncomeBreakdown {
    /// Combined income of both people.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.person1.total() + self.person2.total()
    }
}

/// Buckets income rows by person and pay period.
///
/// Rows are matched by exact name against the two settings names; rows for
/// anyone else are ignored.
#[must_use]
pub fn bucket_income(incomes: &[IncomeModel], settings: &SettingsModel) -> IncomeBreakdown {
    let mut breakdown = IncomeBreakdown::default();
    for row in incomes {
        if row.person_name == settings.person1_name {
            breakdown.person1.add(row.payment_period, row.amount);
        } else if row.person_name == settings.person2_name {
            breakdown.person2.add(row.payment_period, row.amount);
        } else {
            debug!(person = %row.person_name, "Income row matches neither person, skipped");
        }
    }
    breakdown
}

/// The ratio used for this month: income-derived when auto-calculation is on and
/// there is income, the stored ratio otherwise.
#[must_use]
pub fn effective_split_ratio(settings: &SettingsModel, income: &IncomeBreakdown) -> SplitRatio {
    if settings.auto_calculate_split_ratio {
        if let Some(ratio) = SplitRatio::from_income(income) {
            return ratio;
        }
    }
    SplitRatio::from_settings(settings)
}

/// What one person pays toward an amount, by pay period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PersonContribution {
    /// Owed out of the first pay period
    pub part1: f64,
    /// Owed out of the second pay period
    pub part2: f64,
    /// `part1 + part2`
    pub total: f64,
}

impl PersonContribution {
    fn split(share: f64, income: &PeriodIncome) -> Self {
        let (part1_ratio, part2_ratio) = income.period_ratios();
        Self {
            part1: share * part1_ratio,
            part2: share * part2_ratio,
            total: share,
        }
    }
}

impl std::ops::Add for PersonContribution {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            part1: self.part1 + rhs.part1,
            part2: self.part2 + rhs.part2,
            total: self.total + rhs.total,
        }
    }
}

impl std::iter::Sum for PersonContribution {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), std::ops::Add::add)
    }
}

/// Both people's contributions toward one amount.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contributions {
    /// Person 1's part
    pub person1: PersonContribution,
    /// Person 2's part
    pub person2: PersonContribution,
}

/// Splits `total_amount` by `ratio`, then splits each person's share across their
/// pay periods in proportion to when they were paid.
#[must_use]
pub fn calculate_account_contributions(
    total_amount: f64,
    ratio: SplitRatio,
    income: &IncomeBreakdown,
) -> Contributions {
    let person1_share = total_amount * f64::from(ratio.person1) / 100.0;
    let person2_share = total_amount * f64::from(ratio.person2) / 100.0;
    Contributions {
        person1: PersonContribution::split(person1_share, &income.person1),
        person2: PersonContribution::split(person2_share, &income.person2),
    }
}

/// Breakdown for one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCalculation {
    /// Expenses charged this month
    pub total_expenses: f64,
    /// Automatic part of `total_expenses`
    pub automatic_payments: f64,
    /// Manual part of `total_expenses`
    pub manual_payments: f64,
    /// Person 1's contribution
    pub person1_share: PersonContribution,
    /// Person 2's contribution
    pub person2_share: PersonContribution,
    /// Balance from settings
    pub current_balance: f64,
    /// Credits recorded against the account this month
    pub credits: f64,
    /// `current_balance - total_expenses + credits`
    pub balance_after_expenses: f64,
}

/// Breakdown for one savings goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// Monthly target
    pub goal: f64,
    /// Who funds it
    pub assigned_to: SavingsAssignment,
    /// Person 1's contribution
    pub person1_share: PersonContribution,
    /// Person 2's contribution
    pub person2_share: PersonContribution,
}

/// All three savings goals and their per-person totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsCalculation {
    /// Travel fund
    pub travel: SavingsGoal,
    /// Home fund
    pub home: SavingsGoal,
    /// General savings
    pub general: SavingsGoal,
    /// Sum of the three goals
    pub total_goal: f64,
    /// Person 1's contribution across all goals
    pub person1_total: PersonContribution,
    /// Person 2's contribution across all goals
    pub person2_total: PersonContribution,
}

/// Income, contribution and leftover for one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    /// Income for the month
    pub total_income: f64,
    /// Income in the first pay period
    pub income_part1: f64,
    /// Income in the second pay period
    pub income_part2: f64,
    /// Owed across all accounts and savings
    pub total_contribution: f64,
    /// Owed out of the first pay period
    pub contribution_part1: f64,
    /// Owed out of the second pay period
    pub contribution_part2: f64,
    /// `total_income - total_contribution`
    pub remaining: f64,
    /// Left over from the first pay period
    pub remaining_after_part1: f64,
    /// Left over from the second pay period
    pub remaining_after_part2: f64,
}

impl PersonSummary {
    fn new(income: &PeriodIncome, contribution: &PersonContribution) -> Self {
        Self {
            total_income: income.total(),
            income_part1: income.part1,
            income_part2: income.part2,
            total_contribution: contribution.total,
            contribution_part1: contribution.part1,
            contribution_part2: contribution.part2,
            remaining: income.total() - contribution.total,
            remaining_after_part1: income.part1 - contribution.part1,
            remaining_after_part2: income.part2 - contribution.part2,
        }
    }
}

/// The full result for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCalculation {
    /// `YYYY-MM`
    pub month: String,
    /// The ratio actually applied, after any auto-calculation
    pub split_ratio: SplitRatio,
    /// Checking account
    pub checking: AccountCalculation,
    /// Credit card
    pub credit_card: AccountCalculation,
    /// Line of credit
    pub line_of_credit: AccountCalculation,
    /// Student line of credit
    pub student_line_of_credit: AccountCalculation,
    /// Savings goals
    pub savings: SavingsCalculation,
    /// Both people's income
    pub total_income: f64,
    /// Account expenses plus the savings goals
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub balance: f64,
    /// Person 1's summary
    pub person1: PersonSummary,
    /// Person 2's summary
    pub person2: PersonSummary,
}

const fn current_balance(settings: &SettingsModel, account: AccountType) -> f64 {
    match account {
        AccountType::Checking => settings.checking_balance,
        AccountType::CreditCard => settings.credit_card_balance,
        AccountType::LineOfCredit => settings.line_of_credit_balance,
        AccountType::StudentLineOfCredit => settings.student_line_of_credit_balance,
    }
}

fn account_calculation(
    expenses: &[ExpenseModel],
    account: AccountType,
    month: u32,
    ratio: SplitRatio,
    income: &IncomeBreakdown,
    settings: &SettingsModel,
    credits: &CreditTotals,
) -> AccountCalculation {
    let totals = calculate_account_total(expenses, account, month);
    let shares = calculate_account_contributions(totals.total, ratio, income);
    let balance = current_balance(settings, account);
    let credited = credits.for_account(account);
    AccountCalculation {
        total_expenses: totals.total,
        automatic_payments: totals.automatic,
        manual_payments: totals.manual,
        person1_share: shares.person1,
        person2_share: shares.person2,
        current_balance: balance,
        credits: credited,
        balance_after_expenses: balance - totals.total + credited,
    }
}

fn savings_goal(
    goal: f64,
    assigned_to: SavingsAssignment,
    shared_ratio: SplitRatio,
    income: &IncomeBreakdown,
) -> SavingsGoal {
    let ratio = SplitRatio::sole(assigned_to).unwrap_or(shared_ratio);
    let shares = calculate_account_contributions(goal, ratio, income);
    SavingsGoal {
        goal,
        assigned_to,
        person1_share: shares.person1,
        person2_share: shares.person2,
    }
}

/// Combines already-loaded data into the month's breakdown.
#[must_use]
pub fn build_monthly_calculation(
    month: &Month,
    expenses: &[ExpenseModel],
    incomes: &[IncomeModel],
    settings: &SettingsModel,
    credits: &CreditTotals,
) -> MonthlyCalculation {
    let income = bucket_income(incomes, settings);
    let ratio = effective_split_ratio(settings, &income);
    let month_number = month.number();

    let account = |kind| {
        account_calculation(expenses, kind, month_number, ratio, &income, settings, credits)
    };
    let checking = account(AccountType::Checking);
    let credit_card = account(AccountType::CreditCard);
    let line_of_credit = account(AccountType::LineOfCredit);
    let student_line_of_credit = account(AccountType::StudentLineOfCredit);

    let travel = savings_goal(
        settings.travel_savings,
        settings.travel_savings_assigned_to,
        ratio,
        &income,
    );
    let home = savings_goal(
        settings.home_savings,
        settings.home_savings_assigned_to,
        ratio,
        &income,
    );
    let general = savings_goal(
        settings.general_savings,
        settings.general_savings_assigned_to,
        ratio,
        &income,
    );
    let goals = [&travel, &home, &general];
    let savings = SavingsCalculation {
        total_goal: goals.iter().map(|g| g.goal).sum(),
        person1_total: goals.iter().map(|g| g.person1_share).sum(),
        person2_total: goals.iter().map(|g| g.person2_share).sum(),
        travel,
        home,
        general,
    };

    let accounts = [&checking, &credit_card, &line_of_credit, &student_line_of_credit];
    let account_expenses: f64 = accounts.iter().map(|a| a.total_expenses).sum();
    let person1_contribution =
        accounts.iter().map(|a| a.person1_share).sum::<PersonContribution>() + savings.person1_total;
    let person2_contribution =
        accounts.iter().map(|a| a.person2_share).sum::<PersonContribution>() + savings.person2_total;

    let total_income = income.total();
    let total_expenses = account_expenses + savings.total_goal;

    MonthlyCalculation {
        month: month.to_string(),
        split_ratio: ratio,
        person1: PersonSummary::new(&income.person1, &person1_contribution),
        person2: PersonSummary::new(&income.person2, &person2_contribution),
        checking,
        credit_card,
        line_of_credit,
        student_line_of_credit,
        savings,
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}

/// Loads everything the engine needs for `month` and runs it.
///
/// The four reads are independent and issued concurrently. Missing settings fall
/// back to the in-memory defaults; nothing is written.
#[instrument(skip(db))]
pub async fn get_month_calculations(
    db: &DatabaseConnection,
    user_id: i64,
    month: &Month,
) -> Result<MonthlyCalculation> {
    let (expenses, incomes, settings, credits) = tokio::try_join!(
        expense::get_active_expenses(db, user_id),
        income::get_income_for_month(db, user_id, month),
        find_settings(db, user_id),
        credit::get_credit_totals(db, user_id, month),
    )?;
    let settings = settings.unwrap_or_else(|| default_settings(user_id, None));

    debug!(
        expenses = expenses.len(),
        incomes = incomes.len(),
        "Loaded calculation inputs"
    );
    Ok(build_monthly_calculation(
        month, &expenses, &incomes, &settings, &credits,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{enums::Frequency, expense::ActiveMonths};
    use crate::test_utils::*;
    use chrono::Utc;

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn expense(amount: f64, account: AccountType, payment: PaymentType, months: &[u32]) -> ExpenseModel {
        ExpenseModel {
            id: 1,
            user_id: 1,
            name: "Test".to_string(),
            category: "Test".to_string(),
            amount,
            account_type: account,
            payment_type: payment,
            frequency: Frequency::Monthly,
            active_months: ActiveMonths(months.to_vec()),
            notes: None,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn income_row(person: &str, amount: f64, period: PaymentPeriod) -> IncomeModel {
        IncomeModel {
            id: 1,
            user_id: 1,
            person_name: person.to_string(),
            amount,
            month: "2024-03".to_string(),
            payment_period: period,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn settings_with_zero_savings() -> SettingsModel {
        let mut settings = default_settings(1, None);
        settings.travel_savings = 0.0;
        settings.home_savings = 0.0;
        settings.general_savings = 0.0;
        settings
    }

    fn all_months() -> Vec<u32> {
        (1..=12).collect()
    }

    #[test]
    fn test_account_total_excludes_inactive_months() {
        let expenses = vec![
            expense(100.0, AccountType::Checking, PaymentType::Automatic, &[1, 2, 3]),
            expense(50.0, AccountType::Checking, PaymentType::Manual, &[6]),
            expense(25.0, AccountType::CreditCard, PaymentType::Manual, &[3]),
        ];
        let march = calculate_account_total(&expenses, AccountType::Checking, 3);
        assert_eq!(march.total, 100.0);
        assert_eq!(march.automatic, 100.0);
        assert_eq!(march.manual, 0.0);

        let june = calculate_account_total(&expenses, AccountType::Checking, 6);
        assert_eq!(june.total, 50.0);
        assert_eq!(june.manual, 50.0);

        assert_eq!(
            calculate_account_total(&expenses, AccountType::Checking, 9),
            AccountTotals::default()
        );
    }

    #[test]
    fn test_yearly_expense_charges_full_amount() {
        // Named "prorated" in older versions, but the whole amount lands in each active month.
        let mut yearly = expense(1200.0, AccountType::Checking, PaymentType::Manual, &[4]);
        yearly.frequency = Frequency::Yearly;
        let totals = calculate_account_total(&[yearly], AccountType::Checking, 4);
        assert_eq!(totals.total, 1200.0);
    }

    #[test]
    fn test_archived_expenses_ignored() {
        let mut archived = expense(10.0, AccountType::Checking, PaymentType::Manual, &all_months());
        archived.is_archived = true;
        assert_eq!(
            calculate_account_total(&[archived], AccountType::Checking, 1).total,
            0.0
        );
    }

    #[test]
    fn test_shares_sum_to_total_and_parts_sum_to_share() {
        let income = IncomeBreakdown {
            person1: PeriodIncome {
                part1: 1234.5,
                part2: 987.25,
            },
            person2: PeriodIncome {
                part1: 0.0,
                part2: 3100.0,
            },
        };
        for person1 in 0..=100 {
            let ratio = SplitRatio {
                person1,
                person2: 100 - person1,
            };
            let c = calculate_account_contributions(777.77, ratio, &income);
            assert!(approx(c.person1.total + c.person2.total, 777.77));
            assert!(approx(c.person1.part1 + c.person1.part2, c.person1.total));
            assert!(approx(c.person2.part1 + c.person2.part2, c.person2.total));
        }
    }

    #[test]
    fn test_zero_income_splits_evenly() {
        let ratio = SplitRatio {
            person1: 60,
            person2: 40,
        };
        let c = calculate_account_contributions(100.0, ratio, &IncomeBreakdown::default());
        assert_eq!(c.person1.part1, 30.0);
        assert_eq!(c.person1.part2, 30.0);
        assert_eq!(c.person2.part1, 20.0);
        assert_eq!(c.person2.part2, 20.0);
    }

    #[test]
    fn test_unmatched_income_names_dropped() {
        let settings = default_settings(1, None);
        let rows = vec![
            income_row("Person 1", 100.0, PaymentPeriod::Part1),
            income_row("person 1", 500.0, PaymentPeriod::Part1),
            income_row("Someone", 700.0, PaymentPeriod::Part2),
            income_row("Person 2", 50.0, PaymentPeriod::Part2),
        ];
        let income = bucket_income(&rows, &settings);
        assert_eq!(income.person1.part1, 100.0);
        assert_eq!(income.person1.part2, 0.0);
        assert_eq!(income.person2.part2, 50.0);
        assert_eq!(income.total(), 150.0);
    }

    #[test]
    fn test_auto_ratio_from_income() {
        let mut settings = default_settings(1, None);
        settings.auto_calculate_split_ratio = true;
        let income = IncomeBreakdown {
            person1: PeriodIncome {
                part1: 2000.0,
                part2: 0.0,
            },
            person2: PeriodIncome {
                part1: 0.0,
                part2: 1000.0,
            },
        };
        // 66.67% rounds to 67; person 2 takes the remainder
        assert_eq!(
            effective_split_ratio(&settings, &income),
            SplitRatio {
                person1: 67,
                person2: 33
            }
        );

        // No income keeps the stored ratio
        assert_eq!(
            effective_split_ratio(&settings, &IncomeBreakdown::default()),
            SplitRatio {
                person1: 60,
                person2: 40
            }
        );

        settings.auto_calculate_split_ratio = false;
        assert_eq!(effective_split_ratio(&settings, &income).person1, 60);
    }

    #[test]
    fn test_end_to_end_march_scenario() {
        let month: Month = "2024-03".parse().unwrap();
        let settings = settings_with_zero_savings();
        let expenses = vec![expense(
            1200.0,
            AccountType::Checking,
            PaymentType::Automatic,
            &all_months(),
        )];
        let incomes = vec![
            income_row("Person 1", 3000.0, PaymentPeriod::Part1),
            income_row("Person 1", 3000.0, PaymentPeriod::Part2),
            income_row("Person 2", 2000.0, PaymentPeriod::Part2),
        ];

        let calc = build_monthly_calculation(
            &month,
            &expenses,
            &incomes,
            &settings,
            &CreditTotals::default(),
        );

        assert_eq!(calc.month, "2024-03");
        assert_eq!(calc.checking.total_expenses, 1200.0);
        assert_eq!(calc.checking.automatic_payments, 1200.0);
        assert_eq!(calc.checking.person1_share.total, 720.0);
        assert_eq!(calc.checking.person2_share.total, 480.0);
        assert_eq!(calc.checking.person1_share.part1, 360.0);
        assert_eq!(calc.checking.person1_share.part2, 360.0);
        assert_eq!(calc.checking.person2_share.part1, 0.0);
        assert_eq!(calc.checking.person2_share.part2, 480.0);

        assert_eq!(calc.total_income, 8000.0);
        assert_eq!(calc.total_expenses, 1200.0);
        assert_eq!(calc.balance, 6800.0);
        assert_eq!(calc.person1.remaining, 6000.0 - 720.0);
        assert_eq!(calc.person2.remaining_after_part2, 2000.0 - 480.0);
    }

    #[test]
    fn test_savings_count_as_expenses_and_respect_assignment() {
        let month: Month = "2024-03".parse().unwrap();
        let mut settings = default_settings(1, None);
        settings.travel_savings_assigned_to = SavingsAssignment::Person2;
        settings.home_savings_assigned_to = SavingsAssignment::Person1;

        let calc = build_monthly_calculation(&month, &[], &[], &settings, &CreditTotals::default());
        assert_eq!(calc.savings.total_goal, 2500.0);
        assert_eq!(calc.total_expenses, 2500.0);
        assert_eq!(calc.balance, -2500.0);

        assert_eq!(calc.savings.travel.person1_share.total, 0.0);
        assert_eq!(calc.savings.travel.person2_share.total, 1000.0);
        assert_eq!(calc.savings.home.person1_share.total, 500.0);
        assert_eq!(calc.savings.home.person2_share.total, 0.0);
        // General stays shared at 60/40
        assert_eq!(calc.savings.general.person1_share.total, 600.0);
        assert_eq!(calc.savings.person1_total.total, 1100.0);
        assert_eq!(calc.savings.person2_total.total, 1400.0);
        assert_eq!(calc.person1.total_contribution, 1100.0);
    }

    #[test]
    fn test_balance_after_expenses_adds_credits() {
        let month: Month = "2024-03".parse().unwrap();
        let mut settings = settings_with_zero_savings();
        settings.credit_card_balance = -500.0;
        let expenses = vec![expense(
            200.0,
            AccountType::CreditCard,
            PaymentType::Manual,
            &[3],
        )];
        let credits = CreditTotals {
            credit_card: 75.0,
            ..Default::default()
        };
        let calc = build_monthly_calculation(&month, &expenses, &[], &settings, &credits);
        assert_eq!(calc.credit_card.current_balance, -500.0);
        assert_eq!(calc.credit_card.credits, 75.0);
        assert_eq!(calc.credit_card.balance_after_expenses, -500.0 - 200.0 + 75.0);
        assert_eq!(calc.checking.balance_after_expenses, 0.0);
    }

    #[tokio::test]
    async fn test_month_calculations_from_database() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "a@example.com").await?;
        create_test_expense(&db, user.id, "Rent", 1200.0, AccountType::Checking).await?;
        create_test_income(&db, user.id, "Person 1", 3000.0, "2024-03", PaymentPeriod::Part1).await?;
        create_test_income(&db, user.id, "Person 1", 3000.0, "2024-03", PaymentPeriod::Part2).await?;
        create_test_income(&db, user.id, "Person 2", 2000.0, "2024-03", PaymentPeriod::Part2).await?;
        create_test_credit(&db, user.id, 100.0, AccountType::Checking, "2024-03").await?;

        let month: Month = "2024-03".parse().unwrap();
        // No settings row yet: the default preset applies and nothing is written
        let calc = get_month_calculations(&db, user.id, &month).await?;
        assert!(find_settings(&db, user.id).await?.is_none());

        assert_eq!(calc.checking.person1_share.total, 720.0);
        assert_eq!(calc.checking.credits, 100.0);
        assert_eq!(calc.checking.balance_after_expenses, -1100.0);
        assert_eq!(calc.savings.total_goal, 2500.0);
        assert_eq!(calc.total_expenses, 3700.0);

        // Income never inherits into calculations
        let april: Month = "2024-04".parse().unwrap();
        let calc = get_month_calculations(&db, user.id, &april).await?;
        assert_eq!(calc.total_income, 0.0);
        Ok(())
    }
}
