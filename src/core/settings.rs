//! Settings business logic - default construction, lazy creation, and validated updates.
//!
//! There is exactly one place that knows what a fresh settings row looks like,
//! [`default_settings`]. It backs both the row created on first access and the
//! in-memory fallback the calculation engine uses when no row exists.

use crate::{
    entities::{
        Settings, SettingsModel, User,
        enums::SavingsAssignment,
        settings::{self, EmailList},
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, IntoActiveModel, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Default label for the first person.
pub const DEFAULT_PERSON1_NAME: &str = "Person 1";
/// Default label for the second person.
pub const DEFAULT_PERSON2_NAME: &str = "Person 2";
/// Default split: person 1 carries 60%.
pub const DEFAULT_SPLIT_PERSON1: i32 = 60;
/// Default split: person 2 carries 40%.
pub const DEFAULT_SPLIT_PERSON2: i32 = 40;
/// Default monthly travel savings goal.
pub const DEFAULT_TRAVEL_SAVINGS: f64 = 1000.0;
/// Default monthly home savings goal.
pub const DEFAULT_HOME_SAVINGS: f64 = 500.0;
/// Default monthly general savings goal.
pub const DEFAULT_GENERAL_SAVINGS: f64 = 1000.0;

/// Builds the canonical default settings for `user_id`.
///
/// The returned model has `id = 0` and is not persisted; [`get_settings`] inserts a
/// copy of it when a user has no row yet.
#[must_use]
pub fn default_settings(user_id: i64, email: Option<&str>) -> SettingsModel {
    let now = Utc::now();
    SettingsModel {
        id: 0,
        user_id,
        person1_name: DEFAULT_PERSON1_NAME.to_string(),
        person2_name: DEFAULT_PERSON2_NAME.to_string(),
        split_ratio_person1: DEFAULT_SPLIT_PERSON1,
        split_ratio_person2: DEFAULT_SPLIT_PERSON2,
        auto_calculate_split_ratio: false,
        checking_balance: 0.0,
        credit_card_balance: 0.0,
        line_of_credit_balance: 0.0,
        student_line_of_credit_balance: 0.0,
        travel_savings: DEFAULT_TRAVEL_SAVINGS,
        home_savings: DEFAULT_HOME_SAVINGS,
        general_savings: DEFAULT_GENERAL_SAVINGS,
        travel_savings_assigned_to: SavingsAssignment::Shared,
        home_savings_assigned_to: SavingsAssignment::Shared,
        general_savings_assigned_to: SavingsAssignment::Shared,
        authorized_emails: EmailList(email.map(str::to_string).into_iter().collect()),
        created_at: now,
        updated_at: now,
    }
}

/// Partial settings update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsUpdate {
    /// New ratio for person 1 (0-100)
    pub split_ratio_person1: Option<i32>,
    /// New ratio for person 2 (0-100)
    pub split_ratio_person2: Option<i32>,
    /// Toggle income-derived ratios
    pub auto_calculate_split_ratio: Option<bool>,
    /// New label for person 1
    pub person1_name: Option<String>,
    /// New label for person 2
    pub person2_name: Option<String>,
    /// Replacement allowlist
    pub authorized_emails: Option<Vec<String>>,
    /// Current checking balance
    pub checking_balance: Option<f64>,
    /// Current credit card balance
    pub credit_card_balance: Option<f64>,
    /// Current line of credit balance
    pub line_of_credit_balance: Option<f64>,
    /// Current student line of credit balance
    pub student_line_of_credit_balance: Option<f64>,
    /// Monthly travel savings goal
    pub travel_savings: Option<f64>,
    /// Monthly home savings goal
    pub home_savings: Option<f64>,
    /// Monthly general savings goal
    pub general_savings: Option<f64>,
    /// Who funds the travel goal
    pub travel_savings_assigned_to: Option<SavingsAssignment>,
    /// Who funds the home goal
    pub home_savings_assigned_to: Option<SavingsAssignment>,
    /// Who funds the general goal
    pub general_savings_assigned_to: Option<SavingsAssignment>,
}

impl SettingsUpdate {
    /// Checks field ranges and the ratio-sum rule.
    ///
    /// When both ratios are supplied they must add up to exactly 100, unless this
    /// same update turns automatic ratio calculation on.
    pub fn validate(&self) -> Result<()> {
        for (field, ratio) in [
            ("splitRatioPerson1", self.split_ratio_person1),
            ("splitRatioPerson2", self.split_ratio_person2),
        ] {
            if ratio.is_some_and(|value| !(0..=100).contains(&value)) {
                return Err(Error::validation(field, "must be between 0 and 100"));
            }
        }

        let enabling_auto = self.auto_calculate_split_ratio == Some(true);
        if let (Some(p1), Some(p2)) = (self.split_ratio_person1, self.split_ratio_person2) {
            if !enabling_auto && p1 + p2 != 100 {
                return Err(Error::validation(
                    "splitRatioPerson1",
                    "Split ratios must sum to 100",
                ));
            }
        }

        for (field, name) in [
            ("person1Name", &self.person1_name),
            ("person2Name", &self.person2_name),
        ] {
            if name.as_ref().is_some_and(|n| n.trim().is_empty()) {
                return Err(Error::validation(field, "cannot be empty"));
            }
        }

        for (field, balance) in [
            ("checkingBalance", self.checking_balance),
            ("creditCardBalance", self.credit_card_balance),
            ("lineOfCreditBalance", self.line_of_credit_balance),
            ("studentLineOfCreditBalance", self.student_line_of_credit_balance),
        ] {
            if balance.is_some_and(|b| !b.is_finite()) {
                return Err(Error::validation(field, "must be a finite number"));
            }
        }

        for (field, goal) in [
            ("travelSavings", self.travel_savings),
            ("homeSavings", self.home_savings),
            ("generalSavings", self.general_savings),
        ] {
            if goal.is_some_and(|g| !g.is_finite() || g < 0.0) {
                return Err(Error::validation(field, "must be zero or more"));
            }
        }

        let bad_email = self
            .authorized_emails
            .iter()
            .flatten()
            .find(|e| !is_plausible_email(e));
        if let Some(bad) = bad_email {
            return Err(Error::validation(
                "authorizedEmails",
                format!("'{bad}' is not a valid email address"),
            ));
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Looks up a user's settings without creating anything.
pub async fn find_settings(db: &DatabaseConnection, user_id: i64) -> Result<Option<SettingsModel>> {
    Settings::find()
        .filter(settings::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts the default settings row for `user_id`.
pub(crate) async fn create_default_settings<C>(
    db: &C,
    user_id: i64,
    email: Option<&str>,
) -> Result<SettingsModel>
where
    C: ConnectionTrait,
{
    let mut active = default_settings(user_id, email)
        .into_active_model()
        .reset_all();
    active.id = NotSet;
    let created = active.insert(db).await?;
    info!(user_id, "Created default settings");
    Ok(created)
}

/// Returns the user's settings, creating the default row on first access.
#[instrument(skip(db))]
pub async fn get_settings(db: &DatabaseConnection, user_id: i64) -> Result<SettingsModel> {
    if let Some(existing) = find_settings(db, user_id).await? {
        return Ok(existing);
    }

    let user = User::find_by_id(user_id).one(db).await?;
    create_default_settings(db, user_id, user.as_ref().map(|u| u.email.as_str())).await
}

/// Validates `update` and merges it into the user's settings.
#[instrument(skip(db, update))]
pub async fn update_settings(
    db: &DatabaseConnection,
    user_id: i64,
    update: SettingsUpdate,
) -> Result<SettingsModel> {
    update.validate()?;

    let existing = get_settings(db, user_id).await?;
    let mut active: settings::ActiveModel = existing.into();

    if let Some(v) = update.split_ratio_person1 {
        active.split_ratio_person1 = Set(v);
    }
    if let Some(v) = update.split_ratio_person2 {
        active.split_ratio_person2 = Set(v);
    }
    if let Some(v) = update.auto_calculate_split_ratio {
        active.auto_calculate_split_ratio = Set(v);
    }
    if let Some(v) = update.person1_name {
        active.person1_name = Set(v.trim().to_string());
    }
    if let Some(v) = update.person2_name {
        active.person2_name = Set(v.trim().to_string());
    }
    if let Some(v) = update.authorized_emails {
        active.authorized_emails = Set(EmailList(v));
    }
    if let Some(v) = update.checking_balance {
        active.checking_balance = Set(v);
    }
    if let Some(v) = update.credit_card_balance {
        active.credit_card_balance = Set(v);
    }
    if let Some(v) = update.line_of_credit_balance {
        active.line_of_credit_balance = Set(v);
    }
    if let Some(v) = update.student_line_of_credit_balance {
        active.student_line_of_credit_balance = Set(v);
    }
    if let Some(v) = update.travel_savings {
        active.travel_savings = Set(v);
    }
    if let Some(v) = update.home_savings {
        active.home_savings = Set(v);
    }
    if let Some(v) = update.general_savings {
        active.general_savings = Set(v);
    }
    if let Some(v) = update.travel_savings_assigned_to {
        active.travel_savings_assigned_to = Set(v);
    }
    if let Some(v) = update.home_savings_assigned_to {
        active.home_savings_assigned_to = Set(v);
    }
    if let Some(v) = update.general_savings_assigned_to {
        active.general_savings_assigned_to = Set(v);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    info!(user_id, "Settings updated");
    Ok(updated)
}
