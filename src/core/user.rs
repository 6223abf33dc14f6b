//! User business logic - lookup and first-login provisioning.

use crate::{
    core::settings::create_default_settings,
    entities::{User, UserModel, user},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Profile fields an identity provider reports for a signed-in person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Stable subject identifier at the provider
    pub provider_id: String,
    /// Verified email address
    pub email: String,
    /// Display name, if the provider shares one
    pub name: Option<String>,
}

/// Looks up a user by primary key.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<UserModel>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Looks up a user by the identity provider's subject id.
pub async fn get_user_by_provider_id(
    db: &DatabaseConnection,
    provider_id: &str,
) -> Result<Option<UserModel>> {
    User::find()
        .filter(user::Column::ProviderId.eq(provider_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the user for `profile`, creating it on first login.
///
/// A new user is inserted together with its default settings row in one
/// transaction. Returns the user and whether it was just created.
#[instrument(skip(db, profile), fields(email = %profile.email))]
pub async fn find_or_create_user(
    db: &DatabaseConnection,
    profile: &ProviderProfile,
) -> Result<(UserModel, bool)> {
    if let Some(existing) = get_user_by_provider_id(db, &profile.provider_id).await? {
        return Ok((existing, false));
    }

    let txn = db.begin().await?;
    let created = user::ActiveModel {
        email: Set(profile.email.clone()),
        name: Set(profile.name.clone()),
        provider_id: Set(profile.provider_id.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    create_default_settings(&txn, created.id, Some(&created.email)).await?;
    txn.commit().await?;

    info!(user_id = created.id, "New user registered");
    Ok((created, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::find_settings;
    use crate::test_utils::*;

    fn profile(sub: &str, email: &str) -> ProviderProfile {
        ProviderProfile {
            provider_id: sub.to_string(),
            email: email.to_string(),
            name: Some("Alex".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_login_creates_user_and_settings() -> Result<()> {
        let db = setup_test_db().await?;
        let (user, created) = find_or_create_user(&db, &profile("g-1", "alex@example.com")).await?;
        assert!(created);
        assert_eq!(user.email, "alex@example.com");
        assert_eq!(user.name.as_deref(), Some("Alex"));

        let settings = find_settings(&db, user.id).await?;
        let settings = settings.ok_or_else(|| crate::errors::Error::not_found("Settings", user.id))?;
        assert_eq!(settings.authorized_emails.0, vec!["alex@example.com".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_login_reuses_user() -> Result<()> {
        let db = setup_test_db().await?;
        let (first, _) = find_or_create_user(&db, &profile("g-1", "alex@example.com")).await?;
        let (second, created) = find_or_create_user(&db, &profile("g-1", "alex@example.com")).await?;
        assert!(!created);
        assert_eq!(first.id, second.id);

        let (other, created) = find_or_create_user(&db, &profile("g-2", "sam@example.com")).await?;
        assert!(created);
        assert_ne!(other.id, first.id);
        assert_eq!(get_user_by_id(&db, other.id).await?, Some(other));
        Ok(())
    }
}
