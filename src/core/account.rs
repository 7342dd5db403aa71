//! Account business logic - Handles all account-related operations.
//!
//! Provides functions for creating, retrieving, and deactivating accounts,
//! plus the single write path for the cached balance. All functions are async
//! and return Result types for error handling.

use crate::{
    core::effects::BalanceDelta,
    entities::{
        Account,
        account::{self, AccountKind},
    },
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active accounts from the database, ordered alphabetically by name.
///
/// Deactivated accounts are excluded; their rows stay behind so that the
/// transaction history referring to them remains reversible.
pub async fn get_all_active_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::IsActive.eq(true))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a specific account by its name, returning None if not found or inactive.
pub async fn get_account_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<account::Model>> {
    Account::find()
        .filter(account::Column::Name.eq(name))
        .filter(account::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by its unique ID, used for direct account lookups.
///
/// Returns inactive accounts too; callers that only want live accounts check
/// `is_active` themselves, while reversal paths need retired accounts as well.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new account with the specified parameters, performing input validation.
///
/// The name is trimmed and must not be empty. A credit limit is only
/// meaningful for credit accounts and must be non-negative; passing one for
/// any other kind is rejected. The opening balance may be any sign, so
/// existing debt or an overdraft can be carried in as-is.
pub async fn create_account(
    db: &DatabaseConnection,
    name: String,
    kind: AccountKind,
    currency: String,
    opening_balance: Money,
    credit_limit: Option<Money>,
    is_default: bool,
) -> Result<account::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Account name cannot be empty".to_string(),
        });
    }

    if currency.trim().is_empty() {
        return Err(Error::Validation {
            message: "Account currency cannot be empty".to_string(),
        });
    }

    if let Some(limit) = credit_limit {
        if kind != AccountKind::Credit {
            return Err(Error::Validation {
                message: "Only credit accounts can have a credit limit".to_string(),
            });
        }
        if limit.is_negative() {
            return Err(Error::InvalidAmount {
                amount: limit.to_string(),
            });
        }
    }

    let account = account::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        kind: Set(kind),
        currency: Set(currency.trim().to_string()),
        current_balance: Set(opening_balance),
        credit_limit: Set(credit_limit),
        is_default: Set(is_default),
        is_active: Set(true),
    };

    let result = account.insert(db).await?;
    Ok(result)
}

/// Soft-deletes an account so it stops appearing in listings and lookups.
///
/// The row and its transaction history are preserved, which keeps old
/// transactions against the account updatable and deletable.
///
/// # Errors
/// Returns a not-found error if the account does not exist or is already
/// inactive.
pub async fn deactivate_account(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> Result<account::Model> {
    let mut account: account::ActiveModel = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AccountNotFound {
            id: account_id.to_string(),
        })?
        .into();

    if !*account.is_active.as_ref() {
        return Err(Error::AccountNotFound {
            id: account_id.to_string(),
        });
    }

    account.is_active = Set(false);
    account.update(db).await.map_err(Into::into)
}

/// Remaining headroom of a credit account: `credit_limit - current_balance`.
///
/// Returns None for non-credit accounts and for credit accounts without a
/// configured limit. Overpaying a card pushes the balance negative, so the
/// headroom can exceed the limit.
pub fn available_credit(account: &account::Model) -> Option<Money> {
    if account.kind != AccountKind::Credit {
        return None;
    }
    account
        .credit_limit
        .map(|limit| limit - account.current_balance)
}

/// Applies one signed delta to an account's cached balance atomically.
///
/// This is the only place in the crate that writes `current_balance`. Instead
/// of reading the balance, modifying it, and writing it back (which loses
/// updates under concurrency), it issues a single SQL statement:
/// `UPDATE accounts SET current_balance = current_balance + delta WHERE id = ?`
///
/// # Errors
/// Returns a retryable conflict when the update matches no row, meaning the
/// account disappeared between validation and the write. The surrounding
/// database transaction is then rolled back by the caller, so no partial
/// batch survives.
pub async fn apply_balance_delta<C>(db: &C, delta: BalanceDelta) -> Result<()>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let update = Account::update_many()
        .col_expr(
            account::Column::CurrentBalance,
            Expr::col(account::Column::CurrentBalance).add(delta.amount),
        )
        .filter(account::Column::Id.eq(delta.account_id))
        .exec(db)
        .await?;

    if update.rows_affected == 0 {
        return Err(Error::Conflict {
            message: format!("account {} vanished during balance update", delta.account_id),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_account_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test empty name validation
        let result = create_account(
            &db,
            String::new(),
            AccountKind::Bank,
            "USD".to_string(),
            Money::zero(),
            None,
            false,
        )
        .await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        // Test whitespace-only name validation
        let result = create_account(
            &db,
            "   ".to_string(),
            AccountKind::Bank,
            "USD".to_string(),
            Money::zero(),
            None,
            false,
        )
        .await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        // Test credit limit on a non-credit account
        let result = create_account(
            &db,
            "Checking".to_string(),
            AccountKind::Bank,
            "USD".to_string(),
            Money::zero(),
            Some(Money::from_minor(100_000)),
            false,
        )
        .await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        // Test negative credit limit
        let result = create_account(
            &db,
            "Visa".to_string(),
            AccountKind::Credit,
            "USD".to_string(),
            Money::zero(),
            Some(Money::from_minor(-1)),
            false,
        )
        .await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_account_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let account = create_test_account(&db, "Checking").await?;

        assert_eq!(account.name, "Checking");
        assert_eq!(account.kind, AccountKind::Bank);
        assert_eq!(account.currency, "USD");
        assert!(account.current_balance.is_zero());
        assert!(account.credit_limit.is_none());
        assert!(account.is_active);
        assert!(!account.is_default);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_credit_account_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let card = create_credit_account(&db, "Visa", 100_000).await?;

        assert_eq!(card.kind, AccountKind::Credit);
        assert_eq!(card.credit_limit, Some(Money::from_minor(100_000)));
        assert!(card.current_balance.is_zero());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_account_by_name_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_account(&db, "Checking").await?;

        // Test finding it by name
        let found = get_account_by_name(&db, "Checking").await?;
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, created.id);

        // Test finding non-existent account
        let not_found = get_account_by_name(&db, "Non-existent").await?;
        assert!(not_found.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_active_accounts_ordering() -> Result<()> {
        let db = setup_test_db().await?;

        let cash = create_test_account(&db, "Cash").await?;
        let checking = create_test_account(&db, "Checking").await?;
        let wallet = create_test_account(&db, "Wallet").await?;

        let accounts = get_all_active_accounts(&db).await?;
        assert_eq!(accounts.len(), 3);

        // Ordered alphabetically
        assert_eq!(accounts[0], cash);
        assert_eq!(accounts[1], checking);
        assert_eq!(accounts[2], wallet);

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_account_hides_but_keeps_row() -> Result<()> {
        let db = setup_test_db().await?;

        let account = create_test_account(&db, "Old Checking").await?;
        let deactivated = deactivate_account(&db, account.id).await?;
        assert!(!deactivated.is_active);

        // Hidden from name lookup and listing
        assert!(get_account_by_name(&db, "Old Checking").await?.is_none());
        assert!(get_all_active_accounts(&db).await?.is_empty());

        // Still reachable by id for history handling
        let by_id = get_account_by_id(&db, account.id).await?;
        assert!(by_id.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_account_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = deactivate_account(&db, Uuid::new_v4()).await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            Error::AccountNotFound { id: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_balance_delta_moves_balance_exactly() -> Result<()> {
        let db = setup_test_db().await?;

        let account = create_test_account(&db, "Checking").await?;

        apply_balance_delta(
            &db,
            BalanceDelta {
                account_id: account.id,
                amount: Money::from_minor(12345),
            },
        )
        .await?;
        apply_balance_delta(
            &db,
            BalanceDelta {
                account_id: account.id,
                amount: Money::from_minor(-345),
            },
        )
        .await?;

        let updated = get_account_by_id(&db, account.id).await?.unwrap();
        assert_eq!(updated.current_balance, Money::from_minor(12000));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_balance_delta_missing_account_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;

        let result = apply_balance_delta(
            &db,
            BalanceDelta {
                account_id: Uuid::new_v4(),
                amount: Money::from_minor(100),
            },
        )
        .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, Error::Conflict { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_available_credit() -> Result<()> {
        let db = setup_test_db().await?;

        // Non-credit accounts have no headroom concept
        let checking = create_test_account(&db, "Checking").await?;
        assert!(available_credit(&checking).is_none());

        // Credit account with a limit and some debt
        let card = create_credit_account(&db, "Visa", 100_000).await?;
        apply_balance_delta(
            &db,
            BalanceDelta {
                account_id: card.id,
                amount: Money::from_minor(25_000),
            },
        )
        .await?;
        let card = get_account_by_id(&db, card.id).await?.unwrap();
        assert_eq!(available_credit(&card), Some(Money::from_minor(75_000)));

        Ok(())
    }
}
