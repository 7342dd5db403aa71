//! Ledger business logic - The write path for transactions.
//!
//! This module provides functions for creating, updating, and deleting
//! transactions. Every mutation runs inside a single database transaction
//! that writes the transaction row and the affected account balances
//! together, so `current_balance` can never drift from the log: either the
//! whole operation commits or none of it does. Updates are handled as the
//! old row's reversal plus the new row's effects, merged into one batch, so
//! changing a transaction's kind, amount, or accounts in one call stays
//! consistent. All functions are async and return Result types for proper
//! error handling throughout the system.

use crate::{
    core::{account::apply_balance_delta, effects},
    entities::{
        Account, Category, Transaction,
        account::AccountKind,
        transaction::{self, TransactionKind},
    },
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};

/// The caller-supplied fields of a transaction, used by create and update.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// The kind of transaction
    pub kind: TransactionKind,
    /// Magnitude of the movement; must be strictly positive
    pub amount: Money,
    /// Calendar date the transaction applies to
    pub date: Date,
    /// Human-readable description of the transaction
    pub description: String,
    /// Category label; required for income and expense, forbidden otherwise
    pub category_id: Option<Uuid>,
    /// The account the transaction acts on (the source for transfers);
    /// required for transfers and payments, `None` records an unassigned
    /// income or expense
    pub account_id: Option<Uuid>,
    /// Receiving account; required for transfers, forbidden otherwise
    pub destination_account_id: Option<Uuid>,
}

/// Validates an input against the shape rules for its kind and the current
/// account/category state, before anything is written.
///
/// Returns whether the source account is a credit account, which is the one
/// fact the effect computation needs. An unassigned source is never credit.
async fn validate_input<C>(db: &C, input: &TransactionInput) -> Result<bool>
where
    C: ConnectionTrait,
{
    if !input.amount.is_positive() {
        return Err(Error::InvalidAmount {
            amount: input.amount.to_string(),
        });
    }

    // A named source must exist and be active, whatever the kind
    let source = match input.account_id {
        Some(account_id) => {
            let account = Account::find_by_id(account_id)
                .one(db)
                .await?
                .ok_or_else(|| Error::AccountNotFound {
                    id: account_id.to_string(),
                })?;

            if !account.is_active {
                return Err(Error::AccountNotFound {
                    id: account_id.to_string(),
                });
            }

            Some(account)
        }
        None => None,
    };

    match input.kind {
        TransactionKind::Income | TransactionKind::Expense => {
            if input.destination_account_id.is_some() {
                return Err(Error::Validation {
                    message: "Only transfers can have a destination account".to_string(),
                });
            }

            let category_id = input.category_id.ok_or_else(|| Error::Validation {
                message: "Income and expense transactions require a category".to_string(),
            })?;

            let category = Category::find_by_id(category_id)
                .one(db)
                .await?
                .ok_or_else(|| Error::CategoryNotFound {
                    id: category_id.to_string(),
                })?;

            if !category.is_active {
                return Err(Error::CategoryNotFound {
                    id: category_id.to_string(),
                });
            }
        }
        TransactionKind::Transfer => {
            if input.category_id.is_some() {
                return Err(Error::Validation {
                    message: "Transfers and payments cannot have a category".to_string(),
                });
            }

            let source_id = input.account_id.ok_or_else(|| Error::Validation {
                message: "Transfers require a source account".to_string(),
            })?;

            let destination_id =
                input
                    .destination_account_id
                    .ok_or_else(|| Error::Validation {
                        message: "Transfers require a destination account".to_string(),
                    })?;

            if destination_id == source_id {
                return Err(Error::SameAccountTransfer);
            }

            let destination = Account::find_by_id(destination_id)
                .one(db)
                .await?
                .ok_or_else(|| Error::AccountNotFound {
                    id: destination_id.to_string(),
                })?;

            if !destination.is_active {
                return Err(Error::AccountNotFound {
                    id: destination_id.to_string(),
                });
            }
        }
        TransactionKind::Payment => {
            if input.category_id.is_some() {
                return Err(Error::Validation {
                    message: "Transfers and payments cannot have a category".to_string(),
                });
            }

            if input.destination_account_id.is_some() {
                return Err(Error::Validation {
                    message: "Only transfers can have a destination account".to_string(),
                });
            }

            let account = source.as_ref().ok_or_else(|| Error::Validation {
                message: "Payments require an account".to_string(),
            })?;

            if account.kind != AccountKind::Credit {
                return Err(Error::CreditAccountRequired {
                    name: account.name.clone(),
                });
            }
        }
    }

    Ok(source.is_some_and(|account| account.kind == AccountKind::Credit))
}

/// Resolves whether a stored transaction's source account is a credit
/// account, for computing the reversal of its effects.
///
/// The account may already be inactive (retiring an account must not strand
/// its history); only a hard-missing row is an error.
async fn stored_source_is_credit<C>(db: &C, account_id: Option<Uuid>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let Some(account_id) = account_id else {
        return Ok(false);
    };

    let account = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AccountNotFound {
            id: account_id.to_string(),
        })?;

    Ok(account.kind == AccountKind::Credit)
}

/// Creates a new transaction and applies its balance effects in one atomic unit.
///
/// The input is validated first (positive amount, live accounts and category,
/// the shape rules for its kind), then the row insert and the balance updates
/// commit together. Balance writes go through the atomic increment in
/// `core::account`, never through read-modify-write.
///
/// # Errors
/// Returns a validation, not-found, or amount error before anything is
/// written; a conflict or database error rolls the whole operation back.
pub async fn create_transaction(
    db: &DatabaseConnection,
    input: TransactionInput,
) -> Result<transaction::Model> {
    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    let source_is_credit = validate_input(&txn, &input).await?;

    let transaction_model = transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(input.kind),
        amount: Set(input.amount),
        date: Set(input.date),
        description: Set(input.description),
        category_id: Set(input.category_id),
        account_id: Set(input.account_id),
        destination_account_id: Set(input.destination_account_id),
        created_at: Set(chrono::Utc::now()),
    };

    let stored = transaction_model.insert(&txn).await?;

    for delta in effects::merge_deltas(effects::forward_deltas(&stored, source_is_credit)?) {
        apply_balance_delta(&txn, delta).await?;
    }

    txn.commit().await?;

    Ok(stored)
}

/// Replaces a transaction's caller-supplied fields and rebases its balance
/// effects, all in one atomic unit.
///
/// The old effects are reversed and the new ones applied as a single merged
/// batch, so the result always matches deleting the old transaction and
/// creating the new one, without the intermediate state ever being visible.
/// The old source account may already be inactive; reversal only requires
/// that its row still exists.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: Uuid,
    input: TransactionInput,
) -> Result<transaction::Model> {
    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    let old = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            id: transaction_id.to_string(),
        })?;

    let old_source_is_credit = stored_source_is_credit(&txn, old.account_id).await?;

    let new_source_is_credit = validate_input(&txn, &input).await?;

    let reversal = effects::reversal_deltas(&old, old_source_is_credit)?;

    let mut active: transaction::ActiveModel = old.into();
    active.kind = Set(input.kind);
    active.amount = Set(input.amount);
    active.date = Set(input.date);
    active.description = Set(input.description);
    active.category_id = Set(input.category_id);
    active.account_id = Set(input.account_id);
    active.destination_account_id = Set(input.destination_account_id);
    let updated = active.update(&txn).await?;

    let mut batch = reversal;
    batch.extend(effects::forward_deltas(&updated, new_source_is_credit)?);
    for delta in effects::merge_deltas(batch) {
        apply_balance_delta(&txn, delta).await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Deletes a transaction and reverses its balance effects in one atomic unit.
///
/// Deleting twice fails with not-found the second time; the reversal can
/// never be applied more than once because the row delete and the balance
/// writes share one database transaction.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: Uuid) -> Result<()> {
    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    let transaction = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            id: transaction_id.to_string(),
        })?;

    let source_is_credit = stored_source_is_credit(&txn, transaction.account_id).await?;

    let reversal = effects::reversal_deltas(&transaction, source_is_credit)?;

    transaction.delete(&txn).await?;

    for delta in effects::merge_deltas(reversal) {
        apply_balance_delta(&txn, delta).await?;
    }

    txn.commit().await?;

    Ok(())
}

/// Records a payment against a credit account, reducing its debt.
///
/// Convenience wrapper over [`create_transaction`]: builds a payment dated
/// today with the given description. Overpaying is allowed and leaves the
/// balance negative.
///
/// # Errors
/// Fails with `CreditAccountRequired` when the account is not a credit
/// account, and with the usual validation errors otherwise.
pub async fn pay_down_debt(
    db: &DatabaseConnection,
    account_id: Uuid,
    amount: Money,
    description: String,
) -> Result<transaction::Model> {
    create_transaction(
        db,
        TransactionInput {
            kind: TransactionKind::Payment,
            amount,
            date: chrono::Utc::now().date_naive(),
            description,
            category_id: None,
            account_id: Some(account_id),
            destination_account_id: None,
        },
    )
    .await
}

/// Retrieves a specific transaction by its unique ID.
///
/// Returns None if the transaction doesn't exist, allowing callers to handle
/// missing transactions gracefully without throwing errors.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: Uuid,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions touching an account, as source or destination,
/// ordered by date (newest first).
pub async fn get_transactions_for_account(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(
            Condition::any()
                .add(transaction::Column::AccountId.eq(account_id))
                .add(transaction::Column::DestinationAccountId.eq(account_id)),
        )
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
