//! Balance effect computation - Decides how a transaction moves account balances.
//!
//! Every mutation of `Account::current_balance` in this crate starts here: the
//! ledger computes the signed deltas for a transaction row, merges them, and
//! applies them through `core::account::apply_balance_delta`. Keeping the rules
//! in one exhaustive match means create, update, and delete cannot disagree
//! about what a transaction does.
//!
//! The rules per kind:
//! - **Income** never touches a balance (plain-account balances are not tracked
//!   through the ledger).
//! - **Expense** raises the debt of a credit source account by the amount;
//!   plain and unassigned sources are untouched.
//! - **Transfer** moves the amount from the source to the destination, so the
//!   two deltas always cancel.
//! - **Payment** lowers a credit account's debt by the amount, below zero if
//!   the payment overshoots.

use crate::{
    entities::transaction::{self, TransactionKind},
    errors::{Error, Result},
};
use sea_orm::prelude::*;

use crate::money::Money;

/// A signed balance adjustment for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    /// Account whose `current_balance` moves
    pub account_id: Uuid,
    /// Signed amount to add to the balance
    pub amount: Money,
}

/// Computes the balance deltas applying `tx` produces.
///
/// `source_is_credit` tells the engine whether the source account is a credit
/// account, which is the one piece of account state the rules depend on. The
/// caller resolves it while validating, so this function stays pure.
///
/// # Errors
/// Returns a validation error for a row missing an account its kind needs,
/// such as a transfer without a destination or a payment without an account;
/// such a row cannot have well-defined effects and must never be applied.
pub fn forward_deltas(
    tx: &transaction::Model,
    source_is_credit: bool,
) -> Result<Vec<BalanceDelta>> {
    let deltas = match tx.kind {
        TransactionKind::Income => Vec::new(),
        TransactionKind::Expense => match tx.account_id {
            Some(account_id) if source_is_credit => vec![BalanceDelta {
                account_id,
                amount: tx.amount,
            }],
            _ => Vec::new(),
        },
        TransactionKind::Transfer => {
            let source_id = tx.account_id.ok_or_else(|| Error::Validation {
                message: format!("transfer {} has no source account", tx.id),
            })?;
            let destination_id =
                tx.destination_account_id
                    .ok_or_else(|| Error::Validation {
                        message: format!("transfer {} has no destination account", tx.id),
                    })?;
            vec![
                BalanceDelta {
                    account_id: source_id,
                    amount: -tx.amount,
                },
                BalanceDelta {
                    account_id: destination_id,
                    amount: tx.amount,
                },
            ]
        }
        TransactionKind::Payment => {
            let account_id = tx.account_id.ok_or_else(|| Error::Validation {
                message: format!("payment {} has no account", tx.id),
            })?;
            vec![BalanceDelta {
                account_id,
                amount: -tx.amount,
            }]
        }
    };

    Ok(deltas)
}

/// Computes the deltas that undo `tx`: the forward deltas with flipped signs.
///
/// Deriving the reversal from the forward computation (rather than a second
/// match) guarantees apply-then-reverse nets to zero for every kind.
///
/// # Errors
/// Fails exactly when [`forward_deltas`] does.
pub fn reversal_deltas(
    tx: &transaction::Model,
    source_is_credit: bool,
) -> Result<Vec<BalanceDelta>> {
    let mut deltas = forward_deltas(tx, source_is_credit)?;
    for delta in &mut deltas {
        delta.amount = -delta.amount;
    }
    Ok(deltas)
}

/// Coalesces deltas touching the same account and drops the ones that net to
/// zero, preserving first-touch order.
///
/// An update batches the old row's reversal with the new row's forward
/// effects; merging first means each account row is written at most once per
/// operation.
pub fn merge_deltas(deltas: Vec<BalanceDelta>) -> Vec<BalanceDelta> {
    let mut merged: Vec<BalanceDelta> = Vec::with_capacity(deltas.len());
    for delta in deltas {
        match merged.iter_mut().find(|m| m.account_id == delta.account_id) {
            Some(existing) => existing.amount += delta.amount,
            None => merged.push(delta),
        }
    }
    merged.retain(|m| !m.amount.is_zero());
    merged
}
