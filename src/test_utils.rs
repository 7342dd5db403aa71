//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{account, category, ledger::TransactionInput},
    entities::{self, account::AccountKind, category::CategoryKind, transaction::TransactionKind},
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{ConnectOptions, DatabaseConnection};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is capped at one connection: every pooled connection would get
/// its own empty in-memory database, so concurrent tests must share the
/// single one that has the tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test account with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Account name
///
/// # Defaults
/// * `kind`: bank
/// * `currency`: "USD"
/// * `opening_balance`: zero
/// * `credit_limit`: None
/// * `is_default`: false
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        name.to_string(),
        AccountKind::Bank,
        "USD".to_string(),
        Money::zero(),
        None,
        false,
    )
    .await
}

/// Creates a test account with a chosen kind and opening balance in minor
/// units. Use this when a test needs money already in place.
pub async fn create_custom_account(
    db: &DatabaseConnection,
    name: &str,
    kind: AccountKind,
    opening_minor: i64,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        name.to_string(),
        kind,
        "USD".to_string(),
        Money::from_minor(opening_minor),
        None,
        false,
    )
    .await
}

/// Creates a credit account with the given limit in minor units and a zero
/// starting debt.
pub async fn create_credit_account(
    db: &DatabaseConnection,
    name: &str,
    limit_minor: i64,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        name.to_string(),
        AccountKind::Credit,
        "USD".to_string(),
        Money::zero(),
        Some(Money::from_minor(limit_minor)),
        false,
    )
    .await
}

/// Creates a test expense category with sensible defaults.
///
/// # Defaults
/// * `kind`: expense
/// * no parent, color, or icon
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), CategoryKind::Expense, None, None, None).await
}

/// Creates a test income category.
pub async fn create_income_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), CategoryKind::Income, None, None, None).await
}

fn base_input(kind: TransactionKind, account_id: Uuid, minor: i64) -> TransactionInput {
    TransactionInput {
        kind,
        amount: Money::from_minor(minor),
        date: chrono::Utc::now().date_naive(),
        description: "Test transaction".to_string(),
        category_id: None,
        account_id: Some(account_id),
        destination_account_id: None,
    }
}

/// Builds an expense input dated today.
///
/// # Defaults
/// * `description`: `"Test transaction"`
#[must_use]
pub fn expense_input(account_id: Uuid, category_id: Option<Uuid>, minor: i64) -> TransactionInput {
    let mut input = base_input(TransactionKind::Expense, account_id, minor);
    input.category_id = category_id;
    input
}

/// Builds an income input dated today.
#[must_use]
pub fn income_input(account_id: Uuid, category_id: Option<Uuid>, minor: i64) -> TransactionInput {
    let mut input = base_input(TransactionKind::Income, account_id, minor);
    input.category_id = category_id;
    input
}

/// Builds a transfer input dated today.
#[must_use]
pub fn transfer_input(source_id: Uuid, destination_id: Uuid, minor: i64) -> TransactionInput {
    let mut input = base_input(TransactionKind::Transfer, source_id, minor);
    input.destination_account_id = Some(destination_id);
    input
}

/// Builds a payment input dated today.
#[must_use]
pub fn payment_input(account_id: Uuid, minor: i64) -> TransactionInput {
    base_input(TransactionKind::Payment, account_id, minor)
}

/// Reads an account's stored balance straight from the database.
pub async fn account_balance(db: &DatabaseConnection, account_id: Uuid) -> Result<Money> {
    let account = account::get_account_by_id(db, account_id)
        .await?
        .ok_or_else(|| Error::AccountNotFound {
            id: account_id.to_string(),
        })?;
    Ok(account.current_balance)
}
