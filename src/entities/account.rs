//! Account entity - Represents a place money lives or is owed.
//!
//! Each account carries a cached `current_balance` that the ledger keeps
//! consistent with the transaction log. For credit accounts the balance is
//! the outstanding debt (positive means money owed); for the other kinds it
//! is the money held.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// The kind of account, which decides how transactions move its balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[sea_orm(string_value = "bank")]
    Bank,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "credit")]
    Credit,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable name of the account (e.g., "Checking", "Visa")
    pub name: String,
    /// The kind of account
    pub kind: AccountKind,
    /// ISO 4217 currency code, e.g. "USD", "EUR"
    pub currency: String,
    /// Cached balance, maintained by the ledger; debt owed for credit accounts
    pub current_balance: Money,
    /// Spending ceiling for credit accounts, None for the other kinds
    pub credit_limit: Option<Money>,
    /// Whether this account is preselected by the UI layer
    pub is_default: bool,
    /// Soft delete flag - inactive accounts are hidden but their history stays
    pub is_active: bool,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many transactions (as the source account)
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
