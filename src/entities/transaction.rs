//! Transaction entity - Represents every recorded movement of money.
//!
//! Each transaction has a kind, a positive `amount`, the `date` it applies
//! to, a `description`, and links to the accounts and category involved.
//! Which links must be present depends on the kind: income and expense
//! require a `category_id`, forbid a destination, and may leave the account
//! unassigned; transfers require both accounts and forbid a category;
//! payments stand alone against a credit account. `core::ledger` validates
//! these shapes before any row is written.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// The kind of transaction, which decides its balance effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "payment")]
    Payment,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The kind of transaction
    pub kind: TransactionKind,
    /// Magnitude of the movement, always positive; the kind gives it direction
    pub amount: Money,
    /// Calendar date the transaction applies to (budget windows use this)
    pub date: Date,
    /// Human-readable description of the transaction
    pub description: String,
    /// Category label; required for income and expense, absent otherwise
    pub category_id: Option<Uuid>,
    /// The account the transaction acts on (the source for transfers);
    /// income and expense rows may leave it unassigned
    pub account_id: Option<Uuid>,
    /// Receiving account; present only for transfers
    pub destination_account_id: Option<Uuid>,
    /// When the transaction row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction acts on one source account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Transfers additionally point at a destination account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::DestinationAccountId",
        to = "super::account::Column::Id"
    )]
    DestinationAccount,
    /// Income and expense transactions are labeled by one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
