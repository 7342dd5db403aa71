//! Category entity - Labels transactions for reporting and budget scoping.
//!
//! Categories form at most a two-level tree: a category either has no parent
//! or points at a top-level parent. The creation path in `core::category`
//! enforces that a category with a parent can never itself become a parent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a category labels money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable name of the category (e.g., "Groceries", "Salary")
    pub name: String,
    /// Whether this category labels income or expenses
    pub kind: CategoryKind,
    /// Parent category for subcategories, None for top-level categories
    pub parent_category_id: Option<Uuid>,
    /// Display color hint for the UI layer (e.g., "#4caf50")
    pub color: Option<String>,
    /// Display icon hint for the UI layer
    pub icon: Option<String>,
    /// Soft delete flag - inactive categories are hidden but their history stays
    pub is_active: bool,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A subcategory belongs to one parent category
    #[sea_orm(belongs_to = "Entity", from = "Column::ParentCategoryId", to = "Column::Id")]
    Parent,
    /// One category labels many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One category may have budgets scoped to it
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
