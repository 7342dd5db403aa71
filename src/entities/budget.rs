//! Budget entity - A monthly spending limit, global or scoped to a category.
//!
//! At most one budget exists per scope: one row with `category_id = None`
//! (the global limit over all expenses) and at most one row per category.
//! `core::budget` upserts through this invariant rather than relying on a
//! database constraint, since SQLite treats NULLs as distinct in unique
//! indexes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Scoping category, or None for the global all-expenses budget
    pub category_id: Option<Uuid>,
    /// Monthly limit; spending at or beyond it reads as 100% progress
    pub amount: Money,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A scoped budget belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
