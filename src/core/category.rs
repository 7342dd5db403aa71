//! Category business logic - Handles all category-related operations.
//!
//! Categories label income and expense transactions and scope budgets.
//! Creation enforces the nesting rule: a category may point at a top-level
//! parent, and nothing deeper. All functions are async and return Result
//! types for error handling.

use crate::{
    entities::{
        Category,
        category::{self, CategoryKind},
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active categories from the database, ordered alphabetically by name.
pub async fn get_all_active_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a specific category by its name, returning None if not found or inactive.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name))
        .filter(category::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its unique ID, including inactive ones.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: Uuid,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category, performing input validation.
///
/// The name is trimmed and must not be empty. When a parent is given it must
/// exist, be active, and itself be top-level; the tree never grows past two
/// levels, which keeps budget scoping by exact category unambiguous.
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    kind: CategoryKind,
    parent_category_id: Option<Uuid>,
    color: Option<String>,
    icon: Option<String>,
) -> Result<category::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    if let Some(parent_id) = parent_category_id {
        let parent = Category::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::CategoryNotFound {
                id: parent_id.to_string(),
            })?;

        if !parent.is_active {
            return Err(Error::CategoryNotFound {
                id: parent_id.to_string(),
            });
        }

        if parent.parent_category_id.is_some() {
            return Err(Error::Validation {
                message: "Categories can nest at most one level deep".to_string(),
            });
        }
    }

    let category = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        kind: Set(kind),
        parent_category_id: Set(parent_category_id),
        color: Set(color),
        icon: Set(icon),
        is_active: Set(true),
    };

    category.insert(db).await.map_err(Into::into)
}

/// Soft-deletes a category, preserving the transactions that reference it.
///
/// # Errors
/// Returns a not-found error if the category does not exist or is already
/// inactive.
pub async fn deactivate_category(
    db: &DatabaseConnection,
    category_id: Uuid,
) -> Result<category::Model> {
    let mut category: category::ActiveModel = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            id: category_id.to_string(),
        })?
        .into();

    if !*category.is_active.as_ref() {
        return Err(Error::CategoryNotFound {
            id: category_id.to_string(),
        });
    }

    category.is_active = Set(false);
    category.update(db).await.map_err(Into::into)
}
