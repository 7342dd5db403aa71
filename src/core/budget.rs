//! Budget tracking business logic.
//!
//! Budgets cap monthly expense spending, either for a single category or
//! globally across all spending. This module provides functions for setting
//! and removing caps and for computing progress against them over a
//! reporting window. Only expense transactions count as spending: income,
//! transfers, and payments move money around without consuming any budget.
//! All aggregation happens over the transaction log, so reported figures
//! always agree with the stored rows.

use crate::{
    entities::{
        Budget, Category, Transaction, budget, category,
        transaction::{self, TransactionKind},
    },
    errors::{Error, Result},
    money::Money,
};
use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;

/// A budget cap joined with its consumption over a reporting window.
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    /// The budget row being reported on
    pub budget: budget::Model,
    /// Category the cap applies to; None for the global cap
    pub category: Option<category::Model>,
    /// Expense total inside the window
    pub spent: Money,
    /// Cap minus spending; negative when the cap is blown
    pub remaining: Money,
    /// Consumed share of the cap as a percentage, clamped to 0-100
    pub progress_percent: f64,
}

/// Finds the budget row for a scope, where `None` means the global cap.
async fn find_by_scope(
    db: &DatabaseConnection,
    category_id: Option<Uuid>,
) -> Result<Option<budget::Model>> {
    let query = match category_id {
        Some(id) => Budget::find().filter(budget::Column::CategoryId.eq(id)),
        None => Budget::find().filter(budget::Column::CategoryId.is_null()),
    };
    query.one(db).await.map_err(Into::into)
}

fn scope_label(category_id: Option<Uuid>) -> String {
    category_id.map_or_else(|| "global".to_string(), |id| id.to_string())
}

/// Sets the monthly cap for a scope, creating or replacing the single budget
/// row for it.
///
/// Passing `None` for the category sets the global cap over all spending.
/// Upserting here is what keeps one row per scope; budgets are never
/// inserted anywhere else.
///
/// # Errors
/// Returns `InvalidAmount` for a non-positive cap and `CategoryNotFound`
/// when the scoped category is missing or retired.
pub async fn set_budget(
    db: &DatabaseConnection,
    category_id: Option<Uuid>,
    amount: Money,
) -> Result<budget::Model> {
    if !amount.is_positive() {
        return Err(Error::InvalidAmount {
            amount: amount.to_string(),
        });
    }

    if let Some(id) = category_id {
        let category =
            Category::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| Error::CategoryNotFound {
                    id: id.to_string(),
                })?;
        if !category.is_active {
            return Err(Error::CategoryNotFound { id: id.to_string() });
        }
    }

    let stored = if let Some(existing) = find_by_scope(db, category_id).await? {
        // Update the existing cap for this scope
        let mut active_model: budget::ActiveModel = existing.into();
        active_model.amount = Set(amount);
        active_model.update(db).await?
    } else {
        // First cap for this scope
        let new_budget = budget::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(category_id),
            amount: Set(amount),
        };
        new_budget.insert(db).await?
    };

    Ok(stored)
}

/// Removes the budget cap for a scope, where `None` means the global cap.
///
/// # Errors
/// Returns `BudgetNotFound` when no cap is set for the scope.
pub async fn remove_budget(db: &DatabaseConnection, category_id: Option<Uuid>) -> Result<()> {
    let budget = find_by_scope(db, category_id)
        .await?
        .ok_or_else(|| Error::BudgetNotFound {
            scope: scope_label(category_id),
        })?;

    budget.delete(db).await?;

    Ok(())
}

/// Retrieves all configured budget caps.
pub async fn get_all_budgets(db: &DatabaseConnection) -> Result<Vec<budget::Model>> {
    Budget::find().all(db).await.map_err(Into::into)
}

/// Computes progress for every budget over the month to date.
///
/// The window runs from the first of the current month through today,
/// inclusive.
pub async fn budget_progress(db: &DatabaseConnection) -> Result<Vec<BudgetProgress>> {
    budget_progress_as_of(db, Utc::now().date_naive()).await
}

/// Computes progress for every budget over the month to date as seen from
/// `reference`.
///
/// The window runs from the first of the reference month through the
/// reference date, inclusive. Entries come back with the global cap first
/// and category caps alphabetically after it.
pub async fn budget_progress_as_of(
    db: &DatabaseConnection,
    reference: NaiveDate,
) -> Result<Vec<BudgetProgress>> {
    // Day one always exists for a valid year and month
    let start =
        NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1).unwrap_or(reference);
    progress_for_window(db, start, reference).await
}

/// Computes progress for every budget over one whole calendar month.
///
/// # Errors
/// Returns a validation error when the year and month do not name a real
/// calendar month.
pub async fn budget_progress_for_month(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<BudgetProgress>> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::Validation {
        message: format!("Invalid month: {year}-{month:02}"),
    })?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .ok_or_else(|| Error::Validation {
            message: format!("Invalid month: {year}-{month:02}"),
        })?;

    progress_for_window(db, start, end).await
}

/// Aggregates expense spending inside `[start, end]` and joins it against
/// every budget.
///
/// Spending is bucketed by the exact category on each expense row; child
/// categories never roll up into their parent's cap. The global cap counts
/// every expense regardless of category.
async fn progress_for_window(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<BudgetProgress>> {
    let budgets = Budget::find().all(db).await?;
    if budgets.is_empty() {
        return Ok(Vec::new());
    }

    let expenses = Transaction::find()
        .filter(transaction::Column::Kind.eq(TransactionKind::Expense))
        .filter(transaction::Column::Date.between(start, end))
        .all(db)
        .await?;

    let mut global_spent = Money::zero();
    let mut per_category: HashMap<Uuid, Money> = HashMap::new();
    for expense in &expenses {
        global_spent += expense.amount;
        if let Some(category_id) = expense.category_id {
            *per_category.entry(category_id).or_default() += expense.amount;
        }
    }

    let mut results = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let (category, spent) = match budget.category_id {
            Some(category_id) => {
                let category = Category::find_by_id(category_id).one(db).await?;
                let spent = per_category.get(&category_id).copied().unwrap_or_default();
                (category, spent)
            }
            None => (None, global_spent),
        };

        let remaining = budget.amount - spent;
        let progress_percent = calculate_progress(spent, budget.amount);

        results.push(BudgetProgress {
            budget,
            category,
            spent,
            remaining,
            progress_percent,
        });
    }

    // Global cap first, then category caps alphabetically
    results.sort_by_key(|entry| entry.category.as_ref().map(|c| c.name.clone()));

    Ok(results)
}

/// Calculates how much of a cap has been consumed, as a percentage.
///
/// The result is clamped to 0-100: a blown cap reads as 100%, with the
/// overshoot carried by the remaining amount instead.
#[must_use]
pub fn calculate_progress(spent: Money, cap: Money) -> f64 {
    if !cap.is_positive() {
        return if spent.is_positive() { 100.0 } else { 0.0 };
    }

    // Cast safety: minor units are far below 2^52, so both casts are exact
    #[allow(clippy::cast_precision_loss)]
    let ratio = spent.minor() as f64 / cap.minor() as f64;

    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    // Result is mathematically in [0, length], truncation/sign loss intentional for display.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats budget progress entries into a human-readable summary, one line
/// per cap.
#[must_use]
pub fn format_budget_summary(progress: &[BudgetProgress]) -> String {
    use std::fmt::Write;

    let mut summary = String::new();
    for entry in progress {
        let label = match (&entry.category, entry.budget.category_id) {
            (Some(category), _) => category.name.as_str(),
            // A scoped cap whose category row no longer resolves
            (None, Some(_)) => "uncategorized",
            (None, None) => "All categories",
        };

        // write! is infallible when writing to String, so unwrap is safe
        writeln!(
            summary,
            "{} {} | spent {} of {} | remaining {}",
            format_progress_bar(entry.progress_percent, None),
            label,
            entry.spent,
            entry.budget.amount,
            entry.remaining
        )
        .unwrap();
    }

    summary
}
