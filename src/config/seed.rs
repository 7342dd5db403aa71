//! Seed data loading from config.toml
//!
//! This module provides functionality to load initial accounts, categories,
//! and budget caps from a TOML configuration file, so a fresh database starts
//! in a usable state. Accounts and categories are created only when missing;
//! their runtime state is never reset by a re-run. Budget caps are applied on
//! every run, which keeps the file authoritative for them.

use crate::{
    entities::{account::AccountKind, category::CategoryKind},
    errors::{Error, Result},
    money::Money,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Accounts to create when missing
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Categories to create when missing
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Budget caps to apply
    #[serde(default)]
    pub budgets: Vec<BudgetConfig>,
}

/// Configuration for a single account
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Name of the account
    pub name: String,
    /// Account kind: "bank", "cash", "credit", or "other"
    pub kind: AccountKind,
    /// ISO currency code, e.g. "USD"
    pub currency: String,
    /// Balance the account starts with, as a decimal string
    #[serde(default)]
    pub opening_balance: Money,
    /// Credit limit, only valid for credit accounts
    pub credit_limit: Option<Money>,
    /// Whether this is the default account for new transactions
    #[serde(default)]
    pub is_default: bool,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
    /// Category kind: "income" or "expense"
    pub kind: CategoryKind,
    /// Name of the parent category; it must appear earlier in the file or
    /// already exist
    pub parent: Option<String>,
    /// Display color, e.g. "#4CAF50"
    pub color: Option<String>,
    /// Display icon name
    pub icon: Option<String>,
}

/// Configuration for a single budget cap
#[derive(Debug, Deserialize, Clone)]
pub struct BudgetConfig {
    /// Name of the category the cap applies to; omit for the global cap
    pub category: Option<String>,
    /// Monthly cap, as a decimal string
    pub amount: Money,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Applies a seed configuration to the database.
///
/// Accounts and categories already present (matched by name) are left
/// untouched. Budget caps go through the usual upsert, so the configured
/// amounts always win.
pub async fn apply_seed(db: &DatabaseConnection, config: &Config) -> Result<()> {
    for account_config in &config.accounts {
        if crate::core::account::get_account_by_name(db, &account_config.name)
            .await?
            .is_some()
        {
            info!("Account '{}' already exists, skipping", account_config.name);
            continue;
        }

        crate::core::account::create_account(
            db,
            account_config.name.clone(),
            account_config.kind,
            account_config.currency.clone(),
            account_config.opening_balance,
            account_config.credit_limit,
            account_config.is_default,
        )
        .await?;
        info!("Seeded account '{}'", account_config.name);
    }

    for category_config in &config.categories {
        if crate::core::category::get_category_by_name(db, &category_config.name)
            .await?
            .is_some()
        {
            info!(
                "Category '{}' already exists, skipping",
                category_config.name
            );
            continue;
        }

        let parent_category_id = match &category_config.parent {
            Some(parent_name) => {
                let parent = crate::core::category::get_category_by_name(db, parent_name)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Parent category '{}' not found for '{}'",
                            parent_name, category_config.name
                        ),
                    })?;
                Some(parent.id)
            }
            None => None,
        };

        crate::core::category::create_category(
            db,
            category_config.name.clone(),
            category_config.kind,
            parent_category_id,
            category_config.color.clone(),
            category_config.icon.clone(),
        )
        .await?;
        info!("Seeded category '{}'", category_config.name);
    }

    for budget_config in &config.budgets {
        let category_id = match &budget_config.category {
            Some(category_name) => {
                let category = crate::core::category::get_category_by_name(db, category_name)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!("Budget references unknown category '{category_name}'"),
                    })?;
                Some(category.id)
            }
            None => None,
        };

        crate::core::budget::set_budget(db, category_id, budget_config.amount).await?;
        info!(
            "Applied budget cap {} for '{}'",
            budget_config.amount,
            budget_config.category.as_deref().unwrap_or("all categories")
        );
    }

    Ok(())
}
