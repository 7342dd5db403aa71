//! Command-line entry point: boots the ledger engine and prints a status
//! summary of account balances and month-to-date budget progress.

use dotenvy::dotenv;
use ledger_core::{config, core, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 4. Seed initial data when a config.toml is present
    if std::path::Path::new("config.toml").exists() {
        let seed_config = config::seed::load_default_config()?;
        config::seed::apply_seed(&db, &seed_config)
            .await
            .inspect(|_| info!("Seed data applied."))
            .inspect_err(|e| error!("Failed to apply seed data: {e}"))?;
    }

    // 5. Print account balances
    let accounts = core::account::get_all_active_accounts(&db).await?;
    if accounts.is_empty() {
        println!("No accounts yet. Add some to config.toml to get started.");
    } else {
        println!("Accounts:");
        for account in &accounts {
            println!(
                "  {} ({}): {}",
                account.name, account.currency, account.current_balance
            );
        }
    }

    // 6. Print month-to-date budget progress
    let progress = core::budget::budget_progress(&db).await?;
    if !progress.is_empty() {
        println!("\nBudgets, month to date:");
        print!("{}", core::budget::format_budget_summary(&progress));
    }

    Ok(())
}
