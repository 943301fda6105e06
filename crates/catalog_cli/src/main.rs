//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `catalog_core` linkage and environment configuration.
//! - Open the configured store and report how many products it holds.

use catalog_core::db::open_configured;
use catalog_core::{ProductRepository, SqliteProductRepository, StoreConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("catalog_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::from_env()?;
    catalog_core::init_from_config(&config)?;

    println!("catalog_core ping={}", catalog_core::ping());
    println!("catalog_core version={}", catalog_core::core_version());

    let conn = open_configured(&config.database)?;
    let repo = SqliteProductRepository::try_new(&conn)?;
    println!("catalog_core products={}", repo.query().count()?);
    Ok(())
}
