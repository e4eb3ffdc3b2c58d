//! Command handlers for the HUSH CLI

pub mod dashboard;

use crate::config::Config;
use crate::error::Result;
use crate::service::HushService;

/// Create the schema and seed an empty store, then return
pub fn run_seed(config: &Config) -> Result<()> {
    let service = HushService::from_config(config)?;
    let seeded = service.bootstrap()?;
    let total = service.store().count()?;
    println!(
        "Seeded {} snapshot(s); {} stored in {}",
        seeded, total, config.storage.db_path
    );
    Ok(())
}
