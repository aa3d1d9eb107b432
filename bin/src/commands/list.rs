//! List command implementation.
//!
//! Shows the instrument set an acquisition run would maintain: the full
//! catalog put through the same category and code filter.

use std::path::Path;

use anyhow::{Context, Result};
use taroko_lib::{Catalog, CategoryExclusions, DataDir, filter_instruments};

/// Lists the filtered catalog.
pub(crate) async fn list_instruments(data_dir: &Path, base_url: &str) -> Result<()> {
    let source = super::build_source(base_url)?;
    let raw = source.instruments().await.context("Catalog unavailable")?;

    let layout = DataDir::new(data_dir);
    let exclusions = CategoryExclusions::load(&layout.category_path()).unwrap_or_default();
    let instruments = filter_instruments(&raw, &exclusions);

    if instruments.is_empty() {
        println!("No instruments found.");
        return Ok(());
    }

    println!("{:<8} {:<24} {:<6} {:<8}", "CODE", "NAME", "BOARD", "CATEGORY");
    println!("{}", "-".repeat(50));
    for instrument in &instruments {
        println!(
            "{:<8} {:<24} {:<6} {:<8}",
            instrument.code(),
            instrument.name(),
            instrument.board(),
            instrument.category()
        );
    }

    println!("\nTotal: {} instruments", instruments.len());
    Ok(())
}
