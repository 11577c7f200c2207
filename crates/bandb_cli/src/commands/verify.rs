//! Verify command implementation.

use bandb_core::CoreError;
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Format version byte.
    pub version: u8,
    /// File size in bytes.
    pub file_size: u64,
    /// Number of records.
    pub records: usize,
    /// Number of records with the active flag set.
    pub active: usize,
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying ban file at {:?}", path);
    println!();

    match check(path) {
        Ok(result) => {
            println!("  Version: {}", result.version);
            println!("  File size: {} bytes", result.file_size);
            println!("  Records: {}", result.records);
            println!("  Active: {}", result.active);
            println!();
            println!("✓ Ban file is valid");
            Ok(())
        }
        Err(CoreError::CorruptRecord { offset, source }) => {
            println!("✗ Corrupt record at offset {}: {}", offset, source);
            Err("ban file verification failed".into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Loads the ban file and summarises it.
pub fn check(path: &Path) -> Result<VerifyResult, CoreError> {
    let db = bandb_core::BanDatabase::load_with_config(
        path,
        bandb_core::Config::new().create_if_missing(false),
    )?;
    let file_size = std::fs::metadata(path)?.len();

    Ok(VerifyResult {
        version: db.version(),
        file_size,
        records: db.len(),
        active: db.entries().iter().filter(|e| e.active).count(),
    })
}
