//! bandb CLI
//!
//! Command-line tools for bandb ban files.
//!
//! # Commands
//!
//! - `list` - Print ban entries
//! - `add` - Record a new ban
//! - `deactivate` - Lift a ban by index
//! - `export` - Copy bans into a fresh ban file
//! - `verify` - Check that a ban file loads cleanly

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// bandb command-line ban file tools.
#[derive(Parser)]
#[command(name = "bandb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ban file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print ban entries
    List {
        /// Only show bans that are currently enforced
        #[arg(short, long)]
        active: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Record a new ban
    Add {
        /// Player display name
        #[arg(short, long)]
        name: String,

        /// Reason for the ban
        #[arg(short, long)]
        reason: String,

        /// Player SteamID
        #[arg(short, long, default_value = "0")]
        steamid: u64,

        /// Player IPv4 address
        #[arg(short, long)]
        ip: Option<std::net::Ipv4Addr>,

        /// Player reverse DNS
        #[arg(long, default_value = "")]
        rdns: String,

        /// Ban duration in seconds (0 = permanent)
        #[arg(short, long, default_value = "0")]
        length: i64,

        /// Extra data as key=value (repeatable)
        #[arg(long = "var", value_parser = commands::add::parse_key_val)]
        vars: Vec<(String, String)>,
    },

    /// Lift a ban by its index
    Deactivate {
        /// Index of the entry, as shown by `list`
        index: usize,
    },

    /// Copy bans into a fresh ban file
    Export {
        /// Destination ban file (must not exist)
        dest: PathBuf,

        /// Only export bans that are currently enforced
        #[arg(short, long)]
        active: bool,
    },

    /// Check that a ban file loads cleanly
    Verify,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List { active, format } => {
            let path = cli.path.ok_or("Ban file path required for list")?;
            commands::list::run(&path, active, &format)?;
        }
        Commands::Add {
            name,
            reason,
            steamid,
            ip,
            rdns,
            length,
            vars,
        } => {
            let path = cli.path.ok_or("Ban file path required for add")?;
            let player = bandb_core::PlayerInfo {
                steamid,
                ip: ip.map_or(0, u32::from),
                rdns,
                name,
            };
            commands::add::run(&path, &player, &reason, length, vars)?;
        }
        Commands::Deactivate { index } => {
            let path = cli.path.ok_or("Ban file path required for deactivate")?;
            commands::deactivate::run(&path, index)?;
        }
        Commands::Export { dest, active } => {
            let path = cli.path.ok_or("Ban file path required for export")?;
            commands::export::run(&path, &dest, active)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Ban file path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("bandb CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("bandb core v{}", bandb_core::VERSION);
            println!("ban file format v{}", bandb_core::BAN_DB_VERSION);
        }
    }

    Ok(())
}
