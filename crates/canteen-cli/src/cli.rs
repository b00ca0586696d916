use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "canteen",
    about = "Canteen — office wallet and free-lunch entitlement ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML config file (currency prefix, grant validity).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the privilege ladder
    Roles,
    /// Resolve a role identifier (rank number or name) to a rank
    Resolve(ResolveArgs),
    /// Check whether an actor rank satisfies a required role
    Check(CheckArgs),
    /// Run a scripted end-to-end session against an in-memory store
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Rank number or role name, e.g. "1000" or "Admin"
    pub identifier: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// The actor's rank or role name
    pub actor: String,
    /// The required rank or role name
    pub required: String,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of member accounts to register besides the founder
    #[arg(long, default_value_t = 3)]
    pub members: u32,
    /// Lunch target the founder sets on each member
    #[arg(long, default_value_t = 2)]
    pub lunches: i64,
}
