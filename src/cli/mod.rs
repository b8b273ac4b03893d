pub mod auth;
pub mod commands;
pub mod config;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "acr-classic-repro")]
#[command(about = "Reproduce the classic container registry storage account linkage on Azure")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a project config file
    Init(InitArgs),
    /// Create the resources, read back the linkage, then tear down
    Run(RunArgs),
    /// Dry-run: show the resources a run would create
    Plan(PlanArgs),
    /// Show which resources currently exist
    Status(StatusArgs),
    /// Delete leftover resources from an earlier run
    Destroy(DestroyArgs),
}

/// Arguments shared by every command that talks to Azure
#[derive(clap::Args, Clone, Debug, Default)]
pub struct TargetArgs {
    /// Resource name prefix (default: bug1943)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Azure cloud (AzurePublicCloud, AzureUSGovernmentCloud, AzureChinaCloud, AzureGermanCloud)
    #[arg(long, env = "ARM_ENVIRONMENT")]
    pub cloud: Option<String>,
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Resource name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Azure region
    #[arg(long)]
    pub location: Option<String>,

    /// Azure cloud name
    #[arg(long)]
    pub cloud: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Azure region (default: West Europe)
    #[arg(long)]
    pub location: Option<String>,

    /// Keep the resources instead of tearing them down
    #[arg(long)]
    pub keep: bool,

    /// Exit with an error unless both storage account IDs are identical
    #[arg(long)]
    pub strict: bool,

    /// Seconds between polls of long-running operations
    #[arg(long, default_value = "10")]
    pub poll_interval_secs: u64,

    /// Minutes to wait for a long-running operation
    #[arg(long, default_value = "15")]
    pub timeout_mins: u64,
}

#[derive(clap::Args)]
pub struct PlanArgs {
    /// Resource name prefix (default: bug1943)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Azure region (default: West Europe)
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(clap::Args)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,

    /// Minutes to wait for each deletion
    #[arg(long, default_value = "15")]
    pub timeout_mins: u64,
}
