use acr_classic_repro::cli::{commands, Cli, Commands};
use acr_classic_repro::init_tracing;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Init(args) => commands::execute_init(args)?,
        Commands::Plan(args) => commands::execute_plan(args)?,
        Commands::Run(args) => commands::execute_run(args).await?,
        Commands::Status(args) => commands::execute_status(args).await?,
        Commands::Destroy(args) => commands::execute_destroy(args).await?,
    }

    Ok(())
}
