use anyhow::Result;
use clap::Parser;
use riskboard::cli::{Cli, Commands};
use riskboard::commands::{self, DashboardArgs, ListArgs};
use riskboard::config::RiskboardConfig;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = RiskboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dashboard { role, api_url, demo } => {
            commands::run_dashboard(
                &config,
                DashboardArgs {
                    role: role.into(),
                    api_url,
                    demo,
                },
            )
            .await
        }
        Commands::List {
            collection,
            search,
            filters,
            sort,
            desc,
            page,
            page_size,
            format,
            api_url,
            demo,
        } => {
            commands::run_list(
                &config,
                ListArgs {
                    collection: collection.into(),
                    search,
                    filters,
                    sort,
                    desc,
                    page,
                    page_size,
                    format,
                    api_url,
                    demo,
                },
            )
            .await
        }
        Commands::Init { force } => commands::init_config(force),
    }
}
