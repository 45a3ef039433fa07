use crate::core::Role;
use crate::store::Collection;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Advisor,
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Advisor => Role::Advisor,
            RoleArg::Student => Role::Student,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollectionArg {
    Users,
    Students,
    Advisors,
    Notifications,
    Interventions,
    Meetings,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Users => Collection::Users,
            CollectionArg::Students => Collection::Students,
            CollectionArg::Advisors => Collection::Advisors,
            CollectionArg::Notifications => Collection::Notifications,
            CollectionArg::Interventions => Collection::Interventions,
            CollectionArg::Meetings => Collection::Meetings,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Rendered table
    Table,
    /// Page items plus counts as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "riskboard")]
#[command(about = "Terminal dashboard for academic risk monitoring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to .riskboard.toml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard
    Dashboard {
        /// Role whose views to present
        #[arg(long, value_enum, default_value = "advisor")]
        role: RoleArg,

        /// Override the backend base URL
        #[arg(long = "api-url", env = "RISKBOARD_API_URL")]
        api_url: Option<String>,

        /// Run against seeded in-memory data instead of a backend
        #[arg(long)]
        demo: bool,
    },

    /// Fetch one collection and print a page of it
    List {
        /// Collection to list
        #[arg(value_enum)]
        collection: CollectionArg,

        /// Free-text search over the collection's searchable fields
        #[arg(long)]
        search: Option<String>,

        /// Categorical filter, repeatable
        #[arg(long = "filter", value_parser = parse_filter, value_name = "CATEGORY=VALUE")]
        filters: Vec<(String, String)>,

        /// Sort key (each collection has a sensible default)
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page (defaults to the configured page size)
        #[arg(long = "page-size")]
        page_size: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Override the backend base URL
        #[arg(long = "api-url", env = "RISKBOARD_API_URL")]
        api_url: Option<String>,

        /// Run against seeded in-memory data instead of a backend
        #[arg(long)]
        demo: bool,
    },

    /// Write a default .riskboard.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(category, value)| (category.trim().to_string(), value.trim().to_string()))
        .filter(|(category, value)| !category.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("risk_level=high").unwrap(),
            ("risk_level".to_string(), "high".to_string())
        );
        assert!(parse_filter("risk_level").is_err());
        assert!(parse_filter("=high").is_err());
    }

    #[test]
    fn test_list_command_parses() {
        let cli = Cli::try_parse_from([
            "riskboard",
            "list",
            "students",
            "--filter",
            "risk_level=high",
            "--sort",
            "gpa",
            "--desc",
            "--page",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::List { filters, sort, desc, page, .. } => {
                assert_eq!(filters.len(), 1);
                assert_eq!(sort.as_deref(), Some("gpa"));
                assert!(desc);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_dashboard_defaults_to_advisor_role() {
        let cli = Cli::try_parse_from(["riskboard", "dashboard", "--demo"]).unwrap();
        match cli.command {
            Commands::Dashboard { role, demo, .. } => {
                assert!(matches!(role, RoleArg::Advisor));
                assert!(demo);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
