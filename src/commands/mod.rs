//! CLI command implementations.
//!
//! Available commands:
//! - **dashboard**: interactive TUI over the configured backend (or demo data)
//! - **list**: one-shot fetch + view pipeline + table/JSON output
//! - **init**: write a default `.riskboard.toml`

pub mod dashboard;
pub mod init;
pub mod list;

pub use dashboard::{run_dashboard, DashboardArgs};
pub use init::init_config;
pub use list::{run_list, ListArgs};

use crate::api::{ApiClient, HttpApi};
use crate::config::RiskboardConfig;
use crate::testkit::MemoryApi;
use anyhow::Result;
use std::sync::Arc;

/// Builds the API client a command runs against: the seeded in-memory
/// backend for `--demo`, otherwise the HTTP wrapper with any `--api-url`
/// override applied.
pub fn build_client(
    config: &RiskboardConfig,
    api_url: Option<&str>,
    demo: bool,
) -> Result<Arc<dyn ApiClient>> {
    if demo {
        return Ok(Arc::new(MemoryApi::seeded()));
    }

    let mut api_config = config.api.clone();
    if let Some(url) = api_url {
        api_config.base_url = url.to_string();
    }
    Ok(Arc::new(HttpApi::new(&api_config)?))
}
