//! Launches the interactive dashboard.

use crate::config::RiskboardConfig;
use crate::core::Role;
use crate::store::{DashboardStore, Dispatcher};
use crate::tui::app::DashboardApp;
use crate::tui::TuiManager;
use anyhow::Result;
use tokio::sync::mpsc;

pub struct DashboardArgs {
    pub role: Role,
    pub api_url: Option<String>,
    pub demo: bool,
}

pub async fn run_dashboard(config: &RiskboardConfig, args: DashboardArgs) -> Result<()> {
    let client = super::build_client(config, args.api_url.as_deref(), args.demo)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(client, tx);
    let store = DashboardStore::new(args.role, config.view.page_size);

    // Kick off the initial reads before the first frame; results arrive as
    // actions through the channel the run loop drains.
    dispatcher.load_all(&store.visible_collections());

    let app = DashboardApp::new(store, dispatcher, config.risk.clone());
    let tui = TuiManager::new()?;
    tui.run(app, rx).await
}
