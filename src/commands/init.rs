use crate::config::CONFIG_FILE_NAME;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Riskboard Configuration

[api]
base_url = "http://localhost:8000/api"
timeout_secs = 30
# token = "..."

[view]
page_size = 10

[risk]
# Whether the "high" risk filter on list pages also admits critical students.
widen_high_in_lists = false
# Whether summary cards fold critical students into the high-risk count.
widen_high_in_summary = true
"#;

    fs::write(&config_path, default_config)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
