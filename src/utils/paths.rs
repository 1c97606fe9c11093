use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub fn get_bibclip_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".bibclip"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let bibclip_dir = get_bibclip_dir()?;
    Ok(bibclip_dir.join("config.toml"))
}

/// Expands a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
