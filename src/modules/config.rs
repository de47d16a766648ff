use std::fs;
use std::path::Path;

use crate::proxy::BridgeConfig;

const CONFIG_PATH_ENV: &str = "JIRA_BRIDGE_CONFIG";

/// Load bridge configuration
///
/// Reads the optional JSON file named by `JIRA_BRIDGE_CONFIG`, then lets the
/// process environment override individual fields.
pub fn load_bridge_config() -> Result<BridgeConfig, String> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_config_file(Path::new(path.trim()))?,
        _ => BridgeConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Read a JSON config file; every field is optional.
pub fn load_config_file(path: &Path) -> Result<BridgeConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
}
