use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<RouterConfig> {
    let txt = fs::read_to_string(p)
        .map_err(|e| RouterError::Config(format!("failed to read config file: {e}")))?;
    let cfg: RouterConfig = toml::from_str(&txt)
        .map_err(|e| RouterError::Config(format!("failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &RouterConfig) -> Result<()> {
    let alias_names: HashSet<&str> = cfg.aliases.iter().map(|a| a.name.as_str()).collect();
    if alias_names.len() != cfg.aliases.len() {
        return Err(RouterError::Config("duplicate alias name".into()));
    }
    for alias in &cfg.aliases {
        if alias.name == alias.target {
            return Err(RouterError::Config(format!(
                "alias '{}' cannot target itself",
                alias.name
            )));
        }
    }

    if let Some(byte_rate) = &cfg.byte_rate {
        if byte_rate.seconds == 0 {
            return Err(RouterError::Config("byte_rate.seconds must be > 0".into()));
        }
    }
    if cfg.conn_rate.total != 0 && cfg.conn_rate.seconds == 0 {
        return Err(RouterError::Config("conn_rate.seconds must be > 0".into()));
    }

    Ok(())
}
