use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use {
    anyhow::Context as _,
    once_cell::sync::Lazy,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::OrionConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["orion.toml", "orion.yaml", "orion.yml", "orion.json"];

static CONFIG_DIR_OVERRIDE: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));
static DATA_DIR_OVERRIDE: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

/// Override the config directory (normally `~/.config/orion/`).
pub fn set_config_dir(dir: PathBuf) {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = Some(dir);
    }
}

/// Override the data directory (chat store location).
pub fn set_data_dir(dir: PathBuf) {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = Some(dir);
    }
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(guard) = CONFIG_DIR_OVERRIDE.read()
        && let Some(ref dir) = *guard
    {
        return Some(dir.clone());
    }
    directories::ProjectDirs::from("", "", "orion").map(|d| d.config_dir().to_path_buf())
}

/// Returns the data directory where the chat store lives.
pub fn data_dir() -> PathBuf {
    if let Ok(guard) = DATA_DIR_OVERRIDE.read()
        && let Some(ref dir) = *guard
    {
        return dir.clone();
    }
    directories::ProjectDirs::from("", "", "orion")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".orion"))
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<OrionConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./orion.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/orion/orion.{toml,yaml,yml,json}` (user-global)
///
/// Returns `OrionConfig::default()` if no config file is found.
pub fn discover_and_load() -> OrionConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    OrionConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global
    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<OrionConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
