//! Configuration loading and env substitution.
//!
//! Config files: `orion.toml`, `orion.yaml`, or `orion.json`
//! Searched in `./` then `~/.config/orion/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        config_dir, data_dir, discover_and_load, load_config, set_config_dir, set_data_dir,
    },
    schema::{OrionConfig, ResponderConfig, ServerConfig, VoiceConfig},
};
