//! Configuration compiled into the macros.
//!
//! `build.rs` forwards `FP_DBG_ENV` and `FP_DBG_WIDTH` and asks cargo to rebuild this
//! crate when either changes, so every expansion sees the values of the current build.

use fp_dbg_core::config::{ENV_MODE, ENV_WIDTH};
use fp_dbg_core::{Config, Error, Result};
use std::sync::OnceLock;

/// Value of `key` when this crate was compiled.
fn compiled(key: &str) -> Option<&'static str> {
    match key {
        ENV_MODE => option_env!("FP_DBG_ENV"),
        ENV_WIDTH => option_env!("FP_DBG_WIDTH"),
        _ => None,
    }
}

pub fn compiled_config() -> Result<Config> {
    Config::from_lookup(|key| compiled(key).map(str::to_string))
}

/// Compiled configuration, parsed once per compiler process.
pub fn global() -> Result<&'static Config> {
    static CONFIG: OnceLock<std::result::Result<Config, String>> = OnceLock::new();
    CONFIG
        .get_or_init(|| compiled_config().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|msg| Error::Config(msg.clone()))
}
