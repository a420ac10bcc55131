use crate::error::{Error, Result};
use crate::reconstruct::RUST_PIPE_TOKEN;
use derive_more::Display;
use eyre::WrapErr;
use std::sync::OnceLock;

pub const ENV_MODE: &str = "FP_DBG_ENV";
pub const ENV_WIDTH: &str = "FP_DBG_WIDTH";
pub const ENV_COLOR: &str = "FP_DBG_COLOR";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

pub const DEFAULT_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display)]
pub enum BuildMode {
    #[default]
    #[display("development")]
    Development,
    #[display("test")]
    Test,
    #[display("production")]
    Production,
    #[display("{_0}")]
    Other(String),
}

impl BuildMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => BuildMode::Development,
            "test" => BuildMode::Test,
            "prod" | "production" => BuildMode::Production,
            _ => BuildMode::Other(value.trim().to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

/// Per-call-site options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub show_vars: bool,
}

impl Options {
    pub fn show_vars() -> Self {
        Self { show_vars: true }
    }

    pub fn set(&mut self, key: &str, value: bool) -> Result<()> {
        match key {
            "show_vars" => self.show_vars = value,
            other => return Err(Error::UnknownOption(other.to_string())),
        }
        Ok(())
    }
}

/// Expansion-time configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: BuildMode,
    /// Maximum width of re-rendered expression text.
    pub width: usize,
    pub pipe_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            width: DEFAULT_WIDTH,
            pipe_token: RUST_PIPE_TOKEN.to_string(),
        }
    }
}

impl Config {
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reads the process environment; the macros use the values compiled into them.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = lookup(ENV_MODE)
            .map(|value| BuildMode::parse(&value))
            .unwrap_or_default();
        let width = match lookup(ENV_WIDTH) {
            Some(value) => parse_width(&value)?,
            None => DEFAULT_WIDTH,
        };
        Ok(Self {
            mode,
            width,
            ..Self::default()
        })
    }
}

fn parse_width(value: &str) -> Result<usize> {
    let width: usize = value
        .trim()
        .parse()
        .wrap_err_with(|| format!("{ENV_WIDTH}={value:?} is not a column count"))?;
    if width == 0 {
        bail!("{ENV_WIDTH} must be greater than zero");
    }
    Ok(width)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    Always,
    Never,
    #[default]
    Auto,
}

impl ColorChoice {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let explicit = lookup(ENV_COLOR).map(|value| match value.trim() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            "auto" | "" => ColorChoice::Auto,
            other => {
                warn!("unrecognized {}={:?}, using auto", ENV_COLOR, other);
                ColorChoice::Auto
            }
        });
        match explicit {
            Some(choice) if choice != ColorChoice::Auto => choice,
            _ if lookup(ENV_NO_COLOR).is_some_and(|value| !value.is_empty()) => {
                ColorChoice::Never
            }
            _ => ColorChoice::Auto,
        }
    }

    /// Choice of the running process, read once.
    pub fn global() -> Self {
        static COLOR: OnceLock<ColorChoice> = OnceLock::new();
        *COLOR.get_or_init(|| ColorChoice::from_lookup(|key| std::env::var(key).ok()))
    }

    pub fn enabled(self, terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn build_modes() {
        assert_eq!(BuildMode::parse("prod"), BuildMode::Production);
        assert_eq!(BuildMode::parse("Production"), BuildMode::Production);
        assert_eq!(BuildMode::parse("dev"), BuildMode::Development);
        assert_eq!(BuildMode::parse("test"), BuildMode::Test);
        assert_eq!(BuildMode::parse("staging"), BuildMode::Other("staging".into()));
        assert!(!BuildMode::parse("staging").is_production());
        assert_eq!(BuildMode::Production.to_string(), "production");
    }

    #[test]
    fn unset_environment_is_development() -> eyre::Result<()> {
        let config = Config::from_lookup(env(&[]))?;
        assert_eq!(config, Config::default());
        assert_eq!(config.width, 60);
        Ok(())
    }

    #[test]
    fn reads_mode_and_width() -> eyre::Result<()> {
        let config = Config::from_lookup(env(&[("FP_DBG_ENV", "prod"), ("FP_DBG_WIDTH", " 80 ")]))?;
        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.width, 80);
        Ok(())
    }

    #[test]
    fn bad_width_is_a_config_error() {
        let err = Config::from_lookup(env(&[("FP_DBG_WIDTH", "wide")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("FP_DBG_WIDTH")), "{err}");
        let err = Config::from_lookup(env(&[("FP_DBG_WIDTH", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn only_show_vars_is_an_option() {
        let mut options = Options::default();
        options.set("show_vars", true).unwrap();
        assert_eq!(options, Options::show_vars());
        let err = options.set("verbose", true).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(ref key) if key == "verbose"));
    }

    #[test]
    fn color_choice() {
        assert_eq!(ColorChoice::from_lookup(env(&[])), ColorChoice::Auto);
        assert_eq!(ColorChoice::from_lookup(env(&[("NO_COLOR", "1")])), ColorChoice::Never);
        assert_eq!(
            ColorChoice::from_lookup(env(&[("NO_COLOR", "1"), ("FP_DBG_COLOR", "always")])),
            ColorChoice::Always
        );
        assert_eq!(ColorChoice::from_lookup(env(&[("FP_DBG_COLOR", "never")])), ColorChoice::Never);
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Auto.enabled(true));
    }
}
