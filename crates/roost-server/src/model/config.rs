//! Configuration management for the Roost provider runtime
//!
//! Sources, lowest precedence first:
//! - `conf/application.yml` (or the file given with `--config`), optional
//! - `ROOST__`-prefixed environment variables, `__` separating key segments
//!   (`ROOST__MONITOR__ENABLED=false` sets `roost.monitor.enabled`)
//! - command line overrides

use clap::Parser;
use config::{Config, Environment, File};
use roost_common::RegistryPaths;
use roost_common::paths::{
    DEFAULT_EPHEMERAL_SERVICE_PATH, DEFAULT_SERVICE_PATH, DEFAULT_WEIGHT_PATH,
};
use roost_registry::GroupConfigAccessor;
use roost_remoting::ProcessConfig;

use crate::startup::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

pub const GROUP_PROPERTY: &str = "roost.group";
pub const MONITOR_ENABLED_PROPERTY: &str = "roost.monitor.enabled";
pub const SERVICE_PATH_PROPERTY: &str = "roost.registry.paths.service";
pub const WEIGHT_PATH_PROPERTY: &str = "roost.registry.paths.weight";
pub const EPHEMERAL_PATH_PROPERTY: &str = "roost.registry.paths.ephemeral";
pub const LOG_DIR_PROPERTY: &str = "roost.logging.dir";
pub const LOG_LEVEL_PROPERTY: &str = "roost.logging.level";
pub const LOG_FILE_PROPERTY: &str = "roost.logging.file";
pub const LOG_CONSOLE_PROPERTY: &str = "roost.logging.console";

/// Command line arguments for the provider runtime
#[derive(Debug, Parser)]
#[command(name = "roost-server", version, about = "Roost provider runtime")]
pub struct Cli {
    #[arg(short = 'c', long = "config", env = "ROOST_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,
    #[arg(short = 'g', long = "group")]
    pub group: Option<String>,
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process's command line.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let mut config_builder = Config::builder()
            .add_source(File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix("roost")
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .try_parsing(true),
            );

        if let Some(v) = args.group {
            config_builder = config_builder.set_override(GROUP_PROPERTY, v)?;
        }
        if let Some(v) = args.log_level {
            config_builder = config_builder.set_override(LOG_LEVEL_PROPERTY, v)?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// The raw routing group, if configured.
    pub fn group(&self) -> Option<String> {
        self.config.get_string(GROUP_PROPERTY).ok()
    }

    pub fn monitor_enabled(&self) -> bool {
        self.config.get_bool(MONITOR_ENABLED_PROPERTY).unwrap_or(true)
    }

    pub fn process_config(&self) -> ProcessConfig {
        ProcessConfig {
            monitor_enabled: self.monitor_enabled(),
        }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub fn registry_paths(&self) -> roost_common::Result<RegistryPaths> {
        RegistryPaths::new(
            self.config
                .get_string(SERVICE_PATH_PROPERTY)
                .unwrap_or(DEFAULT_SERVICE_PATH.to_string()),
            self.config
                .get_string(WEIGHT_PATH_PROPERTY)
                .unwrap_or(DEFAULT_WEIGHT_PATH.to_string()),
            self.config
                .get_string(EPHEMERAL_PATH_PROPERTY)
                .unwrap_or(DEFAULT_EPHEMERAL_SERVICE_PATH.to_string()),
        )
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOG_DIR_PROPERTY).ok(),
            self.config.get_bool(LOG_CONSOLE_PROPERTY).unwrap_or(true),
            self.config.get_bool(LOG_FILE_PROPERTY).unwrap_or(false),
            self.config
                .get_string(LOG_LEVEL_PROPERTY)
                .unwrap_or("info".to_string()),
        )
    }
}

impl GroupConfigAccessor for Configuration {
    fn current_group(&self) -> Option<String> {
        self.group()
    }
}
