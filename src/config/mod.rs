// Configuration module entry point
// Fixed listener layout plus the ambient settings (logging, runtime, connections)

mod state;
mod types;

// Re-export public types
pub use state::AppState;
pub use types::{Config, ListenerConfig, LogLevel, STARTUP_MESSAGE};

/// Optional settings file in the working directory (extension inferred)
const CONFIG_FILE: &str = "coi-serve";

/// Environment variable prefix, e.g. `COI_SERVE_LOGGING__ACCESS_LOG=true`
const ENV_PREFIX: &str = "COI_SERVE";

impl Config {
    /// Load settings from `coi-serve.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layers(config_path, None)
    }

    /// Defaults, then the file, then `COI_SERVE_*` variables taken from `env`
    /// (the process environment when `None`)
    fn load_layers(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        settings.try_deserialize()
    }
}
