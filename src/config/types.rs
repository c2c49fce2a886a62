// Configuration types module
// Defines the fixed listener layout and the ambient settings structures

use serde::Deserialize;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};
use std::path::PathBuf;

/// Port the gateway listens on
pub const LISTEN_PORT: u16 = 8000;

/// Address the gateway binds: all interfaces, IPv6 and IPv4 on one socket
pub const LISTEN_ADDR: SocketAddr =
    SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, LISTEN_PORT, 0, 0));

/// Root for every request outside the dependency prefix
pub const SERVING_ROOT: &str = ".";

/// Sibling `node_modules` one level above the serving root
pub const DEPENDENCY_ROOT: &str = "../node_modules";

/// URL prefix mapped onto the dependency root
pub const DEPENDENCY_PREFIX: &str = "/node_modules/";

/// Line printed on stdout once the listener is bound
pub const STARTUP_MESSAGE: &str = "serving at localhost:8000";

/// Listener layout: where to bind and which directories back which prefixes.
///
/// Built once at startup and handed to the router and the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub addr: SocketAddr,
    pub serving_root: PathBuf,
    pub dependency_root: PathBuf,
    pub dependency_prefix: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            addr: LISTEN_ADDR,
            serving_root: PathBuf::from(SERVING_ROOT),
            dependency_root: PathBuf::from(DEPENDENCY_ROOT),
            dependency_prefix: DEPENDENCY_PREFIX.to_string(),
        }
    }
}

/// Ambient settings loaded from defaults, `coi-serve.toml` and the environment
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Log verbosity, ordered from quietest to noisiest
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stderr if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            access_log: false,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Tokio worker threads, CPU count when unset
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
    /// Upper bound on a connection's lifetime in seconds, 0 disables it
    #[serde(default)]
    pub connection_timeout: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            workers: None,
            keep_alive: default_keep_alive(),
            connection_timeout: 0,
        }
    }
}

const fn default_keep_alive() -> bool {
    true
}
