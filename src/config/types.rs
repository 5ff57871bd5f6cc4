// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub profile: Profile,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub routes: RoutesConfig,
    pub performance: PerformanceConfig,
}

/// Preset of defaults
///
/// | Profile | Port | `/` rewrite | CORS |
/// |---------|------|-------------|------|
/// | `cors`  | 3000 | off         | on   |
/// | `plain` | 5500 | on          | off  |
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Cors,
    Plain,
}

impl Profile {
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Cors => 3000,
            Self::Plain => 5500,
        }
    }

    pub const fn enables_cors(self) -> bool {
        matches!(self, Self::Cors)
    }

    pub const fn rewrites_root(self) -> bool {
        matches!(self, Self::Plain)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cors => "cors",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cors" => Ok(Self::Cors),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown profile '{other}' (expected 'cors' or 'plain')")),
        }
    }
}

/// Listener and scheduling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory whose tree is served
    pub root: PathBuf,
    /// Serve one connection at a time (no keep-alive) when true
    pub sequential: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (common, combined, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Answer OPTIONS preflights and append CORS headers to every response
    pub enable_cors: bool,
}

/// Path resolution configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Rewrite `/` to `/index.html` before resolving
    pub rewrite_root: bool,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Generate an HTML listing for directories without an index file
    pub list_directories: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Upper bound for serving one connection, in seconds
    pub connection_timeout: u64,
}
