// Configuration module entry point
// Builds the server configuration from profile defaults and environment overrides

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, Profile, RoutesConfig, ServerConfig,
};

/// Prefix of environment overrides, e.g. `DEVSERVE_SERVER__PORT=8081`
pub const ENV_PREFIX: &str = "DEVSERVE";

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn builder_for(
    profile: Profile,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("profile", profile.as_str())?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", i64::from(profile.default_port()))?
        .set_default("server.root", ".")?
        .set_default("server.sequential", true)?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "common")?
        .set_default("http.server_name", concat!("devserve/", env!("CARGO_PKG_VERSION")))?
        .set_default("http.enable_cors", profile.enables_cors())?
        .set_default("routes.rewrite_root", profile.rewrites_root())?
        .set_default("routes.index_files", vec!["index.html", "index.htm"])?
        .set_default("routes.list_directories", true)?
        .set_default("performance.connection_timeout", 30)
}

impl Config {
    /// Load configuration: profile defaults, then `DEVSERVE_*` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let env_only = config::Config::builder().add_source(env_source()).build()?;
        let profile = match env_only.get_string("profile") {
            Ok(name) => name.parse::<Profile>().map_err(config::ConfigError::Message)?,
            Err(config::ConfigError::NotFound(_)) => Profile::default(),
            Err(e) => return Err(e),
        };

        builder_for(profile)?
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Defaults of a profile alone, without consulting the environment
    pub fn with_profile(profile: Profile) -> Result<Self, config::ConfigError> {
        builder_for(profile)?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::InvalidAddress { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cors_profile_defaults() {
        let cfg = Config::with_profile(Profile::Cors).unwrap();
        assert_eq!(cfg.profile, Profile::Cors);
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.root, Path::new("."));
        assert!(cfg.server.sequential);
        assert!(cfg.http.enable_cors);
        assert!(!cfg.routes.rewrite_root);
        assert_eq!(cfg.routes.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_plain_profile_defaults() {
        let cfg = Config::with_profile(Profile::Plain).unwrap();
        assert_eq!(cfg.profile, Profile::Plain);
        assert_eq!(cfg.server.port, 5500);
        assert!(!cfg.http.enable_cors);
        assert!(cfg.routes.rewrite_root);
    }

    // The only test touching DEVSERVE_* variables; everything else uses with_profile
    #[test]
    fn test_load_applies_environment_overrides() {
        let vars = [
            ("DEVSERVE_PROFILE", "plain"),
            ("DEVSERVE_SERVER__PORT", "8081"),
            ("DEVSERVE_HTTP__ENABLE_CORS", "true"),
            ("DEVSERVE_SERVER__ROOT", "./dist"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let loaded = Config::load();

        std::env::set_var("DEVSERVE_PROFILE", "fancy");
        let unknown = Config::load();

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let cfg = loaded.unwrap();
        assert_eq!(cfg.profile, Profile::Plain);
        assert_eq!(cfg.server.port, 8081);
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.server.root, Path::new("./dist"));
        // Untouched keys keep the plain profile defaults
        assert!(cfg.routes.rewrite_root);
        assert_eq!(cfg.server.host, "127.0.0.1");

        let err = unknown.unwrap_err();
        assert!(err.to_string().contains("unknown profile 'fancy'"));
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::with_profile(Profile::Cors).unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );

        cfg.server.host = "not an address".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
