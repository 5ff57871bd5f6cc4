// Application state module
// Holds the loaded configuration and the resolved root directory

use std::io;
use std::path::PathBuf;

use super::types::Config;
use crate::error::ServerError;

/// Application state shared with every request
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.server.root`; every served path must start with it
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the root directory and build the shared state
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let configured = config.server.root.clone();
        let root = configured.canonicalize().map_err(|source| ServerError::Root {
            path: configured.clone(),
            source,
        })?;

        if !root.is_dir() {
            return Err(ServerError::Root {
                path: configured,
                source: io::Error::other("not a directory"),
            });
        }

        Ok(Self { config, root })
    }
}
