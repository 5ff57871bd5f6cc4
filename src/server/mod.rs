// Server module entry point
// Binding, the accept loop, connection handling and shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop instead
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::error::ServerError;
use crate::logger;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, Shutdown};

/// Bind the configured address
pub fn bind(state: &AppState) -> Result<TcpListener, ServerError> {
    let addr = state.config.get_socket_addr()?;
    create_listener(addr)
}

/// Serve on an already bound listener until `shutdown` fires
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Shutdown>,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    logger::log_server_start(&addr, &state);

    // Concurrent connections are spawned with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(start_server_loop(listener, state, shutdown))
        .await;

    logger::log_shutdown();
    Ok(())
}

/// Bind the configured port and serve requests until `shutdown` fires
///
/// A port that is already in use surfaces as [`ServerError::Bind`].
pub async fn start(state: Arc<AppState>, shutdown: Arc<Shutdown>) -> Result<(), ServerError> {
    let listener = bind(&state)?;
    serve(listener, state, shutdown).await
}
