// Server loop module
// Accepts connections until the shutdown token fires

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::Shutdown;
use crate::config::AppState;
use crate::logger;

/// Accept loop: listening -> serving one connection -> listening, until shutdown.
///
/// Shutdown is only observed while waiting in `accept`, never in the middle of
/// a sequential connection. The listener is dropped before returning.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Shutdown>,
) {
    loop {
        tokio::select! {
            biased;

            () = shutdown.wait() => break,

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state).await;
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
        }
    }

    drop(listener);
}
