// Connection handling module
// Serves a single accepted TCP connection over HTTP/1.1

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve an accepted connection.
///
/// Sequential servers finish the connection before returning, so the next
/// `accept` only happens once this client is done. Otherwise the connection
/// is spawned on the current `LocalSet`.
pub async fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    if state.config.server.sequential {
        serve_connection(stream, peer_addr, Arc::clone(state)).await;
    } else {
        tokio::task::spawn_local(serve_connection(stream, peer_addr, Arc::clone(state)));
    }
}

/// Handle a single connection.
///
/// Keep-alive is only enabled for concurrent servers; a sequential server
/// closes after each response so a lingering browser connection cannot
/// block every other client.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let io = TokioIo::new(stream);
    let timeout_duration = Duration::from_secs(state.config.performance.connection_timeout);

    let mut builder = http1::Builder::new();
    builder.keep_alive(!state.config.server.sequential);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );

    match tokio::time::timeout(timeout_duration, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => {
            logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            ));
        }
    }
}
