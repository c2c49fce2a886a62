// Server loop module
// Accepts connections forever and hands each one to its own task

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

const MIN_ACCEPT_BACKOFF: Duration = Duration::from_millis(5);
const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Accept loop. Only returns if the runtime shuts down underneath it.
///
/// Accept errors (e.g. `EMFILE`) are logged and retried after a back-off
/// that doubles from 5ms up to 1s and resets on the next success.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    let mut backoff: Option<Duration> = None;

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                backoff = None;
                handle_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(e) => {
                let delay = backoff.map_or(MIN_ACCEPT_BACKOFF, |d| (d * 2).min(MAX_ACCEPT_BACKOFF));
                logger::log_error(&format!(
                    "Failed to accept connection: {e}; retrying in {}ms",
                    delay.as_millis()
                ));
                backoff = Some(delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}
