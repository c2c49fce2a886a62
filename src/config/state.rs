// Application state module
// Immutable state shared by every connection task

use super::types::{Config, ListenerConfig};
use crate::handler::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    /// Build the router for `listener` and pair it with the ambient settings
    pub fn new(config: Config, listener: &ListenerConfig) -> Self {
        Self {
            config,
            router: Router::from_listener_config(listener),
        }
    }
}
