use crate::core::AppConfig;
use crate::relay::{Relay, RelayConfig};

pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            relay: Relay::new(RelayConfig::from(config)),
        }
    }
}
