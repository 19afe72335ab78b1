//! Adapter runtime integration.
//!
//! Bridges the synchronous terminal loop with the async TCP server: owns a
//! tokio runtime, runs the server on it, and lets the loop push observations
//! after local (keyboard) changes.

use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::core::SessionSnapshot;
use crate::server::{run_server, ServerConfig, ServerState, SharedSession};

/// Running adapter instance.
pub struct Adapter {
    rt: Runtime,
    state: Arc<ServerState>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `TWENTY48_AI_DISABLED` is set.
    pub fn start_from_env(session: SharedSession) -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("adapter disabled via TWENTY48_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env(), session).map(Some)
    }

    pub fn start(config: ServerConfig, session: SharedSession) -> anyhow::Result<Self> {
        // Fail on a bad address here rather than inside the spawned task.
        config.socket_addr()?;

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let state = Arc::new(ServerState::new(config, session));

        let server_state = Arc::clone(&state);
        rt.spawn(async move {
            if let Err(e) = run_server(server_state, None).await {
                error!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self { rt, state })
    }

    /// Push the current state to every handshaken client.
    pub fn publish(&self, snap: SessionSnapshot) {
        let state = Arc::clone(&self.state);
        self.rt.spawn(async move {
            state.broadcast_observation(&snap).await;
        });
    }

    pub fn client_count(&self) -> usize {
        self.state.client_count()
    }

    pub fn has_controller(&self) -> bool {
        self.state.has_controller()
    }
}
