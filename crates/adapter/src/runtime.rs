//! Adapter runtime integration.
//!
//! Bridges the sync front end with the async server: owns a tokio runtime,
//! binds the listener up front and serves in the background.

use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::Context;
use tokio::runtime::Runtime;
use tracing::{error, info};

use tui_cluster_engine::CoordinatorHandle;

use crate::server::{router, serve, ServerConfig};

/// Running network surface.
pub struct Adapter {
    rt: Runtime,
    addr: SocketAddr,
}

impl Adapter {
    /// Bind `config.addr` and start serving on a background runtime.
    ///
    /// Binding happens before this returns, so a busy port fails here.
    pub fn start(config: ServerConfig, handle: CoordinatorHandle) -> anyhow::Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;

        let std_listener = StdTcpListener::bind(config.addr)
            .with_context(|| format!("failed to bind {}", config.addr))?;
        std_listener.set_nonblocking(true)?;
        let addr = std_listener.local_addr()?;

        let listener = {
            let _guard = rt.enter();
            tokio::net::TcpListener::from_std(std_listener)?
        };
        let app = router(&config, handle);
        rt.spawn(async move {
            if let Err(e) = serve(listener, app).await {
                error!(error = %e, "server stopped");
            }
        });

        info!(addr = %addr, "server listening");
        Ok(Self { rt, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block the calling thread until ctrl-c.
    pub fn wait_for_shutdown(&self) -> anyhow::Result<()> {
        self.rt
            .block_on(tokio::signal::ctrl_c())
            .context("failed to listen for ctrl-c")?;
        info!("shutdown requested");
        Ok(())
    }
}
