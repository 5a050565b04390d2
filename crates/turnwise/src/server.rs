//! Listener lifecycle: bind, accept, spawn, shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use turnwise_registry::{Reaper, ReaperHandle, RegistryConfig, SessionRegistry};

use crate::error::ServerError;
use crate::handler::handle_connection;
use crate::service::GameService;

// ---------------------------------------------------------------------------
// ServerBuilder
// ---------------------------------------------------------------------------

/// Configures and binds a [`Server`].
///
/// ```no_run
/// # use turnwise::ServerBuilder;
/// # async fn run() -> Result<(), turnwise::ServerError> {
/// let server = ServerBuilder::new().bind("0.0.0.0:8080").build().await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    registry_config: RegistryConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            registry_config: RegistryConfig::default(),
        }
    }

    /// Address to listen on. Defaults to `127.0.0.1:8080`; use port 0
    /// to let the OS pick one.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Staleness and sweep timing for the background reaper.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Binds the listener and starts the reaper. The server does not
    /// accept connections until [`Server::run`] is called.
    pub async fn build(self) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let registry = Arc::new(SessionRegistry::new());
        let service = Arc::new(GameService::new(Arc::clone(&registry)));
        let reaper = Reaper::new(registry, self.registry_config).spawn();
        let (shutdown, _) = watch::channel(false);

        Ok(Server {
            listener,
            service,
            reaper,
            shutdown,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound WebSocket game server.
pub struct Server {
    listener: TcpListener,
    service: Arc<GameService>,
    reaper: ReaperHandle,
    shutdown: watch::Sender<bool>,
}

impl Server {
    /// The address the listener actually bound, useful after binding
    /// port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// A handle that can stop [`Server::run`] from another task.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Accepts connections until a [`ServerHandle`] signals shutdown,
    /// then stops the reaper. Each connection runs in its own task.
    pub async fn run(self) -> Result<(), ServerError> {
        let Server {
            listener,
            service,
            reaper,
            shutdown,
        } = self;
        let mut shutdown_rx = shutdown.subscribe();
        tracing::info!("server running");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let service = Arc::clone(&service);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, service).await {
                                tracing::debug!(%peer, error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "accept failed"),
                },
                _ = shutdown_rx.changed() => break,
            }
        }

        reaper.shutdown().await;
        tracing::info!("server stopped");
        Ok(())
    }
}

/// Stops a running [`Server`]. Cheap to clone and safe to signal more
/// than once.
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: watch::Sender<bool>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        // Err here means run() already returned, which is fine.
        let _ = self.shutdown.send(true);
    }
}
