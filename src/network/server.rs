//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads. Each accepted
//! connection carries exactly one request/response exchange.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel;

use crate::auth::AuthService;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AegisError, Result};
use crate::identity::{Identity, Role};
use crate::store::CredentialStore;

use super::connection::Connection;

/// Poll interval of the accept loop when idle
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle for stopping a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the accept loop to stop
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// TCP server for AegisRPC
pub struct Server {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Username and secret of the identity provisioned at startup
    pub const DEFAULT_ADMIN_USERNAME: &'static str = "admin";
    pub const DEFAULT_ADMIN_SECRET: &'static str = "admin";

    /// The identity provisioned at startup so the system can be bootstrapped
    /// before any other identity exists
    fn default_admin() -> Identity {
        Identity::new(
            Self::DEFAULT_ADMIN_USERNAME,
            vec!["admin@localhost".to_string()],
            "Admin",
            Role::Admin,
            Self::DEFAULT_ADMIN_SECRET,
        )
    }

    /// Bind a server to the configured listen address
    ///
    /// Builds the credential store, auth service, and dispatcher, provisions
    /// the default admin identity, and binds the TCP listener. The server
    /// does not accept connections until [`run`](Self::run) is called.
    pub fn bind(config: Config) -> Result<Self> {
        let store = Arc::new(CredentialStore::new());
        let auth = Arc::new(AuthService::new(Arc::clone(&store), config.debug_auth));

        store.add(Self::default_admin())?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            AegisError::Config(format!(
                "cannot bind to {}: {}",
                config.listen_addr, e
            ))
        })?;
        // Non-blocking accept so the loop can observe the shutdown flag
        listener.set_nonblocking(true)?;

        let dispatcher = Arc::new(Dispatcher::new(store, auth));

        Ok(Self {
            config,
            dispatcher,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Run the accept loop (blocking)
    ///
    /// Accepted sockets are handed to a fixed pool of worker threads through
    /// a bounded channel. Returns once the shutdown handle fires and all
    /// workers have drained.
    pub fn run(&mut self) -> Result<()> {
        let local_addr = self.local_addr()?;
        tracing::info!("Server listening on {}", local_addr);

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.pool_size * 2);

        let mut workers = Vec::with_capacity(self.config.pool_size);
        for worker_id in 0..self.config.pool_size {
            let rx = rx.clone();
            let dispatcher = Arc::clone(&self.dispatcher);
            let config = self.config.clone();

            workers.push(thread::spawn(move || {
                while let Ok(stream) = rx.recv() {
                    serve_connection(worker_id, stream, &dispatcher, &config);
                }
            }));
        }
        drop(rx);

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::debug!("Accepted connection from {}", peer);
                    if tx.send(stream).is_err() {
                        break;
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        // Closing the channel lets the workers drain their backlog and exit
        drop(tx);
        for worker in workers {
            let _ = worker.join();
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Serve one accepted socket: a single request/response exchange
fn serve_connection(worker_id: usize, stream: TcpStream, dispatcher: &Arc<Dispatcher>, config: &Config) {
    let mut connection = match Connection::new(stream, Arc::clone(dispatcher)) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(worker_id, "Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms) {
        tracing::warn!(worker_id, "Failed to configure timeouts: {}", e);
        return;
    }

    if let Err(e) = connection.handle() {
        tracing::warn!(
            worker_id,
            peer = connection.peer_addr(),
            "Connection failed: {}",
            e
        );
    }
}
