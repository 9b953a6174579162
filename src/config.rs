//! Configuration for AegisRPC
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for an AegisRPC server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub pool_size: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Authentication Configuration
    // -------------------------------------------------------------------------
    /// Log authentication attempts and outcomes (secrets are never logged)
    pub debug_auth: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            pool_size: 8,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            debug_auth: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn pool_size(mut self, count: usize) -> Self {
        self.config.pool_size = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable authentication debug logging
    pub fn debug_auth(mut self, enabled: bool) -> Self {
        self.config.debug_auth = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
