//! Error types for AegisRPC
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using AegisError
pub type Result<T> = std::result::Result<T, AegisError>;

/// Unified error type for AegisRPC operations
#[derive(Debug, Error)]
pub enum AegisError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Credential Store Errors
    // -------------------------------------------------------------------------
    #[error("Identity already exists: {0}")]
    DuplicateIdentity(String),

    #[error("Identity not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Authentication / Authorization Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Authentication token is required")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Insufficient privileges")]
    InsufficientPrivileges,

    // -------------------------------------------------------------------------
    // Dispatch Errors
    // -------------------------------------------------------------------------
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // Error reported by the server inside a response envelope
    #[error("Remote error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
