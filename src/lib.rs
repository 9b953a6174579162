//! # AegisRPC
//!
//! A minimal authenticated RPC server with:
//! - Token-based authentication against an in-memory credential store
//! - A single authorization + routing decision point (the Dispatcher)
//! - One request/response exchange per TCP connection
//! - Length-prefixed, checksummed binary wire protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one request per connection)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Dispatcher                                │
//! │        (token gate + capability registry)                    │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!    ┌──────────────┐              ┌─────────────────┐
//!    │ AuthService  │─────────────▶│ CredentialStore │
//!    │  (tokens)    │   lookups    │    (RwLock)     │
//!    └──────────────┘              └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod identity;
pub mod store;
pub mod auth;
pub mod protocol;
pub mod dispatcher;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AegisError, Result};
pub use config::Config;
pub use identity::{Identity, Role};
pub use store::CredentialStore;
pub use auth::{AuthService, Token};
pub use dispatcher::Dispatcher;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AegisRPC
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
