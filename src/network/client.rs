//! Blocking Client
//!
//! One-shot client for the AegisRPC protocol: each call opens a connection,
//! sends a single request, reads the single response, and closes.

use std::net::TcpStream;
use std::time::Duration;

use crate::auth::Token;
use crate::error::{AegisError, Result};
use crate::identity::Identity;
use crate::protocol::{
    read_response, write_request, Request, Response, Value, CAPABILITY_AUTHENTICATE,
};

/// Blocking one-shot client
pub struct Client {
    server_addr: String,
    timeout: Duration,
}

impl Client {
    /// Create a client for the given server address
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Override the socket read/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request and wait for its response
    pub fn call(&self, request: &Request) -> Result<Response> {
        let stream = TcpStream::connect(&self.server_addr)
            .map_err(|e| AegisError::Network(format!("connect to {}: {}", self.server_addr, e)))?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let mut writer = stream.try_clone()?;
        write_request(&mut writer, request)?;

        let mut reader = stream;
        read_response(&mut reader)
    }

    /// Send one request and unwrap the response envelope
    ///
    /// A server-reported failure surfaces as `AegisError::Remote`.
    fn invoke(&self, request: &Request) -> Result<Value> {
        let response = self.call(request)?;
        match (response.result, response.error) {
            (Some(value), None) => Ok(value),
            (None, Some(message)) => Err(AegisError::Remote(message)),
            // Unreachable for responses built by the server's constructors
            _ => Err(AegisError::Protocol(
                "response must carry exactly one of result or error".to_string(),
            )),
        }
    }

    // =========================================================================
    // Capability wrappers
    // =========================================================================

    /// Authenticate and obtain a token
    pub fn authenticate(&self, username: &str, secret: &str) -> Result<Token> {
        let request = Request::new(
            CAPABILITY_AUTHENTICATE,
            vec![
                Value::Str(username.to_string()),
                Value::Str(secret.to_string()),
            ],
        );
        match self.invoke(&request)? {
            Value::Token(token) => Ok(token),
            other => Err(AegisError::Protocol(format!(
                "authenticate returned unexpected value: {:?}",
                other
            ))),
        }
    }

    /// Register a new identity (admin only)
    pub fn add_user(&self, identity: Identity, token: Token) -> Result<()> {
        let request = Request::with_token("add_user", vec![Value::Identity(identity)], token);
        self.invoke(&request)?;
        Ok(())
    }

    /// Fetch an identity by username (admin only)
    pub fn get_user(&self, username: &str, token: Token) -> Result<Identity> {
        let request =
            Request::with_token("get_user", vec![Value::Str(username.to_string())], token);
        match self.invoke(&request)? {
            Value::Identity(identity) => Ok(identity),
            other => Err(AegisError::Protocol(format!(
                "get_user returned unexpected value: {:?}",
                other
            ))),
        }
    }

    /// Replace an existing identity (admin only)
    pub fn update_user(&self, identity: Identity, token: Token) -> Result<()> {
        let request = Request::with_token("update_user", vec![Value::Identity(identity)], token);
        self.invoke(&request)?;
        Ok(())
    }

    /// Remove an identity, returning it (admin only)
    pub fn remove_user(&self, username: &str, token: Token) -> Result<Identity> {
        let request =
            Request::with_token("remove_user", vec![Value::Str(username.to_string())], token);
        match self.invoke(&request)? {
            Value::Identity(identity) => Ok(identity),
            other => Err(AegisError::Protocol(format!(
                "remove_user returned unexpected value: {:?}",
                other
            ))),
        }
    }
}
