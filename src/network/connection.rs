//! Connection Handler
//!
//! Handles an individual client connection: exactly one request in, exactly
//! one response out, then the connection closes.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::error::{AegisError, Result};
use crate::protocol::{read_request, write_response, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the dispatcher
    dispatcher: Arc<Dispatcher>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O over split read/write handles.
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Sockets accepted from a non-blocking listener inherit its mode on
        // some platforms; this handler relies on blocking reads with timeouts
        stream.set_nonblocking(false)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking)
    ///
    /// Reads one request, dispatches it, sends the response, and returns.
    /// A client that connects and disconnects without sending a frame is
    /// not an error. Malformed frames are answered with an error response
    /// when the stream is still writable; they never take the server down.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let request = match read_request(&mut self.reader) {
            Ok(request) => request,
            Err(AegisError::Io(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!("Client {} disconnected before sending a request", self.peer_addr);
                return Ok(());
            }
            Err(AegisError::Io(ref e)) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                tracing::debug!("Connection reset by client {}", self.peer_addr);
                return Ok(());
            }
            Err(AegisError::Io(ref e)) if e.kind() == std::io::ErrorKind::ConnectionAborted => {
                tracing::debug!("Connection aborted by client {}", self.peer_addr);
                return Ok(());
            }
            Err(AegisError::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                tracing::debug!("Read timeout for client {}", self.peer_addr);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                // Answer malformed frames with an error response if possible
                let _ = self.send_response(Response::error(e.to_string()));
                return Err(e);
            }
        };

        tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);

        let response = self.dispatcher.dispatch(&request);

        if let Err(e) = self.send_response(response) {
            // If the client disconnected before we could send the response,
            // log and exit gracefully rather than treating it as a server
            // error.
            if let AegisError::Io(ref io_err) = e {
                match io_err.kind() {
                    std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::BrokenPipe => {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                    _ => {}
                }
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }

        tracing::debug!("Closing connection to {}", self.peer_addr);
        Ok(())
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
