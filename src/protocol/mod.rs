//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Frame Format (V1 - Length-prefixed Binary)
//!
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC (4)  │      bincode payload        │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! The payload is a bincode-serialized `Request` (client to server) or
//! `Response` (server to client). The CRC32 covers the payload only; a
//! mismatch means the frame was corrupted in transit and is rejected before
//! deserialization is attempted.
//!
//! ### Exchange
//! A client sends exactly one Request frame per connection and receives
//! exactly one Response frame before the connection closes.

mod request;
mod response;
mod codec;

pub use request::{Request, Value, CAPABILITY_AUTHENTICATE, TOKEN_METADATA_KEY};
pub use response::Response;
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
