//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Frame Format
//!
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC (4)  │      bincode payload        │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! Len and CRC are big-endian u32. The CRC32 covers the payload only.

use std::io::{Read, Write};

use bytes::{Buf, BufMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AegisError, Result};

use super::{Request, Response};

/// Header size: 4 bytes payload length + 4 bytes CRC32
pub const HEADER_SIZE: usize = 8;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Encode a serializable payload into a framed message
fn encode_frame<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    let body = bincode::serialize(payload)
        .map_err(|e| AegisError::Serialization(format!("encode failed: {}", e)))?;

    if body.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(AegisError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            body.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let crc = crc32fast::hash(&body);

    let mut message = Vec::with_capacity(HEADER_SIZE + body.len());
    message.put_u32(body.len() as u32);
    message.put_u32(crc);
    message.extend_from_slice(&body);

    Ok(message)
}

/// Decode a framed message into a deserializable payload
fn decode_frame<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < HEADER_SIZE {
        return Err(AegisError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let payload_len = header.get_u32() as usize;
    let expected_crc = header.get_u32();

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(AegisError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(AegisError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let body = &bytes[HEADER_SIZE..total_len];
    let actual_crc = crc32fast::hash(body);
    if actual_crc != expected_crc {
        return Err(AegisError::Protocol(format!(
            "Checksum mismatch: expected 0x{:08x}, got 0x{:08x}",
            expected_crc, actual_crc
        )));
    }

    bincode::deserialize(body)
        .map_err(|e| AegisError::Serialization(format!("decode failed: {}", e)))
}

/// Encode a request to bytes
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    encode_frame(request)
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    decode_frame(bytes)
}

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    encode_frame(response)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    decode_frame(bytes)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame from a stream
///
/// Blocks until the frame is fully received or an error occurs.
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(AegisError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload_len);
    frame.extend_from_slice(&header);
    frame.resize(HEADER_SIZE + payload_len, 0);
    if payload_len > 0 {
        reader.read_exact(&mut frame[HEADER_SIZE..])?;
    }

    Ok(frame)
}

/// Read a complete request from a stream
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let frame = read_frame(reader)?;
    decode_request(&frame)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader)?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
