// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus ASCII master over a serial port.
//!
//! `tokio-modbus` has no ASCII encoding, so this master carries the frame
//! codec itself and uses the serial stream directly.
//!
//! # Frame Format
//!
//! ```text
//! : AA FF D0 D1 .. LL CR LF
//! ```
//!
//! - `:` - start character
//! - `AA` - slave address, two hex characters
//! - `FF` - function code, two hex characters
//! - `D…` - payload bytes, two hex characters each
//! - `LL` - LRC over the raw (unencoded) bytes, two hex characters
//! - `CR LF` - frame terminator
//!
//! The LRC is the two's complement of the byte sum of address, function
//! and payload. A reply that fails the LRC, echoes an unexpected slave or
//! function code, or carries an inconsistent byte count is malformed; an
//! exception reply (function code with the high bit set) is malformed with
//! the slave's exception code in the reason.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::SerialStream;

use crate::config::SessionConfig;
use crate::error::{ProbeResult, QueryError, TransportError};

use super::{map_serial_open_error, ModbusMaster};

/// Frame start character.
const FRAME_START: u8 = b':';

/// Frame terminator.
const FRAME_END: &[u8] = b"\r\n";

/// Read-holding-registers function code.
const FC_READ_HOLDING_REGISTERS: u8 = 0x03;

/// Function-code bit flagging an exception reply.
const EXCEPTION_FLAG: u8 = 0x80;

/// Upper bound on a legal ASCII frame (per the Modbus line discipline).
const MAX_FRAME_LEN: usize = 513;

// =============================================================================
// AsciiMaster
// =============================================================================

/// Modbus ASCII master over `tokio-serial`.
///
/// Serial parameters match the device as tested: 8 data bits, no parity,
/// 1 stop bit in ASCII mode as well. The master holds the port exclusively
/// from `open` to `close` and performs no retry.
pub struct AsciiMaster {
    /// Session configuration.
    config: SessionConfig,
    /// Serial stream while the link is open.
    stream: Option<SerialStream>,
}

impl AsciiMaster {
    /// Creates an unopened ASCII master for the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Returns the serial port name.
    pub fn port(&self) -> &str {
        &self.config.port
    }
}

#[async_trait]
impl ModbusMaster for AsciiMaster {
    async fn open(&mut self) -> Result<(), TransportError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let builder = tokio_serial::new(&self.config.port, self.config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One);

        let stream = SerialStream::open(&builder)
            .map_err(|e| map_serial_open_error(&self.config.port, e))?;

        self.stream = Some(stream);

        tracing::info!(
            port = %self.config.port,
            baud_rate = self.config.baud_rate,
            slave = self.config.slave,
            "Opened Modbus ASCII link"
        );

        Ok(())
    }

    async fn read_registers(&mut self, address: u16, count: u16) -> ProbeResult<Vec<u16>> {
        let reply_timeout = self.config.timeout;
        let slave = self.config.slave;
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::NotOpen.into());
        };

        let frame = encode_frame(&read_request(slave, address, count));

        let raw = match timeout(reply_timeout, exchange(stream, &frame)).await {
            Err(_) => return Err(QueryError::timeout(reply_timeout).into()),
            Ok(Err(error)) if error.kind() == io::ErrorKind::TimedOut => {
                return Err(QueryError::timeout(reply_timeout).into());
            }
            Ok(Err(error)) => {
                return Err(QueryError::malformed(format!("serial transport failed: {error}")).into());
            }
            Ok(Ok(raw)) => raw,
        };

        let payload = decode_frame(&raw)?;
        let values = parse_read_reply(slave, &payload)?;

        tracing::debug!(address, count, "Read holding registers");
        Ok(values)
    }

    async fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!(port = %self.config.port, "Closed Modbus ASCII link");
        }
    }
}

// =============================================================================
// Wire Exchange
// =============================================================================

/// Writes one request frame and accumulates the reply up to CR LF.
async fn exchange(stream: &mut SerialStream, frame: &[u8]) -> io::Result<Vec<u8>> {
    stream.write_all(frame).await?;
    stream.flush().await?;

    let mut raw = Vec::with_capacity(64);
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial stream closed before the frame terminator",
            ));
        }
        raw.push(byte[0]);
        if raw.ends_with(FRAME_END) {
            return Ok(raw);
        }
        if raw.len() > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "reply exceeded the maximum ASCII frame length",
            ));
        }
    }
}

// =============================================================================
// Frame Codec
// =============================================================================

/// Builds the raw (unencoded) read-holding-registers request.
fn read_request(slave: u8, address: u16, count: u16) -> Vec<u8> {
    let mut payload = Vec::with_capacity(6);
    payload.push(slave);
    payload.push(FC_READ_HOLDING_REGISTERS);
    payload.extend_from_slice(&address.to_be_bytes());
    payload.extend_from_slice(&count.to_be_bytes());
    payload
}

/// LRC checksum: two's complement of the byte sum.
fn lrc(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte))
        .wrapping_neg()
}

/// Encodes raw payload bytes into a complete ASCII frame.
fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(3 + 2 * (payload.len() + 1) + FRAME_END.len());
    frame.push(FRAME_START);
    for byte in payload {
        frame.extend_from_slice(&hex_pair(*byte));
    }
    frame.extend_from_slice(&hex_pair(lrc(payload)));
    frame.extend_from_slice(FRAME_END);
    frame
}

/// Encodes one byte as two uppercase hex characters.
fn hex_pair(byte: u8) -> [u8; 2] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    [
        DIGITS[usize::from(byte >> 4)],
        DIGITS[usize::from(byte & 0x0F)],
    ]
}

/// Decodes one hex character.
fn hex_value(c: u8) -> Result<u8, QueryError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(QueryError::malformed(format!(
            "invalid hex character {:?} in reply",
            char::from(c)
        ))),
    }
}

/// Decodes and checks a complete frame, returning the raw payload bytes
/// (slave address through data, LRC stripped).
fn decode_frame(raw: &[u8]) -> Result<Vec<u8>, QueryError> {
    // Tolerate line noise ahead of the start character.
    let start = raw
        .iter()
        .position(|&b| b == FRAME_START)
        .ok_or_else(|| QueryError::malformed("reply has no frame start character"))?;

    let body = &raw[start + 1..];
    let body = body
        .strip_suffix(FRAME_END)
        .ok_or_else(|| QueryError::malformed("reply has no frame terminator"))?;

    if body.len() % 2 != 0 {
        return Err(QueryError::malformed("reply has an odd hex character count"));
    }

    let mut bytes = Vec::with_capacity(body.len() / 2);
    for pair in body.chunks_exact(2) {
        bytes.push((hex_value(pair[0])? << 4) | hex_value(pair[1])?);
    }

    // Slave address, function code and LRC at minimum.
    if bytes.len() < 3 {
        return Err(QueryError::malformed("reply is shorter than a minimal frame"));
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - 1);
    if lrc(payload) != checksum[0] {
        return Err(QueryError::malformed("LRC mismatch"));
    }

    Ok(payload.to_vec())
}

/// Interprets a decoded reply payload as a read-holding-registers response.
fn parse_read_reply(slave: u8, payload: &[u8]) -> Result<Vec<u16>, QueryError> {
    let reply_slave = payload[0];
    if reply_slave != slave {
        return Err(QueryError::malformed(format!(
            "reply from unexpected slave 0x{reply_slave:02X}"
        )));
    }

    let function = payload[1];
    if function == FC_READ_HOLDING_REGISTERS | EXCEPTION_FLAG {
        let code = payload.get(2).copied().unwrap_or(0xFF);
        return Err(QueryError::exception(code));
    }
    if function != FC_READ_HOLDING_REGISTERS {
        return Err(QueryError::malformed(format!(
            "reply echoes unexpected function code 0x{function:02X}"
        )));
    }

    let Some((&byte_count, data)) = payload[2..].split_first() else {
        return Err(QueryError::malformed("reply is missing the byte count"));
    };
    if usize::from(byte_count) != data.len() {
        return Err(QueryError::malformed(format!(
            "reply byte count {byte_count} does not match {} data bytes",
            data.len()
        )));
    }
    if data.len() % 2 != 0 {
        return Err(QueryError::malformed("reply carries a torn register"));
    }

    Ok(data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
