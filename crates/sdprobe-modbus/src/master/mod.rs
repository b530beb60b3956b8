// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus master collaborators.
//!
//! The session core talks to the wire only through the [`ModbusMaster`]
//! capability trait, so it can be exercised against an in-memory fake
//! without serial hardware. Two production implementations are provided:
//!
//! - [`RtuMaster`]: binary RTU framing via `tokio-modbus`
//! - [`AsciiMaster`]: ASCII framing with LRC, encoded locally
//!
//! Both honor the same contract: given the configured slave address and
//! timeout, a read either returns the decoded register values in
//! ascending-address order or fails with a typed error. Framing, checksum
//! and addressing-on-the-wire concerns stay below this trait.

use async_trait::async_trait;

use crate::config::{SessionConfig, TransportMode};
use crate::error::{ProbeResult, TransportError};

mod ascii;
mod rtu;

pub use ascii::AsciiMaster;
pub use rtu::RtuMaster;

// =============================================================================
// ModbusMaster Trait
// =============================================================================

/// Capability interface of an external Modbus master.
#[async_trait]
pub trait ModbusMaster: Send {
    /// Acquires the serial transport described by the session configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the device path is missing, access
    /// is denied, or the transport rejects the configured parameters.
    async fn open(&mut self) -> Result<(), TransportError>;

    /// Reads `count` consecutive 16-bit holding registers from `address`.
    ///
    /// On success the reply holds exactly `count` values in
    /// ascending-address order; anything else is an error. The wait for the
    /// reply is bounded by the configured timeout.
    async fn read_registers(&mut self, address: u16, count: u16) -> ProbeResult<Vec<u16>>;

    /// Releases the transport.
    ///
    /// Must be safe to call on every exit path, including after a failed
    /// open, and must not fail: release problems are logged, not raised.
    async fn close(&mut self);
}

#[async_trait]
impl<M: ModbusMaster + ?Sized> ModbusMaster for Box<M> {
    async fn open(&mut self) -> Result<(), TransportError> {
        (**self).open().await
    }

    async fn read_registers(&mut self, address: u16, count: u16) -> ProbeResult<Vec<u16>> {
        (**self).read_registers(address, count).await
    }

    async fn close(&mut self) {
        (**self).close().await
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Returns the production master for the configured transport encoding.
pub fn for_mode(config: &SessionConfig) -> Box<dyn ModbusMaster> {
    match config.mode {
        TransportMode::Rtu => Box::new(RtuMaster::new(config.clone())),
        TransportMode::Ascii => Box::new(AsciiMaster::new(config.clone())),
    }
}

/// Maps a serial open failure to a transport error.
pub(super) fn map_serial_open_error(port: &str, error: tokio_serial::Error) -> TransportError {
    match error.kind {
        tokio_serial::ErrorKind::NoDevice => TransportError::not_found(port),
        tokio_serial::ErrorKind::InvalidInput => TransportError::rejected(port, error.to_string()),
        tokio_serial::ErrorKind::Io(io_kind) => match io_kind {
            std::io::ErrorKind::NotFound => TransportError::not_found(port),
            std::io::ErrorKind::PermissionDenied => TransportError::access_denied(port),
            _ => TransportError::open_failed(port, error.to_string()),
        },
        _ => TransportError::open_failed(port, error.to_string()),
    }
}
