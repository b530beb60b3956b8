// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session configuration types.
//!
//! A [`SessionConfig`] is built once per run, from CLI input or defaults,
//! and is never mutated after the session starts. The slave address is a
//! field rather than a literal so the same session logic can drive a
//! differently-addressed device.

use std::fmt;
use std::time::Duration;

use crate::address::{DEFAULT_BAUD_RATE, DEFAULT_PORT, MIN_TIMEOUT, SLAVE_ADDRESS};

// =============================================================================
// TransportMode
// =============================================================================

/// Modbus serial transport encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    /// Binary RTU framing with CRC (default).
    #[default]
    Rtu,
    /// ASCII framing with LRC.
    Ascii,
}

impl TransportMode {
    /// Returns the canonical name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rtu => "RTU",
            Self::Ascii => "ASCII",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SessionConfig
// =============================================================================

/// Immutable configuration of one value query session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Transport encoding.
    pub mode: TransportMode,

    /// Serial port name (e.g. "/dev/ttyUSB0" or "COM22").
    pub port: String,

    /// Baud rate.
    pub baud_rate: u32,

    /// Modbus slave address.
    pub slave: u8,

    /// Reply timeout for the read transaction.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Creates a new builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Rtu,
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            slave: SLAVE_ADDRESS,
            timeout: MIN_TIMEOUT,
        }
    }
}

// =============================================================================
// SessionConfigBuilder
// =============================================================================

/// Builder for [`SessionConfig`].
///
/// Every field has a device-appropriate default, so `build` is infallible.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    mode: Option<TransportMode>,
    port: Option<String>,
    baud_rate: Option<u32>,
    slave: Option<u8>,
    timeout: Option<Duration>,
}

impl SessionConfigBuilder {
    /// Sets the transport encoding.
    pub fn mode(mut self, mode: TransportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the serial port name.
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Sets the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = Some(baud_rate);
        self
    }

    /// Sets the slave address.
    pub fn slave(mut self, slave: u8) -> Self {
        self.slave = Some(slave);
        self
    }

    /// Sets the reply timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration, falling back to defaults for unset fields.
    pub fn build(self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            mode: self.mode.unwrap_or(defaults.mode),
            port: self.port.unwrap_or(defaults.port),
            baud_rate: self.baud_rate.unwrap_or(defaults.baud_rate),
            slave: self.slave.unwrap_or(defaults.slave),
            timeout: self.timeout.unwrap_or(defaults.timeout),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
