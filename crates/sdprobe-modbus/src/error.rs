// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the SmartDisplay probe.
//!
//! The taxonomy follows the probe's three failure surfaces:
//!
//! ```text
//! ProbeError
//! ├── Address    - invalid widget index handed to the register model
//! ├── Transport  - the serial link could not be acquired
//! └── Query      - the one read transaction did not complete
//! ```
//!
//! Nothing in this tool retries: the probe exists to expose wiring and
//! configuration faults, so every error aborts the run and is reported
//! verbatim to the operator. The variants carry enough context (port,
//! timeout, decoded length) for the report to be actionable.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

// =============================================================================
// ProbeError - Main Error Type
// =============================================================================

/// The main error type for probe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Register address model rejected an input.
    #[error("{0}")]
    Address(#[from] AddressError),

    /// The serial transport could not be acquired.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The read transaction failed.
    #[error("{0}")]
    Query(#[from] QueryError),
}

impl ProbeError {
    /// Creates an address error.
    #[inline]
    pub fn address(error: AddressError) -> Self {
        Self::Address(error)
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(error: TransportError) -> Self {
        Self::Transport(error)
    }

    /// Creates a query error.
    #[inline]
    pub fn query(error: QueryError) -> Self {
        Self::Query(error)
    }
}

// =============================================================================
// AddressError
// =============================================================================

/// Errors produced by the register address model.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// The widget index falls outside both addressable blocks.
    #[error("widget index {index} is outside the addressable range 0..=63")]
    InvalidWidgetIndex {
        /// The rejected index.
        index: u8,
    },
}

// =============================================================================
// TransportError
// =============================================================================

/// Errors raised while acquiring or holding the serial transport.
///
/// All of these are fatal to the run; the link is never reopened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The serial device path does not exist.
    #[error("serial port {port} not found")]
    PortNotFound {
        /// Port name from the session configuration.
        port: String,
    },

    /// The serial device exists but access was denied.
    #[error("access to serial port {port} denied")]
    AccessDenied {
        /// Port name from the session configuration.
        port: String,
    },

    /// The transport rejected the configured parameters.
    #[error("serial port {port} rejected the configuration: {message}")]
    ConfigurationRejected {
        /// Port name from the session configuration.
        port: String,
        /// Reason reported by the transport.
        message: String,
    },

    /// The port could not be opened for another reason.
    #[error("serial port {port} could not be opened: {message}")]
    OpenFailed {
        /// Port name from the session configuration.
        port: String,
        /// Reason reported by the transport.
        message: String,
    },

    /// A read was attempted without an acquired transport.
    #[error("serial transport is not open")]
    NotOpen,
}

impl TransportError {
    /// Creates a port-not-found error.
    pub fn not_found(port: impl Into<String>) -> Self {
        Self::PortNotFound { port: port.into() }
    }

    /// Creates an access-denied error.
    pub fn access_denied(port: impl Into<String>) -> Self {
        Self::AccessDenied { port: port.into() }
    }

    /// Creates a configuration-rejected error.
    pub fn rejected(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigurationRejected {
            port: port.into(),
            message: message.into(),
        }
    }

    /// Creates a generic open-failure error.
    pub fn open_failed(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// QueryError
// =============================================================================

/// Errors raised by the single read transaction.
///
/// Timeout and malformed replies are distinguished here for diagnostics,
/// but both surface to the operator as one failed query with a reason.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No reply arrived within the configured timeout.
    #[error("no reply from slave within {timeout:?}")]
    Timeout {
        /// The configured reply timeout.
        timeout: Duration,
    },

    /// A reply arrived but could not be decoded.
    #[error("malformed reply: {reason}")]
    Malformed {
        /// What made the reply undecodable.
        reason: String,
    },

    /// The decoded value count differs from the requested register count.
    #[error("value table length mismatch: requested {requested} registers, decoded {decoded}")]
    LengthMismatch {
        /// Registers requested from the slave.
        requested: u16,
        /// Values actually decoded from the reply.
        decoded: usize,
    },
}

impl QueryError {
    /// Creates a reply-timeout error.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    /// Creates a malformed-reply error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Creates a length-mismatch error.
    pub fn length_mismatch(requested: u16, decoded: usize) -> Self {
        Self::LengthMismatch { requested, decoded }
    }

    /// Creates a malformed-reply error from a slave exception code.
    pub fn exception(code: u8) -> Self {
        Self::Malformed {
            reason: format!("slave exception 0x{:02X} ({})", code, exception_name(code)),
        }
    }

    /// Returns `true` for replies that arrived but could not be used.
    ///
    /// Length mismatches are classified as malformed: a partial table must
    /// never be reported as a result.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::LengthMismatch { .. })
    }

    /// Short reason tag used by the operator-facing report.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Malformed { .. } | Self::LengthMismatch { .. } => "malformed response",
        }
    }
}

/// Human-readable name of a Modbus exception code.
fn exception_name(code: u8) -> &'static str {
    match code {
        0x01 => "illegal function",
        0x02 => "illegal data address",
        0x03 => "illegal data value",
        0x04 => "server device failure",
        0x05 => "acknowledge",
        0x06 => "server device busy",
        0x08 => "memory parity error",
        0x0A => "gateway path unavailable",
        0x0B => "gateway target device failed to respond",
        _ => "unknown exception",
    }
}

// =============================================================================
// Tests
// =============================================================================
