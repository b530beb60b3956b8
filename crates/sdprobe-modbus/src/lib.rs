// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sdprobe-modbus
//!
//! SmartDisplay register map and Modbus value query session.
//!
//! The SmartDisplay is an RS485 field device addressed as Modbus slave
//! `0x7B`. Each display widget occupies a block of 16-bit registers, and
//! the current value of every widget is additionally mapped into one
//! contiguous register table. This crate knows that register map and
//! performs the single diagnostic read the probe is built around:
//!
//! - **Register address model**: pure mapping from widget index and field
//!   offset to absolute register addresses ([`address`])
//! - **Value query session**: one bounded-timeout read of the value table
//!   over an RTU or ASCII serial link ([`session`])
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ValueQuerySession              │
//! │   (open -> one read -> unconditional close) │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │                ModbusMaster                 │
//! │         (capability trait, mockable)        │
//! └─────────────────────────────────────────────┘
//!            │                       │
//!            ▼                       ▼
//! ┌─────────────────────┐ ┌─────────────────────┐
//! │      RtuMaster      │ │     AsciiMaster     │
//! │    (tokio-modbus)   │ │  (local LRC codec)  │
//! └─────────────────────┘ └─────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sdprobe_modbus::{session, SessionConfig, TransportMode};
//!
//! let config = SessionConfig::builder()
//!     .mode(TransportMode::Rtu)
//!     .port("/dev/ttyUSB0")
//!     .build();
//!
//! let table = session::query_values(config).await?;
//! for (widget, value) in table.iter() {
//!     println!("widget {widget}: {value}");
//! }
//! ```
//!
//! The probe never writes to the device, never retries, and issues exactly
//! one transaction per session.

pub mod address;
pub mod config;
pub mod error;
pub mod master;
pub mod session;

// =============================================================================
// Re-exports - Address Model
// =============================================================================

pub use address::{
    field_address,
    value_table_range,
    widget_base_address,
    WidgetField,
    DEFAULT_BAUD_RATE,
    DEFAULT_PORT,
    MIN_TIMEOUT,
    SLAVE_ADDRESS,
    VALUE_TABLE_BASE,
    VALUE_TABLE_WIDTH,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{SessionConfig, SessionConfigBuilder, TransportMode};

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{AddressError, ProbeError, ProbeResult, QueryError, TransportError};

// =============================================================================
// Re-exports - Master & Session
// =============================================================================

pub use master::{AsciiMaster, ModbusMaster, RtuMaster};
pub use session::{SessionState, ValueQuerySession, ValueTable};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
