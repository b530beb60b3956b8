// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Value query session.
//!
//! A session performs exactly one read transaction against the configured
//! slave and returns a decoded, length-checked value table. Its life is a
//! linear state machine with no way back:
//!
//! ```text
//! Unopened -> Opened -> Transacted -> Closed
//! ```
//!
//! The transport is acquired for the duration of that single transaction
//! and released on every exit path, success or failure. A session is
//! consumed by execution; each run constructs a new one.

use tracing::{debug, info};

use crate::address::{value_table_range, VALUE_TABLE_BASE, VALUE_TABLE_WIDTH};
use crate::config::SessionConfig;
use crate::error::{ProbeResult, QueryError};
use crate::master::{self, ModbusMaster};

// =============================================================================
// SessionState
// =============================================================================

/// Lifecycle state of a value query session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No transport acquired yet.
    #[default]
    Unopened,
    /// Transport acquired, transaction not yet issued.
    Opened,
    /// The single read transaction has been issued.
    Transacted,
    /// Transport released; terminal.
    Closed,
}

// =============================================================================
// ValueTable
// =============================================================================

/// Decoded widget value table.
///
/// The values correspond 1:1 and in order to ascending widget index,
/// starting at the widget mapped to the table's base register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTable {
    base: u16,
    values: Vec<u16>,
}

impl ValueTable {
    /// Creates a table from already-decoded values.
    ///
    /// Sessions produce tables via [`ValueQuerySession::execute`]; this
    /// constructor exists for presentation code and tests.
    pub fn new(base: u16, values: Vec<u16>) -> Self {
        Self { base, values }
    }

    /// Base register address the table was read from.
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of widget values in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` for a zero-width table.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The decoded values in ascending widget-index order.
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    /// Value of the widget at `index`, if the table covers it.
    pub fn get(&self, index: u8) -> Option<u16> {
        self.values.get(usize::from(index)).copied()
    }

    /// Iterates `(widget index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u16)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (index as u8, *value))
    }
}

// =============================================================================
// ValueQuerySession
// =============================================================================

/// One synchronous read of the widget value table.
pub struct ValueQuerySession<M: ModbusMaster> {
    master: M,
    config: SessionConfig,
    state: SessionState,
}

impl<M: ModbusMaster> ValueQuerySession<M> {
    /// Creates an unopened session over the given master.
    pub fn new(master: M, config: SessionConfig) -> Self {
        Self {
            master,
            config,
            state: SessionState::Unopened,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs the session against the device's value table.
    pub async fn execute(self) -> ProbeResult<ValueTable> {
        self.execute_range(value_table_range(VALUE_TABLE_BASE, VALUE_TABLE_WIDTH))
            .await
    }

    /// Runs the session against an explicit `(base, count)` register range.
    ///
    /// The transport is released before the outcome is inspected, so the
    /// close step runs on every path. The decoded value count must equal
    /// `count` exactly; a partial table is never returned.
    pub async fn execute_range(mut self, range: (u16, u16)) -> ProbeResult<ValueTable> {
        let (base, count) = range;

        let outcome = match self.master.open().await {
            Ok(()) => {
                self.state = SessionState::Opened;
                debug!(mode = %self.config.mode, port = %self.config.port, "Session opened");

                let read = self.master.read_registers(base, count).await;
                self.state = SessionState::Transacted;
                read
            }
            Err(error) => Err(error.into()),
        };

        self.master.close().await;
        self.state = SessionState::Closed;
        debug!("Session closed");

        let values = outcome?;
        if values.len() != usize::from(count) {
            return Err(QueryError::length_mismatch(count, values.len()).into());
        }

        info!(base, count, "Value table read complete");
        Ok(ValueTable::new(base, values))
    }
}

/// Queries the device's value table with the production master for the
/// configured transport encoding.
pub async fn query_values(config: SessionConfig) -> ProbeResult<ValueTable> {
    let master = master::for_mode(&config);
    ValueQuerySession::new(master, config).execute().await
}

// =============================================================================
// Tests
// =============================================================================
