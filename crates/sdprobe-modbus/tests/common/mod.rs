// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock Modbus master for exercising the session without serial hardware.
//!
//! The mock records every interaction through shared counters, so a test
//! can hand the master to a session (which consumes it) and still verify
//! afterwards that the open, read and release steps ran.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sdprobe_modbus::error::{ProbeResult, QueryError, TransportError};
use sdprobe_modbus::master::ModbusMaster;

/// What the mock does when the session issues its read.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// Return these values verbatim.
    Reply(Vec<u16>),
    /// Fail as if no reply arrived within the timeout.
    Timeout(Duration),
    /// Fail as if the reply could not be decoded.
    Malformed(String),
}

/// Interaction counters shared between a test and the consumed mock.
#[derive(Debug, Default)]
pub struct Counters {
    /// Successful or failed open attempts.
    pub open: AtomicU64,
    /// Read transactions issued.
    pub read: AtomicU64,
    /// Release invocations.
    pub close: AtomicU64,
    /// Arguments of the most recent read.
    pub last_read: Mutex<Option<(u16, u16)>>,
}

/// Configurable in-memory Modbus master.
pub struct MockMaster {
    outcome: ReadOutcome,
    fail_open: bool,
    port: String,
    counters: Arc<Counters>,
}

impl MockMaster {
    /// Creates a mock that replies with the given values.
    pub fn replying(values: Vec<u16>) -> Self {
        Self::with_outcome(ReadOutcome::Reply(values))
    }

    /// Creates a mock with an explicit read outcome.
    pub fn with_outcome(outcome: ReadOutcome) -> Self {
        Self {
            outcome,
            fail_open: false,
            port: "/dev/mock".to_string(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Makes `open` fail with a port-not-found error.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Returns a handle to the interaction counters.
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl ModbusMaster for MockMaster {
    async fn open(&mut self) -> Result<(), TransportError> {
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(TransportError::not_found(&self.port));
        }
        Ok(())
    }

    async fn read_registers(&mut self, address: u16, count: u16) -> ProbeResult<Vec<u16>> {
        self.counters.read.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_read.lock().unwrap() = Some((address, count));

        match &self.outcome {
            ReadOutcome::Reply(values) => Ok(values.clone()),
            ReadOutcome::Timeout(timeout) => Err(QueryError::timeout(*timeout).into()),
            ReadOutcome::Malformed(reason) => Err(QueryError::malformed(reason.clone()).into()),
        }
    }

    async fn close(&mut self) {
        self.counters.close.fetch_add(1, Ordering::SeqCst);
    }
}
