// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus RTU master over a serial port.
//!
//! RTU framing, CRC and wire addressing are delegated to `tokio-modbus`
//! with `tokio-serial` underneath; this module owns the serial parameters,
//! the reply timeout and the mapping of transport faults onto the probe's
//! error taxonomy.

use async_trait::async_trait;
use tokio::time::timeout;
use tokio_modbus::client::{Context as ModbusContext, Reader};
use tokio_modbus::prelude::*;
use tokio_modbus::{Error as TokioModbusError, ExceptionCode};
use tokio_serial::SerialPortBuilderExt;

use crate::config::SessionConfig;
use crate::error::{ProbeError, ProbeResult, QueryError, TransportError};

use super::{map_serial_open_error, ModbusMaster};

// =============================================================================
// RtuMaster
// =============================================================================

/// Modbus RTU master using `tokio-modbus` over `tokio-serial`.
///
/// The device speaks 8 data bits, no parity, 1 stop bit at the configured
/// baud rate. The master holds the port exclusively from `open` to `close`
/// and performs no reconnection or retry.
pub struct RtuMaster {
    /// Session configuration.
    config: SessionConfig,
    /// Attached tokio-modbus context while the link is open.
    context: Option<ModbusContext>,
}

impl RtuMaster {
    /// Creates an unopened RTU master for the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            context: None,
        }
    }

    /// Returns the serial port name.
    pub fn port(&self) -> &str {
        &self.config.port
    }

    /// Maps a tokio-modbus read failure to a probe error.
    fn map_read_error(config: &SessionConfig, error: TokioModbusError) -> ProbeError {
        match error {
            TokioModbusError::Transport(io_error) => {
                use std::io::ErrorKind;
                match io_error.kind() {
                    ErrorKind::TimedOut => QueryError::timeout(config.timeout).into(),
                    ErrorKind::NotFound => TransportError::not_found(&config.port).into(),
                    ErrorKind::PermissionDenied => {
                        TransportError::access_denied(&config.port).into()
                    }
                    _ => QueryError::malformed(format!("serial transport failed: {io_error}"))
                        .into(),
                }
            }
            TokioModbusError::Protocol(protocol_error) => {
                QueryError::malformed(format!("protocol violation: {protocol_error}")).into()
            }
        }
    }

    /// Converts a slave exception code to its numeric value.
    fn exception_code_to_u8(code: &ExceptionCode) -> u8 {
        match code {
            ExceptionCode::IllegalFunction => 0x01,
            ExceptionCode::IllegalDataAddress => 0x02,
            ExceptionCode::IllegalDataValue => 0x03,
            ExceptionCode::ServerDeviceFailure => 0x04,
            ExceptionCode::Acknowledge => 0x05,
            ExceptionCode::ServerDeviceBusy => 0x06,
            ExceptionCode::MemoryParityError => 0x08,
            ExceptionCode::GatewayPathUnavailable => 0x0A,
            ExceptionCode::GatewayTargetDevice => 0x0B,
            _ => 0xFF,
        }
    }
}

#[async_trait]
impl ModbusMaster for RtuMaster {
    async fn open(&mut self) -> Result<(), TransportError> {
        if self.context.is_some() {
            return Ok(());
        }

        let builder = tokio_serial::new(&self.config.port, self.config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One);

        let serial = builder
            .open_native_async()
            .map_err(|e| map_serial_open_error(&self.config.port, e))?;

        let slave = Slave(self.config.slave);
        self.context = Some(rtu::attach_slave(serial, slave));

        tracing::info!(
            port = %self.config.port,
            baud_rate = self.config.baud_rate,
            slave = self.config.slave,
            "Opened Modbus RTU link"
        );

        Ok(())
    }

    async fn read_registers(&mut self, address: u16, count: u16) -> ProbeResult<Vec<u16>> {
        let reply_timeout = self.config.timeout;
        let Some(ctx) = self.context.as_mut() else {
            return Err(TransportError::NotOpen.into());
        };

        let reply = timeout(reply_timeout, ctx.read_holding_registers(address, count)).await;

        let values = match reply {
            Err(_) => return Err(QueryError::timeout(reply_timeout).into()),
            Ok(Err(error)) => return Err(Self::map_read_error(&self.config, error)),
            Ok(Ok(Err(exception))) => {
                let code = Self::exception_code_to_u8(&exception);
                return Err(QueryError::exception(code).into());
            }
            Ok(Ok(Ok(values))) => values,
        };

        tracing::debug!(address, count, "Read holding registers");
        Ok(values)
    }

    async fn close(&mut self) {
        if let Some(mut ctx) = self.context.take() {
            if let Err(e) = ctx.disconnect().await {
                tracing::warn!(error = %e, "Error releasing serial transport");
            }
            tracing::debug!(port = %self.config.port, "Closed Modbus RTU link");
        }
    }
}
