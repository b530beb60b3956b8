// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the probe binary.

use thiserror::Error;

use sdprobe_modbus::ProbeError;

use crate::cli::CliError;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that terminate a probe run.
#[derive(Debug, Error)]
pub enum BinError {
    /// Bad command-line configuration; nothing was opened.
    #[error("configuration error: {0}")]
    Configuration(#[from] CliError),

    /// The probe itself failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl BinError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Probe(ProbeError::Transport(_)) => 2,
            Self::Probe(ProbeError::Query(_)) => 3,
            Self::Probe(ProbeError::Address(_)) => 4,
        }
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error to stderr with its cause chain.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {cause}");
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use sdprobe_modbus::{QueryError, TransportError};

    #[test]
    fn test_exit_codes_by_class() {
        let config = BinError::from(CliError::MissingBaudRate);
        assert_eq!(config.exit_code(), 1);

        let transport = BinError::from(ProbeError::from(TransportError::not_found("/dev/x")));
        assert_eq!(transport.exit_code(), 2);

        let query =
            BinError::from(ProbeError::from(QueryError::timeout(Duration::from_millis(300))));
        assert_eq!(query.exit_code(), 3);
    }

    #[test]
    fn test_configuration_error_display() {
        let err = BinError::from(CliError::MissingPort);
        assert_eq!(
            err.to_string(),
            "configuration error: wrong usage of the -D option: use -D/dev/ttyUSB0 or -DCOM4"
        );
    }
}
