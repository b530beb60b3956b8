// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing.
//!
//! The probe keeps the device tool's historical flag grammar: single-dash
//! switches with the value attached directly, no space in between.
//!
//! ```text
//! sdprobe [-rtu] [-ascii] [-b115200] [-D/dev/ttyUSB0]
//! ```
//!
//! - `-rtu` / `-ascii` select the transport encoding (RTU is the default)
//! - `-b<rate>` sets the baud rate
//! - `-D<port>` sets the serial port name
//!
//! Switches are prefix-matched and later switches win; unrecognized
//! arguments are ignored. A `-b` or `-D` with nothing attached is a fatal
//! configuration error, caught before any transport is opened.

use thiserror::Error;

use sdprobe_modbus::{SessionConfig, TransportMode};

/// Usage text printed on configuration errors.
pub const USAGE: &str = "\
Usage: sdprobe [-rtu] [-ascii] [-b<rate>] [-D<port>]

  -rtu      use Modbus RTU framing (default)
  -ascii    use Modbus ASCII framing
  -b<rate>  baud rate, attached to the switch (e.g. -b115200)
  -D<port>  serial port name, attached to the switch
            (e.g. -D/dev/ttyUSB0 or -DCOM4)";

// =============================================================================
// CliError
// =============================================================================

/// Fatal configuration errors from the command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    /// `-b` was given with no attached value.
    #[error("wrong usage of the -b option: use -b9600")]
    MissingBaudRate,

    /// `-b` was given with a non-numeric value.
    #[error("invalid baud rate {0:?}: use -b9600")]
    InvalidBaudRate(String),

    /// `-D` was given with no attached value.
    #[error("wrong usage of the -D option: use -D/dev/ttyUSB0 or -DCOM4")]
    MissingPort,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses command-line arguments (without the program name) into a session
/// configuration.
pub fn parse_args<I>(args: I) -> Result<SessionConfig, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut builder = SessionConfig::builder();

    for arg in args {
        if arg.starts_with("-ascii") {
            builder = builder.mode(TransportMode::Ascii);
        } else if arg.starts_with("-rtu") {
            builder = builder.mode(TransportMode::Rtu);
        } else if let Some(rest) = arg.strip_prefix("-b") {
            if rest.is_empty() {
                return Err(CliError::MissingBaudRate);
            }
            let baud_rate = rest
                .parse::<u32>()
                .map_err(|_| CliError::InvalidBaudRate(rest.to_string()))?;
            builder = builder.baud_rate(baud_rate);
        } else if let Some(rest) = arg.strip_prefix("-D") {
            if rest.is_empty() {
                return Err(CliError::MissingPort);
            }
            builder = builder.port(rest);
        }
        // Anything else is ignored, like the field tool always did.
    }

    Ok(builder.build())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn parse(args: &[&str]) -> Result<SessionConfig, CliError> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.mode, TransportMode::Rtu);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.slave, 0x7B);
        assert_eq!(config.timeout, Duration::from_millis(300));
    }

    #[test]
    fn test_full_flag_set() {
        let config = parse(&["-b9600", "-D/dev/ttyUSB1", "-ascii"]).unwrap();
        assert_eq!(config.mode, TransportMode::Ascii);
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.port, "/dev/ttyUSB1");
    }

    #[test]
    fn test_dangling_baud_switch_is_fatal() {
        assert_eq!(parse(&["-b"]), Err(CliError::MissingBaudRate));
    }

    #[test]
    fn test_dangling_port_switch_is_fatal() {
        assert_eq!(parse(&["-D"]), Err(CliError::MissingPort));
    }

    #[test]
    fn test_non_numeric_baud_is_fatal() {
        assert_eq!(
            parse(&["-b96k"]),
            Err(CliError::InvalidBaudRate("96k".to_string()))
        );
    }

    #[test]
    fn test_later_mode_switch_wins() {
        let config = parse(&["-ascii", "-rtu"]).unwrap();
        assert_eq!(config.mode, TransportMode::Rtu);
    }

    #[test]
    fn test_windows_style_port() {
        let config = parse(&["-DCOM4"]).unwrap();
        assert_eq!(config.port, "COM4");
    }

    #[test]
    fn test_unrecognized_arguments_are_ignored() {
        let config = parse(&["--verbose", "extra", "-b19200"]).unwrap();
        assert_eq!(config.baud_rate, 19_200);
        assert_eq!(config.mode, TransportMode::Rtu);
    }
}
