// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console report rendering.
//!
//! The report is a boxed block: a settings section showing the effective
//! configuration, then the ten decoded widget values in ascending index
//! order. Field identity and ordering are the contract; the frame itself
//! is presentation. Rendering is pure so tests can assert on the output.

use std::fmt::Display;

use sdprobe_modbus::{SessionConfig, ValueTable, VERSION};

/// Total width of a report line.
const MAX_WIDTH: usize = 85;

/// Column where entry values start.
const DESCR_WIDTH: usize = 30;

// =============================================================================
// Line Primitives
// =============================================================================

/// Full-width rule of `#` characters.
fn rule() -> String {
    "#".repeat(MAX_WIDTH)
}

/// Pads a line body to the box width and closes it.
fn boxed(body: String) -> String {
    format!("{body:<width$}##", width = MAX_WIDTH - 2)
}

/// A description-only line.
fn banner(text: &str) -> String {
    boxed(format!("## {text}"))
}

/// A `description: value` line with the value column aligned.
fn entry(description: &str, value: impl Display) -> String {
    let label = format!("## {description}:");
    boxed(format!("{label:<width$}{value}", width = DESCR_WIDTH))
}

// =============================================================================
// Report Sections
// =============================================================================

/// Renders the settings block shown before the transaction.
pub fn render_settings(config: &SessionConfig) -> String {
    let mut lines = vec![
        rule(),
        banner("SmartDisplay value probe"),
        entry("Probe version", VERSION),
        banner(" "),
        entry("Platform", std::env::consts::OS),
        entry("Modbus mode", config.mode),
        entry("Baudrate (-b)", config.baud_rate),
        entry("Port name (-D)", &config.port),
        entry("Slave address", config.slave),
        entry("Timeout", format!("{} s", config.timeout.as_secs_f32())),
    ];
    lines.push(rule());
    lines.join("\n")
}

/// Renders the decoded widget values in ascending index order.
pub fn render_values(table: &ValueTable) -> String {
    let mut lines = vec![rule(), banner("Current values"), banner(" ")];
    for (widget, value) in table.iter() {
        lines.push(entry(&format!("Widget {widget} Value"), value));
    }
    lines.push(rule());
    lines.join("\n")
}

// =============================================================================
// Tests
// =============================================================================
