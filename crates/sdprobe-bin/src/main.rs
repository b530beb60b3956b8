// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! sdprobe - SmartDisplay Modbus value probe.
//!
//! Opens the configured serial link, reads the widget value table from
//! slave `0x7B` in one bounded transaction, and prints a boxed report.
//! Run once, report, exit; failures surface verbatim so wiring and
//! configuration faults stay visible.

mod cli;
mod error;
mod logging;
mod report;

use tracing::info;

use sdprobe_modbus::session;

use crate::error::{report_error_and_exit, BinError, BinResult};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = std::env::args().skip(1);
    let config = match cli::parse_args(args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", cli::USAGE);
            report_error_and_exit(BinError::from(error));
        }
    };

    logging::init();

    if let Err(error) = run(config).await {
        report_error_and_exit(error);
    }
}

/// Prints the settings block, performs the single read, prints the values.
async fn run(config: sdprobe_modbus::SessionConfig) -> BinResult<()> {
    println!("{}", report::render_settings(&config));
    println!();

    info!(
        mode = %config.mode,
        port = %config.port,
        "Querying SmartDisplay value table"
    );

    let table = session::query_values(config).await?;

    println!("{}", report::render_values(&table));
    Ok(())
}
