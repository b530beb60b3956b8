// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.
//!
//! Diagnostics go to stderr through the `tracing` ecosystem so the boxed
//! report on stdout stays machine-readable. The filter comes from
//! `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging subsystem.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stderr());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(is_terminal)
                .with_writer(std::io::stderr),
        )
        .init();
}
