// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! Exercises the value query session against the mock master:
//!
//! - `test_session_*`: transaction outcomes and resource discipline
//! - `test_end_to_end_*`: the reference deployment constants

use std::sync::atomic::Ordering;
use std::time::Duration;

use sdprobe_modbus::error::{ProbeError, QueryError};
use sdprobe_modbus::{
    value_table_range, SessionConfig, TransportMode, ValueQuerySession, SLAVE_ADDRESS,
    VALUE_TABLE_BASE, VALUE_TABLE_WIDTH,
};

mod common;

use common::{MockMaster, ReadOutcome};

fn reference_config() -> SessionConfig {
    SessionConfig::builder()
        .mode(TransportMode::Rtu)
        .port("/dev/ttyUSB0")
        .baud_rate(115_200)
        .timeout(Duration::from_millis(300))
        .build()
}

// =============================================================================
// Transaction Outcomes
// =============================================================================

#[tokio::test]
async fn test_session_round_trip_preserves_order() {
    let reply = vec![11, 22, 33, 44, 55, 66, 77, 88, 99, 110];
    let master = MockMaster::replying(reply.clone());
    let counters = master.counters();

    let table = ValueQuerySession::new(master, reference_config())
        .execute()
        .await
        .unwrap();

    assert_eq!(table.values(), reply.as_slice());
    assert_eq!(table.base(), VALUE_TABLE_BASE);

    // Exactly one transaction against the mapped range.
    assert_eq!(counters.open.load(Ordering::SeqCst), 1);
    assert_eq!(counters.read.load(Ordering::SeqCst), 1);
    assert_eq!(counters.close.load(Ordering::SeqCst), 1);
    assert_eq!(
        *counters.last_read.lock().unwrap(),
        Some((VALUE_TABLE_BASE, VALUE_TABLE_WIDTH))
    );
}

#[tokio::test]
async fn test_session_rejects_short_reply() {
    let master = MockMaster::replying(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    let counters = master.counters();

    let err = ValueQuerySession::new(master, reference_config())
        .execute()
        .await
        .unwrap_err();

    match err {
        ProbeError::Query(QueryError::LengthMismatch { requested, decoded }) => {
            assert_eq!(requested, 10);
            assert_eq!(decoded, 9);
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }

    // The partial reply still releases the transport.
    assert_eq!(counters.close.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_reports_timeout_once_and_releases() {
    let timeout = Duration::from_millis(300);
    let master = MockMaster::with_outcome(ReadOutcome::Timeout(timeout));
    let counters = master.counters();

    let err = ValueQuerySession::new(master, reference_config())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProbeError::Query(QueryError::Timeout { timeout: t }) if t == timeout
    ));

    // No retry: a single read was issued, and the release step still ran.
    assert_eq!(counters.read.load(Ordering::SeqCst), 1);
    assert_eq!(counters.close.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_surfaces_malformed_replies() {
    let master = MockMaster::with_outcome(ReadOutcome::Malformed("LRC mismatch".to_string()));
    let counters = master.counters();

    let err = ValueQuerySession::new(master, reference_config())
        .execute()
        .await
        .unwrap_err();

    match err {
        ProbeError::Query(query) => assert!(query.is_malformed()),
        other => panic!("expected query error, got {other:?}"),
    }
    assert_eq!(counters.close.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_open_failure_skips_transaction() {
    let master = MockMaster::replying(vec![0; 10]).failing_open();
    let counters = master.counters();

    let err = ValueQuerySession::new(master, reference_config())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Transport(_)));

    // No transaction was issued, and release is still safe to run.
    assert_eq!(counters.read.load(Ordering::SeqCst), 0);
    assert_eq!(counters.close.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_empty_range_is_legal() {
    let master = MockMaster::replying(Vec::new());

    let table = ValueQuerySession::new(master, reference_config())
        .execute_range(value_table_range(VALUE_TABLE_BASE, 0))
        .await
        .unwrap();

    assert!(table.is_empty());
}

// =============================================================================
// Reference Deployment
// =============================================================================

#[tokio::test]
async fn test_end_to_end_reference_read() {
    let config = reference_config();
    assert_eq!(config.slave, SLAVE_ADDRESS);

    let master = MockMaster::replying((1..=10).collect());

    let table = ValueQuerySession::new(master, config)
        .execute()
        .await
        .unwrap();

    // Widgets 0..9 carry the values in ascending index order.
    let pairs: Vec<(u8, u16)> = table.iter().collect();
    let expected: Vec<(u8, u16)> = (0u8..10).map(|i| (i, u16::from(i) + 1)).collect();
    assert_eq!(pairs, expected);
    assert_eq!(table.get(0), Some(1));
    assert_eq!(table.get(9), Some(10));
}
