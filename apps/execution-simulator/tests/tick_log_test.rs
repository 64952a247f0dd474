//! Tick Database Contract Tests
//!
//! The recorder is the audit trail of a run. These tests pin its
//! contract over full sessions: monotonic record ids, ordered
//! timestamps, per-snapshot conservation, monotone client progress,
//! terminal snapshots that are never contradicted later, and a log
//! that replays the final hierarchy state.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use execution_simulator::config::VenueConfig;
use execution_simulator::{
    EventType, ExecutionSimulator, OrderId, OrderLevel, OrderStatus, Quantity, SimulatorConfig,
};

/// Runs the default configuration to completion and hands back the
/// simulator for log inspection.
fn run_default() -> ExecutionSimulator {
    let mut simulator =
        ExecutionSimulator::new(&SimulatorConfig::default()).expect("default config is valid");
    simulator.run();
    simulator
}

#[test]
fn record_ids_increase_strictly_and_timestamps_never_regress() {
    let simulator = run_default();
    let records = simulator.records();
    assert!(!records.is_empty());

    for pair in records.windows(2) {
        assert!(
            pair[0].record_id < pair[1].record_id,
            "record ids must be strictly increasing"
        );
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "record timestamps regressed at {}",
            pair[1].record_id
        );
    }
}

#[test]
fn every_snapshot_conserves_quantity() {
    let simulator = run_default();
    for record in simulator.records() {
        assert_eq!(
            record.filled_quantity + record.remaining_quantity,
            record.quantity,
            "snapshot {} of {} broke conservation",
            record.record_id,
            record.order_id
        );
    }
}

#[test]
fn client_progress_is_monotone() {
    let simulator = run_default();
    let client_filled: Vec<Quantity> = simulator
        .records()
        .iter()
        .filter(|record| record.level == OrderLevel::Client)
        .map(|record| record.filled_quantity)
        .collect();
    assert!(!client_filled.is_empty());
    assert!(
        client_filled.windows(2).all(|pair| pair[0] <= pair[1]),
        "client filled quantity decreased"
    );

    let hierarchy = simulator.hierarchy();
    let client = hierarchy.get(hierarchy.root_id()).unwrap();
    assert_eq!(*client_filled.last().unwrap(), client.filled_quantity());
}

#[test]
fn terminal_snapshots_are_never_contradicted() {
    let simulator = run_default();
    let mut sealed: HashMap<&OrderId, (OrderStatus, Quantity)> = HashMap::new();

    for record in simulator.records() {
        if let Some((status, filled)) = sealed.get(&record.order_id) {
            assert_eq!(
                record.status, *status,
                "{} changed state after going terminal",
                record.order_id
            );
            assert_eq!(
                record.filled_quantity, *filled,
                "{} changed fills after going terminal",
                record.order_id
            );
        }
        if record.status.is_terminal() {
            sealed
                .entry(&record.order_id)
                .or_insert((record.status, record.filled_quantity));
        }
    }
}

#[test]
fn the_log_replays_the_final_hierarchy() {
    let simulator = run_default();
    let hierarchy = simulator.hierarchy();

    for order_id in hierarchy.depth_first_ids() {
        let order = hierarchy.get(&order_id).unwrap();
        let last = simulator
            .records()
            .iter()
            .filter(|record| record.order_id == order_id)
            .next_back()
            .unwrap_or_else(|| panic!("{order_id} never reached the log"));
        assert_eq!(last.status, order.status());
        assert_eq!(last.filled_quantity, order.filled_quantity());
        assert_eq!(last.remaining_quantity, order.remaining_quantity());
        assert_eq!(last.average_price, order.average_price());
    }
}

#[test]
fn route_snapshots_carry_their_pass_number() {
    // A venue that always fades forces a deterministic retry pass in
    // every period.
    let mut config = SimulatorConfig::default();
    config.session.participation_curve = vec![1.0 / 3.0; 3];
    config.model.partial_probability = 0.0;
    config.model.reject_probability = 0.0;
    config.venues = vec![
        VenueConfig {
            name: "ALPHA".to_string(),
            fade_probability: 1.0,
            base_liquidity: 18_000,
        },
        VenueConfig {
            name: "BETA".to_string(),
            fade_probability: 0.0,
            base_liquidity: 18_000,
        },
    ];
    let mut simulator = ExecutionSimulator::new(&config).expect("config is valid");
    simulator.run();

    let mut saw_retry = false;
    for record in simulator.records() {
        match record.level {
            OrderLevel::Route => {
                let attempt = record.attempt.expect("route snapshots carry their pass");
                assert!(attempt >= 1);
                if record.event_type == EventType::New && attempt > 1 {
                    saw_retry = true;
                }
            }
            _ => assert_eq!(record.attempt, None),
        }
    }
    assert!(saw_retry, "the fading venue never forced a retry pass");
}
