//! The append-only execution recorder.

use super::record::{EventType, ExecutionRecord, RecordId};
use crate::domain::order_hierarchy::aggregate::{Order, OrderHierarchy};
use crate::domain::order_hierarchy::events::OrderEvent;
use crate::domain::order_hierarchy::value_objects::OrderLevel;
use crate::domain::shared::OrderId;

/// Append-only store of every state mutation in a run.
///
/// Record ids are assigned in strictly increasing order starting at
/// one, and nothing is ever rewritten or removed. Freezing the
/// recorder hands out the finished log for reporting and export.
#[derive(Debug, Default)]
pub struct ExecutionRecorder {
    records: Vec<ExecutionRecord>,
    next_id: u64,
}

impl ExecutionRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Snapshots an order against an event it just emitted and appends
    /// the record.
    pub fn record(&mut self, order: &Order, event: &OrderEvent) -> RecordId {
        let record_id = RecordId::new(self.next_id);
        self.next_id += 1;
        self.records
            .push(ExecutionRecord::snapshot(record_id, order, event));
        record_id
    }

    /// Drains an order's pending events and appends one record per
    /// event, snapshotting the order as it now stands.
    ///
    /// # Panics
    ///
    /// Panics if no order with this id exists; callers record against
    /// orders they just mutated.
    pub fn record_pending(&mut self, hierarchy: &mut OrderHierarchy, order_id: &OrderId) {
        let events = match hierarchy.get_mut(order_id) {
            Some(order) => order.drain_events(),
            None => panic!("recording events for unknown order {order_id}"),
        };
        if events.is_empty() {
            return;
        }
        let Some(order) = hierarchy.get(order_id) else {
            panic!("recording events for unknown order {order_id}");
        };
        for event in &events {
            self.record(order, event);
        }
    }

    /// All records so far, in append order.
    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    /// Records for one hierarchy level, in append order.
    #[must_use]
    pub fn records_for_level(&self, level: OrderLevel) -> Vec<&ExecutionRecord> {
        self.records
            .iter()
            .filter(|record| record.level == level)
            .collect()
    }

    /// Records for one order, in append order.
    #[must_use]
    pub fn records_for_order(&self, order_id: &OrderId) -> Vec<&ExecutionRecord> {
        self.records
            .iter()
            .filter(|record| &record.order_id == order_id)
            .collect()
    }

    /// Records of one event type, in append order.
    #[must_use]
    pub fn records_of_type(&self, event_type: EventType) -> Vec<&ExecutionRecord> {
        self.records
            .iter()
            .filter(|record| record.event_type == event_type)
            .collect()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True before the first record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the recorder and returns the immutable log.
    #[must_use]
    pub fn freeze(self) -> Vec<ExecutionRecord> {
        self.records
    }
}
