//! The period loop driving one execution session.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::clock::SimClock;
use super::ids::IdAllocator;
use super::report::SimulationReport;
use crate::config::{ConfigError, SimulatorConfig};
use crate::domain::order_hierarchy::aggregate::{Order, OrderHierarchy};
use crate::domain::order_hierarchy::value_objects::Urgency;
use crate::domain::shared::{ClientOrderId, OrderId, Quantity, Symbol};
use crate::recording::{ExecutionRecord, ExecutionRecorder};
use crate::routing::Router;
use crate::scheduling::{ResidualPolicy, SessionSchedule};

/// One configured session, from client order to final report.
///
/// Construction validates the configuration and stages the client
/// order with its algo parent, both accepted and working before the
/// first period. [`run`](Self::run) then walks the schedule period by
/// period, sizing a slice from the participation deficit and handing
/// it to the router. All randomness flows from a single seeded
/// generator, so equal configurations produce equal runs.
#[derive(Debug)]
pub struct ExecutionSimulator {
    schedule: SessionSchedule,
    residual_policy: ResidualPolicy,
    router: Router,
    hierarchy: OrderHierarchy,
    algo_id: OrderId,
    ids: IdAllocator,
    clock: SimClock,
    recorder: ExecutionRecorder,
    rng: StdRng,
}

impl ExecutionSimulator {
    /// Builds a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration fails
    /// validation.
    ///
    /// # Panics
    ///
    /// Panics if the freshly staged hierarchy rejects its own setup,
    /// which a validated configuration never causes.
    pub fn new(config: &SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session_start = config.session_start()?;
        let curve = config.participation_curve()?;
        let total_quantity = match i64::try_from(config.order.total_quantity) {
            Ok(shares) => Quantity::from_i64(shares),
            Err(_) => {
                return Err(ConfigError::Validation(
                    "order.total_quantity is too large".to_string(),
                ));
            }
        };
        let schedule = SessionSchedule::build(
            &curve,
            config.session.participation_curve.len(),
            total_quantity,
            session_start,
            i64::from(config.session.period_minutes),
        );

        let clock = SimClock::new(session_start);
        let mut ids = IdAllocator::new();
        let mut recorder = ExecutionRecorder::new();
        let at = clock.now();

        let client = match Order::client(
            OrderId::new(config.order.client_order_id.as_str()),
            ClientOrderId::new(config.order.client_order_id.as_str()),
            Symbol::new(config.order.ticker.as_str()),
            config.order.side,
            total_quantity,
            at,
        ) {
            Ok(order) => order,
            Err(error) => panic!("client order failed to build after validation: {error}"),
        };
        let mut hierarchy = match OrderHierarchy::new(client) {
            Ok(hierarchy) => hierarchy,
            Err(error) => panic!("hierarchy failed to open: {error}"),
        };
        let client_id = hierarchy.root_id().clone();
        recorder.record_pending(&mut hierarchy, &client_id);
        Self::activate(&mut hierarchy, &mut recorder, &client_id, &clock);

        let algo_id = ids.next_algo();
        let algo = {
            let Some(client) = hierarchy.get(&client_id) else {
                panic!("client order {client_id} missing");
            };
            match Order::algo_parent(algo_id.clone(), client, total_quantity, at) {
                Ok(order) => order,
                Err(error) => panic!("algo parent failed to build after validation: {error}"),
            }
        };
        if let Err(error) = hierarchy.insert_child(algo) {
            panic!("algo parent {algo_id} failed to insert: {error}");
        }
        recorder.record_pending(&mut hierarchy, &algo_id);
        Self::activate(&mut hierarchy, &mut recorder, &algo_id, &clock);

        let router = Router::new(
            config.venue_universe(),
            config.response_model(),
            config.routing.retry_bound,
        );

        Ok(Self {
            schedule,
            residual_policy: config.routing.residual_policy,
            router,
            hierarchy,
            algo_id,
            ids,
            clock,
            recorder,
            rng: StdRng::seed_from_u64(config.rng_seed),
        })
    }

    /// Runs every period of the schedule and reports the final state.
    ///
    /// Each period advances the clock to the period start, classifies
    /// urgency from fills against the schedule, sizes the slice under
    /// the residual policy, and routes it. Periods the schedule is
    /// already ahead of release nothing.
    ///
    /// # Panics
    ///
    /// Panics if the hierarchy fails its conservation audit after the
    /// last period.
    pub fn run(&mut self) -> SimulationReport {
        let mut slices_released = 0usize;
        let mut routes_created = 0usize;

        for period in 0..self.schedule.periods() {
            self.clock.advance_to(self.schedule.period_start(period));
            let (filled, remaining) = self.algo_progress();
            let urgency = self.schedule.classify_urgency(filled, period);
            let quantity =
                self.schedule
                    .slice_quantity(filled, remaining, period, self.residual_policy);
            if quantity.is_zero() {
                debug!(period, filled = %filled, "ahead of schedule, no slice this period");
                continue;
            }

            info!(
                period,
                quantity = %quantity,
                urgency = %urgency,
                filled = %filled,
                "releasing slice"
            );
            let slice_id = self.release_slice(quantity, urgency);
            slices_released += 1;

            let execution = self.router.execute_slice(
                &mut self.hierarchy,
                &slice_id,
                &mut self.ids,
                &mut self.clock,
                &mut self.recorder,
                &mut self.rng,
            );
            routes_created += execution.routes_created;
            debug!(
                period,
                slice = %slice_id,
                filled = %execution.filled_quantity,
                attempts = execution.attempts,
                "slice finished"
            );
        }

        if let Err(error) = self.hierarchy.audit() {
            panic!("conservation audit failed at session end: {error}");
        }

        self.report(slices_released, routes_created)
    }

    /// The order hierarchy in its current state.
    #[must_use]
    pub const fn hierarchy(&self) -> &OrderHierarchy {
        &self.hierarchy
    }

    /// The algo parent's id.
    #[must_use]
    pub const fn algo_id(&self) -> &OrderId {
        &self.algo_id
    }

    /// Snapshot records written so far, in append order.
    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        self.recorder.records()
    }

    /// Current simulated time.
    #[must_use]
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Accepts an order, records the acceptance, and moves it to
    /// working.
    fn activate(
        hierarchy: &mut OrderHierarchy,
        recorder: &mut ExecutionRecorder,
        order_id: &OrderId,
        clock: &SimClock,
    ) {
        let at = clock.now();
        match hierarchy.get_mut(order_id) {
            Some(order) => {
                if let Err(error) = order.accept(at) {
                    panic!("order {order_id} failed to accept: {error}");
                }
            }
            None => panic!("order {order_id} missing during activation"),
        }
        recorder.record_pending(hierarchy, order_id);
        match hierarchy.get_mut(order_id) {
            Some(order) => {
                if let Err(error) = order.start_working(at) {
                    panic!("order {order_id} failed to start working: {error}");
                }
            }
            None => panic!("order {order_id} vanished before working"),
        }
    }

    /// Creates a working slice under the algo parent and records its
    /// creation and acceptance.
    fn release_slice(&mut self, quantity: Quantity, urgency: Urgency) -> OrderId {
        let slice_id = self.ids.next_slice();
        let at = self.clock.now();
        let slice = {
            let Some(algo) = self.hierarchy.get(&self.algo_id) else {
                panic!("algo parent {id} missing", id = self.algo_id);
            };
            match Order::slice(slice_id.clone(), algo, quantity, urgency, at) {
                Ok(slice) => slice,
                Err(error) => panic!("slice under {id} failed to build: {error}", id = self.algo_id),
            }
        };
        if let Err(error) = self.hierarchy.insert_child(slice) {
            panic!("slice {slice_id} failed to insert: {error}");
        }
        self.recorder.record_pending(&mut self.hierarchy, &slice_id);
        Self::activate(&mut self.hierarchy, &mut self.recorder, &slice_id, &self.clock);
        slice_id
    }

    fn algo_progress(&self) -> (Quantity, Quantity) {
        match self.hierarchy.get(&self.algo_id) {
            Some(algo) => (algo.filled_quantity(), algo.remaining_quantity()),
            None => panic!("algo parent {id} missing", id = self.algo_id),
        }
    }

    fn report(&self, slices_released: usize, routes_created: usize) -> SimulationReport {
        let root_id = self.hierarchy.root_id();
        let client = match self.hierarchy.get(root_id) {
            Some(order) => order,
            None => panic!("client order {root_id} missing"),
        };
        SimulationReport {
            symbol: client.symbol().clone(),
            side: client.side(),
            final_status: client.status(),
            total_quantity: client.quantity(),
            filled_quantity: client.filled_quantity(),
            remaining_quantity: client.remaining_quantity(),
            average_price: client.average_price(),
            slices_released,
            routes_created,
            records_written: self.recorder.len(),
        }
    }
}
