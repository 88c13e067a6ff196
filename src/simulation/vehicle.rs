//! Drive simulation of an encoded tour.

use std::iter;

use tracing::trace;

use crate::distance::DistanceMatrix;
use crate::models::ProblemDefinition;

/// Distance added to a tour the vehicle cannot complete.
pub const IMPOSSIBLE_ROUTE_PENALTY: f64 = 1e9;

/// How [`Vehicle::pathfind`] reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Straight from start to end.
    Direct,
    /// With one or more charger stops in between.
    ThroughChargers,
    /// No sequence of chargers gets the vehicle there.
    Impossible,
}

/// Stops from a start node to an end node, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub stops: Vec<usize>,
    pub outcome: PathOutcome,
}

/// Outcome of driving a tour.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveReport {
    /// Driven distance, plus [`IMPOSSIBLE_ROUTE_PENALTY`] when infeasible.
    pub distance: f64,
    /// Every node the vehicle stopped at, depot first. Ends at the depot
    /// when the tour is feasible.
    pub route: Vec<usize>,
    /// `false` if the vehicle got stranded or a demand exceeds its capacity.
    pub feasible: bool,
    /// Number of depot-to-depot legs.
    pub subtours: usize,
    /// Customers reached after their time window closed.
    pub time_window_violations: usize,
}

impl DriveReport {
    fn infeasible(mut self) -> Self {
        self.distance += IMPOSSIBLE_ROUTE_PENALTY;
        self.feasible = false;
        self
    }
}

/// An electric vehicle that drives encoded tours and reports their true cost.
///
/// An encoded tour only lists customers. While driving it the vehicle goes
/// back to the depot whenever the next demand does not fit its remaining
/// inventory, and detours through charging stations whenever the next leg
/// would leave it unable to reach a recharge point afterwards.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::{Node, ProblemDefinition, VehicleParameters};
/// use evrp_routing::simulation::Vehicle;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::charger(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 0.0, 10),
///     Node::customer(3, 2.0, 0.0, 10),
///     Node::customer(4, 3.0, 0.0, 10),
/// ];
/// let problem = ProblemDefinition::new(nodes, VehicleParameters::new(20, 100.0, 1.0)).unwrap();
/// let mut vehicle = Vehicle::new(&problem);
///
/// let report = vehicle.simulate(&[2, 3, 4]);
/// assert!(report.feasible);
/// assert_eq!(report.route, vec![0, 2, 3, 0, 4, 0]);
/// assert!((report.distance - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle<'a> {
    problem: &'a ProblemDefinition,
    distances: DistanceMatrix,
    /// Distance from each node to its nearest recharge point other than
    /// itself. Zero for the depot, which recharges on arrival.
    reserve: Vec<Option<f64>>,
    battery: f64,
    inventory: i32,
}

impl<'a> Vehicle<'a> {
    /// Creates a vehicle with a full battery and full inventory at the depot.
    pub fn new(problem: &'a ProblemDefinition) -> Self {
        let distances = DistanceMatrix::from_nodes(problem.nodes());
        let depot = problem.depot().index();
        let refuel_points: Vec<usize> = iter::once(depot)
            .chain(problem.chargers().iter().copied())
            .collect();

        let reserve = (0..problem.num_nodes())
            .map(|node| {
                if node == depot {
                    return Some(0.0);
                }
                refuel_points
                    .iter()
                    .filter(|&&p| p != node)
                    .map(|&p| distances.get(node, p))
                    .min_by(f64::total_cmp)
            })
            .collect();

        let mut vehicle = Self {
            problem,
            distances,
            reserve,
            battery: 0.0,
            inventory: 0,
        };
        vehicle.reset();
        vehicle
    }

    /// Refills battery and inventory.
    pub fn reset(&mut self) {
        self.battery = self.problem.vehicle().battery_capacity();
        self.inventory = self.problem.vehicle().load_capacity();
    }

    /// Current battery level.
    pub fn battery(&self) -> f64 {
        self.battery
    }

    /// Current inventory.
    pub fn inventory(&self) -> i32 {
        self.inventory
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    fn battery_cost(&self, from: usize, to: usize) -> f64 {
        self.problem
            .vehicle()
            .battery_cost(self.distances.get(from, to))
    }

    /// Returns `true` if a vehicle holding `battery` can drive from `from` to
    /// `to` and still reach a recharge point from `to`.
    pub fn can_reach_safely(&self, from: usize, to: usize, battery: f64) -> bool {
        match self.reserve[to] {
            Some(reserve) => {
                battery > self.battery_cost(from, to) + self.problem.vehicle().battery_cost(reserve)
            }
            None => false,
        }
    }

    /// Finds stops from `start` to `end` for the current battery level.
    ///
    /// While the end is not safely reachable, hops to the charger closest to
    /// the end among the chargers in range that this path has not visited,
    /// recharging there.
    pub fn pathfind(&self, start: usize, end: usize) -> Path {
        let capacity = self.problem.vehicle().battery_capacity();
        let mut battery = self.battery;
        let mut current = start;
        let mut stops = vec![start];

        while !self.can_reach_safely(current, end, battery) {
            let hop = self
                .problem
                .chargers()
                .iter()
                .copied()
                .filter(|&c| c != current && !stops.contains(&c))
                .filter(|&c| self.battery_cost(current, c) <= battery)
                .min_by(|&a, &b| {
                    self.distances
                        .get(a, end)
                        .total_cmp(&self.distances.get(b, end))
                });

            match hop {
                Some(charger) => {
                    trace!(from = current, charger, "hopping to charger");
                    stops.push(charger);
                    current = charger;
                    battery = capacity;
                }
                None => {
                    trace!(start, end, stranded_at = current, "no charger in range");
                    return Path {
                        stops,
                        outcome: PathOutcome::Impossible,
                    };
                }
            }
        }

        stops.push(end);
        let outcome = if stops.len() == 2 {
            PathOutcome::Direct
        } else {
            PathOutcome::ThroughChargers
        };
        Path { stops, outcome }
    }

    /// Drives `tour` and returns its true distance and route.
    ///
    /// State is reset first, so repeated calls are independent.
    pub fn simulate(&mut self, tour: &[usize]) -> DriveReport {
        self.reset();
        let params = self.problem.vehicle().clone();
        let depot = self.problem.depot().index();

        let mut report = DriveReport {
            distance: 0.0,
            route: vec![depot],
            feasible: true,
            subtours: 0,
            time_window_violations: 0,
        };
        if tour.is_empty() {
            return report;
        }

        let stops: Vec<usize> = tour.iter().copied().chain(iter::once(depot)).collect();
        let mut current = depot;
        let mut time = 0.0;
        let mut next = 0;

        while next < stops.len() {
            let target = stops[next];
            let Some(target_node) = self.problem.node(target) else {
                trace!(target, "unknown node in tour");
                return report.infeasible();
            };

            let demand = target_node.demand();
            let to_customer = demand <= self.inventory;
            if !to_customer && current == depot {
                trace!(target, demand, "demand exceeds vehicle capacity");
                return report.infeasible();
            }
            let destination = if to_customer { target } else { depot };
            trace!(
                at = current,
                target,
                destination,
                battery = self.battery,
                inventory = self.inventory,
                "routing"
            );

            let path = self.pathfind(current, destination);
            if path.outcome == PathOutcome::Impossible {
                return report.infeasible();
            }

            for leg in path.stops.windows(2) {
                let (from, to) = (leg[0], leg[1]);
                let d = self.distances.get(from, to);
                self.battery -= params.battery_cost(d);
                time += params.travel_time(d);
                report.distance += d;
                report.route.push(to);

                if self.problem.nodes()[to].is_charger() {
                    time += params.recharge_time(self.battery);
                    self.battery = params.battery_capacity();
                }
            }
            current = destination;

            if destination == depot {
                // A fresh vehicle leaves the depot at time zero.
                time = params.recharge_time(self.battery);
                self.battery = params.battery_capacity();
                self.inventory = params.load_capacity();
                report.subtours += 1;
                if to_customer {
                    next += 1;
                }
            } else {
                if let Some(tw) = target_node.time_window() {
                    if time > tw.due() {
                        report.time_window_violations += 1;
                    }
                    time = time.max(tw.ready());
                }
                time += target_node.service_time();
                self.inventory -= demand;
                next += 1;
            }

            debug_assert!(self.battery >= 0.0);
            debug_assert!(self.inventory >= 0);
        }

        report
    }

    /// Shorthand for `simulate(tour).distance`.
    pub fn distance(&mut self, tour: &[usize]) -> f64 {
        self.simulate(tour).distance
    }
}
