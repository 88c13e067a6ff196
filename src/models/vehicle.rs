//! Vehicle parameters shared by every vehicle of the fleet.

use serde::{Deserialize, Serialize};

/// Capacities and rates of the (homogeneous) electric vehicle fleet.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::VehicleParameters;
///
/// let v = VehicleParameters::new(200, 77.75, 1.0)
///     .with_inverse_recharging_rate(3.47)
///     .with_average_velocity(1.0);
/// assert_eq!(v.load_capacity(), 200);
/// assert_eq!(v.battery_cost(10.0), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParameters {
    load_capacity: i32,
    battery_capacity: f64,
    battery_consumption_rate: f64,
    inverse_recharging_rate: f64,
    average_velocity: f64,
}

impl VehicleParameters {
    /// Creates parameters with no recharge time and unit velocity.
    pub fn new(load_capacity: i32, battery_capacity: f64, battery_consumption_rate: f64) -> Self {
        Self {
            load_capacity,
            battery_capacity,
            battery_consumption_rate,
            inverse_recharging_rate: 0.0,
            average_velocity: 1.0,
        }
    }

    /// Sets the time needed to recharge one unit of battery.
    pub fn with_inverse_recharging_rate(mut self, rate: f64) -> Self {
        self.inverse_recharging_rate = rate;
        self
    }

    /// Sets the average travel velocity.
    pub fn with_average_velocity(mut self, velocity: f64) -> Self {
        self.average_velocity = velocity;
        self
    }

    /// Maximum inventory a vehicle carries out of the depot.
    pub fn load_capacity(&self) -> i32 {
        self.load_capacity
    }

    /// Full battery level.
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    /// Battery drained per unit of distance.
    pub fn battery_consumption_rate(&self) -> f64 {
        self.battery_consumption_rate
    }

    /// Time per unit of battery recharged.
    pub fn inverse_recharging_rate(&self) -> f64 {
        self.inverse_recharging_rate
    }

    pub fn average_velocity(&self) -> f64 {
        self.average_velocity
    }

    /// Battery drained by driving `distance`.
    pub fn battery_cost(&self, distance: f64) -> f64 {
        distance * self.battery_consumption_rate
    }

    /// Time needed to drive `distance`. A non-positive velocity counts
    /// distance as time.
    pub fn travel_time(&self, distance: f64) -> f64 {
        if self.average_velocity > 0.0 {
            distance / self.average_velocity
        } else {
            distance
        }
    }

    /// Time needed to recharge from `level` back to full.
    pub fn recharge_time(&self, level: f64) -> f64 {
        (self.battery_capacity - level).max(0.0) * self.inverse_recharging_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let v = VehicleParameters::new(100, 50.0, 2.0);
        assert_eq!(v.inverse_recharging_rate(), 0.0);
        assert_eq!(v.average_velocity(), 1.0);
        assert_eq!(v.battery_cost(3.0), 6.0);
    }

    #[test]
    fn test_recharge_time() {
        let v = VehicleParameters::new(100, 50.0, 1.0).with_inverse_recharging_rate(2.0);
        assert_eq!(v.recharge_time(40.0), 20.0);
        assert_eq!(v.recharge_time(50.0), 0.0);
        assert_eq!(v.recharge_time(60.0), 0.0);
    }

    #[test]
    fn test_travel_time() {
        let v = VehicleParameters::new(100, 50.0, 1.0).with_average_velocity(2.0);
        assert_eq!(v.travel_time(10.0), 5.0);
        let stalled = v.with_average_velocity(0.0);
        assert_eq!(stalled.travel_time(10.0), 10.0);
    }
}
