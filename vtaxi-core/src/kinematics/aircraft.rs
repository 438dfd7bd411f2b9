use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Meters per second in one knot
pub const KNOT: f64 = 0.514_444;

/// ICAO wake category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AircraftSize {
    Light,
    Medium,
    Heavy,
    Super,
}

/// Ground handling characteristics of an aircraft type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftType {
    pub name: &'static str,
    pub size: AircraftSize,
    /// Knots
    pub max_taxi_speed: f64,
    /// m/s²
    pub max_acceleration: f64,
    /// m/s², positive
    pub max_deceleration: f64,
}

impl AircraftType {
    pub const A320: Self = Self {
        name: "A320",
        size: AircraftSize::Medium,
        max_taxi_speed: 20.0,
        max_acceleration: 1.0,
        max_deceleration: 2.0,
    };

    pub const B747: Self = Self {
        name: "B747",
        size: AircraftSize::Heavy,
        max_taxi_speed: 20.0,
        max_acceleration: 0.8,
        max_deceleration: 1.5,
    };

    pub const BUILT_IN: [Self; 2] = [Self::A320, Self::B747];
}

impl FromStr for AircraftType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::BUILT_IN
            .into_iter()
            .find(|aircraft| aircraft.name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::BUILT_IN.iter().map(|a| a.name).collect();
                Error::InvalidConfiguration(format!(
                    "Unknown aircraft type {s}. Known types are: {}",
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Simplified longitudinal dynamics of one aircraft on the ground
#[derive(Debug, Clone)]
pub struct AircraftPhysics {
    pub aircraft: AircraftType,
    /// m/s
    pub current_speed: f64,
}

impl AircraftPhysics {
    pub fn new(aircraft: AircraftType) -> Self {
        Self {
            aircraft,
            current_speed: 0.0,
        }
    }

    fn max_speed(&self) -> f64 {
        self.aircraft.max_taxi_speed * KNOT
    }

    /// Acceleration (m/s²) towards `desired_speed` knots.
    ///
    /// With a stop point ahead, acceleration is scaled down when the aircraft
    /// could not stop in `distance_to_stop` meters from the desired speed.
    pub fn acceleration(&self, desired_speed: f64, distance_to_stop: Option<f64>) -> f64 {
        let desired = desired_speed * KNOT;
        let speed_diff = desired - self.current_speed;

        if speed_diff > 0.0 {
            let mut max_accel = self.aircraft.max_acceleration;
            if let Some(distance) = distance_to_stop {
                let stopping_distance = desired.powi(2) / (2.0 * self.aircraft.max_deceleration);
                if stopping_distance > distance {
                    max_accel = max_accel
                        .min(self.aircraft.max_deceleration * distance / stopping_distance);
                }
            }
            max_accel.min(speed_diff)
        } else {
            (-self.aircraft.max_deceleration).max(speed_diff)
        }
    }

    /// Integrates `acceleration` over `dt` seconds and returns the new speed
    /// in knots, clamped to `[0, max_taxi_speed]`.
    pub fn update_speed(&mut self, dt: f64, acceleration: f64) -> f64 {
        self.current_speed = (self.current_speed + acceleration * dt).clamp(0.0, self.max_speed());
        self.current_speed / KNOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_built_in_types() {
        assert_eq!("a320".parse::<AircraftType>().unwrap(), AircraftType::A320);
        assert_eq!("B747".parse::<AircraftType>().unwrap().size, AircraftSize::Heavy);
        assert!("C172".parse::<AircraftType>().is_err());
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut physics = AircraftPhysics::new(AircraftType::A320);
        let knots = physics.update_speed(100.0, 1.0);
        assert!((knots - 20.0).abs() < 1e-9);

        let knots = physics.update_speed(100.0, -2.0);
        assert_eq!(knots, 0.0);
    }

    #[test]
    fn test_acceleration_is_limited_near_stop_point() {
        let physics = AircraftPhysics::new(AircraftType::A320);
        let free = physics.acceleration(20.0, None);
        let near_stop = physics.acceleration(20.0, Some(5.0));

        assert!((free - 1.0).abs() < 1e-9);
        assert!(near_stop < free);
        assert!(near_stop > 0.0);
    }

    #[test]
    fn test_deceleration_is_bounded() {
        let mut physics = AircraftPhysics::new(AircraftType::B747);
        physics.current_speed = 10.0;
        assert!((physics.acceleration(0.0, None) + 1.5).abs() < 1e-9);
    }
}
