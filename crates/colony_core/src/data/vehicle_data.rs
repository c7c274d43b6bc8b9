//! Vehicle type definitions.

use serde::{Deserialize, Serialize};

/// Broad vehicle class. Decides the transportation factor and the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Crew transport rover.
    TransportRover,
    /// Heavy cargo rover.
    CargoRover,
    /// Long range explorer rover with a lab.
    ExplorerRover,
    /// Single seat light utility vehicle.
    LightUtility,
    /// Uncrewed delivery drone.
    Drone,
}

impl VehicleClass {
    /// Whether this is one of the crewed rover classes.
    #[must_use]
    pub const fn is_rover(self) -> bool {
        matches!(
            self,
            Self::TransportRover | Self::CargoRover | Self::ExplorerRover
        )
    }
}

/// Data-driven vehicle type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleData {
    /// Stable good id, in the vehicle range.
    pub id: u32,
    /// Vehicle type name.
    pub name: String,
    /// Vehicle class.
    pub class: VehicleClass,
    /// Number of people it carries.
    pub crew_capacity: u32,
    /// Cargo capacity in kg.
    pub cargo_capacity: f64,
    /// Whether it carries a field laboratory.
    #[serde(default)]
    pub has_lab: bool,
    /// Base speed in km/h.
    pub base_speed: f64,
    /// Drivetrain efficiency in km/kWh.
    pub drivetrain_efficiency: f64,
    /// Empty mass in kg.
    pub mass: f64,
}

impl VehicleData {
    /// Rough operating range in km, from speed and efficiency.
    #[must_use]
    pub fn range_km(&self) -> f64 {
        self.drivetrain_efficiency * self.base_speed * 10.0
    }
}
