//! Good descriptor and its one-time production cost model.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{normalize_name, GoodCategory, GoodId};
use crate::data::{EquipmentKind, Phase, ProcessCatalog, ProcessData, ResourceKind, VehicleClass};
use crate::error::{EconomyError, Result};

// Base value table.
const CHLORINE_VALUE: f64 = 0.1;
const ICE_VALUE: f64 = 1.5;
const CHEMICAL_VALUE: f64 = 0.01;
const COMPOUND_VALUE: f64 = 0.005;
const ELEMENT_VALUE: f64 = 0.005;
const FOOD_VALUE: f64 = 0.1;
const DERIVED_VALUE: f64 = 0.07;
const OIL_VALUE: f64 = 0.1;
const CROP_VALUE: f64 = 3.0;
const ROCK_VALUE: f64 = 0.005;
const REGOLITH_VALUE: f64 = 0.02;
const ORE_VALUE: f64 = 0.03;
const MINERAL_VALUE: f64 = 0.1;
const WASTE_VALUE: f64 = 0.001;
const STANDARD_AMOUNT_VALUE: f64 = 0.3;

const ITEM_VALUE: f64 = 1.1;
const FC_STACK_VALUE: f64 = 8.0;
const FC_VALUE: f64 = 1.0;
const WAFER_VALUE: f64 = 50.0;
const BATTERY_VALUE: f64 = 5.0;
const CPU_VALUE: f64 = 10.0;
const BOARD_VALUE: f64 = 1.0;
const WIRE_VALUE: f64 = 0.005;

const EVA_SUIT_VALUE: f64 = 50.0;
const CONTAINER_VALUE: f64 = 0.1;

const LIGHT_UTILITY_VEHICLE_VALUE: f64 = 200.0;
const DRONE_VALUE: f64 = 50.0;
const ROVER_VALUE: f64 = 100.0;

// Output cost normalization.
const LABOR_FACTOR: f64 = 250.0;
const PROCESS_TIME_FACTOR: f64 = 1_000.0;
const POWER_FACTOR: f64 = 1.0;
const SKILL_FACTOR: f64 = 1.0;
const TECH_FACTOR: f64 = 2.0;

/// Static attributes that decide a good's category and base value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoodKind {
    /// A bulk resource.
    Resource {
        /// Sub-type.
        kind: ResourceKind,
        /// Physical phase.
        phase: Phase,
        /// Edible by people.
        edible: bool,
        /// Life support resource.
        life_support: bool,
    },
    /// A discrete part.
    Part,
    /// Equipment or container.
    Equipment(EquipmentKind),
    /// A vehicle type.
    Vehicle(VehicleClass),
}

impl GoodKind {
    /// The valuation category this kind maps to.
    #[must_use]
    pub const fn category(&self) -> GoodCategory {
        match self {
            Self::Resource { .. } => GoodCategory::BulkResource,
            Self::Part => GoodCategory::DiscreteItem,
            Self::Equipment(EquipmentKind::EvaSuit) => GoodCategory::Equipment,
            Self::Equipment(_) => GoodCategory::Container,
            Self::Vehicle(_) => GoodCategory::Vehicle,
        }
    }
}

/// Production-derived cost factors, averaged over every process that outputs
/// the good and blended 50/50 between manufacturing and food production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostFactors {
    /// Work time in millisols.
    pub labor_time: f64,
    /// Power draw in kW.
    pub power: f64,
    /// Process time in millisols.
    pub process_time: f64,
    /// Operator skill level.
    pub skill_level: f64,
    /// Workshop tech level.
    pub tech_level: f64,
}

impl CostFactors {
    fn scaled(self, by: f64) -> Self {
        Self {
            labor_time: self.labor_time * by,
            power: self.power * by,
            process_time: self.process_time * by,
            skill_level: self.skill_level * by,
            tech_level: self.tech_level * by,
        }
    }

    fn plus(self, other: Self) -> Self {
        Self {
            labor_time: self.labor_time + other.labor_time,
            power: self.power + other.power,
            process_time: self.process_time + other.process_time,
            skill_level: self.skill_level + other.skill_level,
            tech_level: self.tech_level + other.tech_level,
        }
    }
}

/// Memoized result of the cost pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodCost {
    /// Averaged production factors.
    pub factors: CostFactors,
    /// Category base value modifier.
    pub type_modifier: f64,
    /// Production cost per unit.
    pub output_cost: f64,
}

/// Descriptor of one tradeable good.
///
/// Created once when the catalog is populated and immutable afterwards,
/// except for the cost which is computed at most once.
#[derive(Debug, Clone)]
pub struct Good {
    id: GoodId,
    name: String,
    kind: GoodKind,
    unit_mass: f64,
    cost: OnceLock<GoodCost>,
}

impl Good {
    /// Create a new good descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Configuration`] if the name is blank or the
    /// id does not fall in the range of the kind's category.
    pub fn new(id: GoodId, name: &str, kind: GoodKind, unit_mass: f64) -> Result<Self> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(EconomyError::Configuration(format!(
                "good {id} has a blank name"
            )));
        }
        let category = kind.category();
        if id.range() != Some(category.id_range()) {
            return Err(EconomyError::Configuration(format!(
                "good '{name}' id {id} is outside the {} range",
                category.label()
            )));
        }
        Ok(Self {
            id,
            name,
            kind,
            unit_mass,
            cost: OnceLock::new(),
        })
    }

    /// Good id.
    #[must_use]
    pub const fn id(&self) -> GoodId {
        self.id
    }

    /// Normalized name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static kind attributes.
    #[must_use]
    pub const fn kind(&self) -> &GoodKind {
        &self.kind
    }

    /// Valuation category.
    #[must_use]
    pub const fn category(&self) -> GoodCategory {
        self.kind.category()
    }

    /// Mass of one unit in kg (1 for bulk resources).
    #[must_use]
    pub const fn unit_mass(&self) -> f64 {
        self.unit_mass
    }

    /// Whether this is a life support resource.
    #[must_use]
    pub const fn is_life_support(&self) -> bool {
        matches!(
            self.kind,
            GoodKind::Resource {
                life_support: true,
                ..
            }
        )
    }

    /// Base value modifier from the static category table.
    #[must_use]
    pub fn type_modifier(&self) -> f64 {
        match self.kind {
            GoodKind::Resource { kind, edible, .. } => resource_modifier(&self.name, kind, edible),
            GoodKind::Part => part_modifier(&self.name),
            GoodKind::Equipment(EquipmentKind::EvaSuit) => EVA_SUIT_VALUE,
            GoodKind::Equipment(_) => CONTAINER_VALUE,
            GoodKind::Vehicle(VehicleClass::LightUtility) => LIGHT_UTILITY_VEHICLE_VALUE,
            GoodKind::Vehicle(VehicleClass::Drone) => DRONE_VALUE,
            GoodKind::Vehicle(_) => ROVER_VALUE,
        }
    }

    /// Average production factors over every process that outputs this good.
    ///
    /// `mass_of` resolves a good name to its unit mass so each process's
    /// factors can be weighted by this good's share of the output mass.
    pub fn compute_base_cost(
        &self,
        processes: &ProcessCatalog,
        mass_of: impl Fn(&str) -> Option<f64>,
    ) -> CostFactors {
        let manufacturing = self.average_factors(&processes.manufacturing, &mass_of);
        let food = self.average_factors(&processes.food_production, &mass_of);
        manufacturing.scaled(0.5).plus(food.scaled(0.5))
    }

    fn average_factors(
        &self,
        processes: &[ProcessData],
        mass_of: &impl Fn(&str) -> Option<f64>,
    ) -> CostFactors {
        let mut sum = CostFactors::default();
        let mut count = 0u32;

        for process in processes.iter().filter(|p| p.produces(&self.name)) {
            let total_weight: f64 = process
                .outputs
                .iter()
                .map(|o| o.quantity * mass_of(&o.name).unwrap_or(1.0))
                .sum();
            let own_weight: f64 = process
                .outputs
                .iter()
                .filter(|o| o.is(&self.name))
                .map(|o| o.quantity * self.unit_mass)
                .sum();
            let fraction = if total_weight > 0.0 {
                own_weight / total_weight
            } else {
                0.0
            };

            let factors = CostFactors {
                labor_time: process.labor_time,
                power: process.power,
                process_time: process.process_time,
                skill_level: f64::from(process.skill_level),
                tech_level: f64::from(process.tech_level),
            };
            sum = sum.plus(factors.scaled(fraction));
            count += 1;
        }

        if count == 0 {
            CostFactors::default()
        } else {
            sum.scaled(1.0 / f64::from(count))
        }
    }

    /// Compute the production output cost, once.
    ///
    /// Later calls return the memoized value without touching the catalogs.
    pub fn compute_output_cost(
        &self,
        processes: &ProcessCatalog,
        mass_of: impl Fn(&str) -> Option<f64>,
    ) -> f64 {
        self.cost
            .get_or_init(|| {
                let factors = self.compute_base_cost(processes, mass_of);
                let type_modifier = self.type_modifier();
                let output_cost = type_modifier
                    * (1.0
                        + factors.labor_time / LABOR_FACTOR
                        + factors.process_time / PROCESS_TIME_FACTOR
                        + factors.power / POWER_FACTOR
                        + factors.skill_level / SKILL_FACTOR
                        + factors.tech_level / TECH_FACTOR);
                GoodCost {
                    factors,
                    type_modifier,
                    output_cost,
                }
            })
            .output_cost
    }

    /// Whether the cost pass has run for this good.
    #[must_use]
    pub fn is_cost_computed(&self) -> bool {
        self.cost.get().is_some()
    }

    /// The memoized cost, if computed.
    #[must_use]
    pub fn cost(&self) -> Option<&GoodCost> {
        self.cost.get()
    }

    /// Production cost per unit, zero before the cost pass.
    #[must_use]
    pub fn output_cost(&self) -> f64 {
        self.cost.get().map_or(0.0, |c| c.output_cost)
    }
}

fn resource_modifier(name: &str, kind: ResourceKind, edible: bool) -> f64 {
    match name {
        "chlorine" => return CHLORINE_VALUE,
        "ice" => return ICE_VALUE,
        _ => {}
    }
    if edible {
        return match kind {
            ResourceKind::Derived => DERIVED_VALUE,
            ResourceKind::Oil => OIL_VALUE,
            ResourceKind::Crop => CROP_VALUE,
            _ => FOOD_VALUE,
        };
    }
    match kind {
        ResourceKind::Chemical => CHEMICAL_VALUE,
        ResourceKind::Compound => COMPOUND_VALUE,
        ResourceKind::Element => ELEMENT_VALUE,
        ResourceKind::Derived => DERIVED_VALUE,
        ResourceKind::Oil => OIL_VALUE,
        ResourceKind::Crop => CROP_VALUE,
        ResourceKind::Rock => ROCK_VALUE,
        ResourceKind::Regolith => REGOLITH_VALUE,
        ResourceKind::Ore => ORE_VALUE,
        ResourceKind::Mineral => MINERAL_VALUE,
        ResourceKind::Waste => WASTE_VALUE,
        ResourceKind::Standard => STANDARD_AMOUNT_VALUE,
    }
}

fn part_modifier(name: &str) -> f64 {
    if name == "fuel cell stack" {
        FC_STACK_VALUE
    } else if name == "solid oxide fuel cell" {
        FC_VALUE
    } else if name.contains("wafer") {
        WAFER_VALUE
    } else if name.contains("battery") {
        BATTERY_VALUE
    } else if name == "microcontroller" {
        CPU_VALUE
    } else if name.contains("board") {
        BOARD_VALUE
    } else if name.ends_with("wire") {
        WIRE_VALUE
    } else {
        ITEM_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ProcessItem;

    fn part(id: u32, name: &str) -> Good {
        Good::new(GoodId(id), name, GoodKind::Part, 1.0).unwrap()
    }

    fn resource(id: u32, name: &str, kind: ResourceKind) -> Good {
        Good::new(
            GoodId(id),
            name,
            GoodKind::Resource {
                kind,
                phase: Phase::Solid,
                edible: false,
                life_support: false,
            },
            1.0,
        )
        .unwrap()
    }

    fn process(output: &str, quantity: f64, other: Option<(&str, f64)>) -> ProcessData {
        let mut outputs = vec![ProcessItem::new(output, quantity)];
        if let Some((name, qty)) = other {
            outputs.push(ProcessItem::new(name, qty));
        }
        ProcessData {
            name: format!("make {output}"),
            inputs: Vec::new(),
            outputs,
            labor_time: 100.0,
            power: 2.0,
            process_time: 500.0,
            skill_level: 2,
            tech_level: 4,
        }
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let result = Good::new(GoodId(1000), "   ", GoodKind::Part, 1.0);
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_id_outside_category_range() {
        let result = Good::new(GoodId(5), "microcontroller", GoodKind::Part, 0.1);
        assert!(matches!(result, Err(EconomyError::Configuration(_))));

        let result = Good::new(
            GoodId(2001),
            "bag",
            GoodKind::Equipment(EquipmentKind::Bag),
            0.1,
        );
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
    }

    #[test]
    fn test_name_is_normalized() {
        let good = part(1000, "  Fuel Cell Stack ");
        assert_eq!(good.name(), "fuel cell stack");
        assert!((good.type_modifier() - FC_STACK_VALUE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_type_modifier_table() {
        assert!((resource(1, "ice", ResourceKind::Standard).type_modifier() - ICE_VALUE).abs() < 1e-12);
        assert!(
            (resource(2, "chlorine", ResourceKind::Element).type_modifier() - CHLORINE_VALUE).abs()
                < 1e-12
        );
        assert!(
            (resource(3, "regolith", ResourceKind::Regolith).type_modifier() - REGOLITH_VALUE).abs()
                < 1e-12
        );
        assert!((part(1001, "semiconductor wafer").type_modifier() - WAFER_VALUE).abs() < 1e-12);
        assert!((part(1002, "lithium battery").type_modifier() - BATTERY_VALUE).abs() < 1e-12);
        assert!((part(1003, "circuit board").type_modifier() - BOARD_VALUE).abs() < 1e-12);
        assert!((part(1004, "pipe valve").type_modifier() - ITEM_VALUE).abs() < 1e-12);

        let luv = Good::new(
            GoodId(2000),
            "light utility vehicle",
            GoodKind::Vehicle(VehicleClass::LightUtility),
            1000.0,
        )
        .unwrap();
        assert!((luv.type_modifier() - LIGHT_UTILITY_VEHICLE_VALUE).abs() < 1e-12);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            GoodKind::Equipment(EquipmentKind::EvaSuit).category(),
            GoodCategory::Equipment
        );
        assert_eq!(
            GoodKind::Equipment(EquipmentKind::Barrel).category(),
            GoodCategory::Container
        );
    }

    #[test]
    fn test_base_cost_without_processes_is_zero_not_nan() {
        let good = part(1000, "pipe valve");
        let factors = good.compute_base_cost(&ProcessCatalog::default(), |_| Some(1.0));
        assert_eq!(factors, CostFactors::default());
        assert!(factors.labor_time.is_finite());
    }

    #[test]
    fn test_base_cost_blends_half_from_each_catalog() {
        let good = part(1000, "pipe valve");
        let catalog = ProcessCatalog {
            manufacturing: vec![process("pipe valve", 1.0, None)],
            ..Default::default()
        };
        let factors = good.compute_base_cost(&catalog, |_| Some(1.0));
        // Only manufacturing contributes, and only to its half of the blend.
        assert!((factors.labor_time - 50.0).abs() < 1e-9);
        assert!((factors.power - 1.0).abs() < 1e-9);
        assert!((factors.tech_level - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_cost_weighted_by_output_share() {
        let good = part(1000, "pipe valve");
        let catalog = ProcessCatalog {
            manufacturing: vec![process("pipe valve", 1.0, Some(("slag", 3.0)))],
            ..Default::default()
        };
        let factors = good.compute_base_cost(&catalog, |_| Some(1.0));
        // A quarter of the output mass, half of the blend.
        assert!((factors.labor_time - 100.0 * 0.25 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_output_cost_computed_once() {
        let good = part(1000, "pipe valve");
        assert!(!good.is_cost_computed());
        assert!(good.output_cost().abs() < f64::EPSILON);

        let catalog = ProcessCatalog {
            manufacturing: vec![process("pipe valve", 1.0, None)],
            ..Default::default()
        };
        let first = good.compute_output_cost(&catalog, |_| Some(1.0));
        assert!(good.is_cost_computed());

        // 1.1 * (1 + 50/250 + 250/1000 + 1/1 + 1/1 + 2/2)
        let expected = ITEM_VALUE * (1.0 + 0.2 + 0.25 + 1.0 + 1.0 + 1.0);
        assert!((first - expected).abs() < 1e-9);

        // A second call ignores the (different) catalog.
        let second = good.compute_output_cost(&ProcessCatalog::default(), |_| Some(1.0));
        assert!((first - second).abs() < f64::EPSILON);
    }
}
