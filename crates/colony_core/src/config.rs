//! Tuning constants for the valuation engine.
//!
//! Every field has a default so a RON file only needs to name the values it
//! overrides:
//!
//! ```ron
//! ValuationConfig(
//!     damping_ratio: 0.4,
//!     life_support: (water_value_modifier: 3.0),
//! )
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EconomyError, Result};

/// Inclusive bounds for a cached quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Bounds {
    /// Create new bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the bounds. Non-finite values land on `min`.
    ///
    /// Never panics; inverted bounds resolve to `max`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.max(self.min).min(self.max)
        } else {
            self.min
        }
    }

    fn check(&self, what: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 || self.min > self.max {
            return Err(EconomyError::Configuration(format!(
                "{what} must satisfy 0 <= min <= max, got min {} max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.05, 5_000.0)
    }
}

/// Weights of the four demand signals in the per-tick blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    /// Weight of last tick's demand.
    pub previous: f64,
    /// Weight of the historical average.
    pub average: f64,
    /// Weight of the projected demand.
    pub projected: f64,
    /// Weight of the trade demand.
    pub trade: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            previous: 0.85,
            average: 0.05,
            projected: 0.05,
            trade: 0.05,
        }
    }
}

impl BlendWeights {
    /// Weighted sum of the four signals.
    #[must_use]
    pub fn blend(&self, previous: f64, average: f64, projected: f64, trade: f64) -> f64 {
        self.previous * previous
            + self.average * average
            + self.projected * projected
            + self.trade * trade
    }
}

/// Life support consumption and valuation floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeSupportConfig {
    /// Scale applied to population consumption.
    pub factor: f64,
    /// Minimum demand for life support resources.
    pub floor: f64,
    /// Oxygen per person per sol, kg.
    pub oxygen_rate: f64,
    /// Water per person per sol, kg.
    pub water_rate: f64,
    /// Food per person per sol, kg.
    pub food_rate: f64,
    /// Oxygen value modifier.
    pub oxygen_value_modifier: f64,
    /// Water value modifier.
    pub water_value_modifier: f64,
    /// Food value modifier.
    pub food_value_modifier: f64,
}

impl Default for LifeSupportConfig {
    fn default() -> Self {
        Self {
            factor: 0.005,
            floor: 100.0,
            oxygen_rate: 0.84,
            water_rate: 3.0,
            food_rate: 0.62,
            oxygen_value_modifier: 1.0,
            water_value_modifier: 3.0,
            food_value_modifier: 1.0,
        }
    }
}

/// Coupling of a raw resource's demand to the demand of what it becomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingConfig {
    /// Name of the downstream resource (water for ice, sand for regolith).
    pub driver: String,
    /// Share of the downstream demand in the 80/20 blend.
    pub driver_share: f64,
    /// Population is capped at this count before scaling.
    pub population_cap: u32,
    /// Final modifier.
    pub modifier: f64,
}

impl CouplingConfig {
    /// Default ice coupling: driven by water.
    #[must_use]
    pub fn ice() -> Self {
        Self {
            driver: "water".to_string(),
            driver_share: 0.8,
            population_cap: 96,
            modifier: 0.1,
        }
    }

    /// Default regolith coupling: driven by sand.
    #[must_use]
    pub fn regolith() -> Self {
        Self {
            driver: "sand".to_string(),
            driver_share: 0.8,
            population_cap: 48,
            modifier: 0.05,
        }
    }
}

/// Partial coupling as written in RON; missing fields keep the base coupling.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CouplingOverride {
    driver: Option<String>,
    driver_share: Option<f64>,
    population_cap: Option<u32>,
    modifier: Option<f64>,
}

impl CouplingOverride {
    fn apply(self, base: CouplingConfig) -> CouplingConfig {
        CouplingConfig {
            driver: self.driver.unwrap_or(base.driver),
            driver_share: self.driver_share.unwrap_or(base.driver_share),
            population_cap: self.population_cap.unwrap_or(base.population_cap),
            modifier: self.modifier.unwrap_or(base.modifier),
        }
    }
}

fn ice_coupling<'de, D>(deserializer: D) -> std::result::Result<CouplingConfig, D::Error>
where
    D: Deserializer<'de>,
{
    CouplingOverride::deserialize(deserializer).map(|o| o.apply(CouplingConfig::ice()))
}

fn regolith_coupling<'de, D>(deserializer: D) -> std::result::Result<CouplingConfig, D::Error>
where
    D: Deserializer<'de>,
{
    CouplingOverride::deserialize(deserializer).map(|o| o.apply(CouplingConfig::regolith()))
}

/// Demand multipliers for parts whose valuation would otherwise be noisy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartFlattening {
    /// Scrap metal, only obtainable from vehicle salvage.
    pub scrap: f64,
    /// Metal ingots.
    pub ingot: f64,
    /// Sheet metal.
    pub sheet: f64,
    /// Kitchen equipment built in fixed batches.
    pub kitchen: f64,
}

impl Default for PartFlattening {
    fn default() -> Self {
        Self {
            scrap: 0.01,
            ingot: 0.01,
            sheet: 0.1,
            kitchen: 1.5,
        }
    }
}

/// Equipment demand drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    /// Scale of the EVA part aggregate demand.
    pub eva_suit_factor: f64,
    /// Per-areologist demand for bags.
    pub bag_demand: f64,
    /// Per-areologist demand for large bags.
    pub large_bag_demand: f64,
    /// Per-areologist demand for barrels.
    pub barrel_demand: f64,
    /// Per-areologist demand for specimen boxes.
    pub specimen_box_demand: f64,
    /// Per-areologist demand for gas canisters.
    pub gas_canister_demand: f64,
    /// Weight of trade demand added to the drivers.
    pub trade_weight: f64,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            eva_suit_factor: 1.0,
            bag_demand: 0.1,
            large_bag_demand: 0.3,
            barrel_demand: 0.2,
            specimen_box_demand: 0.5,
            gas_canister_demand: 0.1,
            trade_weight: 0.05,
        }
    }
}

/// Vehicle demand drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Demand per specialist for light utility vehicles.
    pub luv_factor: f64,
    /// Demand per specialist for drones.
    pub drone_factor: f64,
    /// Transportation factor of transport rovers.
    pub transport_factor: f64,
    /// Transportation factor of cargo rovers.
    pub cargo_factor: f64,
    /// Transportation factor of explorer rovers.
    pub explorer_factor: f64,
    /// Transportation factor of light utility vehicles.
    pub luv_transport_factor: f64,
    /// Transportation factor of drones.
    pub drone_transport_factor: f64,
    /// Scale of mission demand derived from resource values (ice, regolith, minerals).
    pub collection_factor: f64,
    /// Weight of trade demand added after the transport factor.
    pub trade_weight: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            luv_factor: 2.0,
            drone_factor: 2.0,
            transport_factor: 5.0,
            cargo_factor: 4.0,
            explorer_factor: 3.0,
            luv_transport_factor: 1.0,
            drone_transport_factor: 1.0,
            collection_factor: 1.0,
            trade_weight: 0.05,
        }
    }
}

/// Projected demand contributors the engine can sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Ice, coupled to water demand.
    Ice,
    /// Regolith, coupled to sand demand.
    Regolith,
    /// Population consumption of oxygen, water and food.
    LifeSupport,
    /// Inputs of manufacturing processes.
    ManufacturingInput,
    /// Inputs of food production processes.
    FoodProductionInput,
    /// Inputs of active construction stages.
    Construction,
    /// Parts consumed by maintenance and repair.
    Maintenance,
    /// Parts EVA suits are built from.
    EvaSuitParts,
}

/// What the generic value cache stores for bulk resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceValueCaching {
    /// Store the blended demand under the value key, matching the demand cache.
    #[default]
    Demand,
    /// Store the demand/supply ratio.
    Ratio,
}

/// All valuation engine tuning constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Bounds of cached demand.
    pub demand_bounds: Bounds,
    /// Upper bound of projected demand.
    pub max_projected_demand: f64,
    /// Bounds of estimated supply.
    pub supply_bounds: Bounds,
    /// Blend of bulk resource demand signals.
    pub resource_weights: BlendWeights,
    /// Blend of part demand signals.
    pub part_weights: BlendWeights,
    /// Fraction of a part demand change applied per tick.
    pub damping_ratio: f64,
    /// Life support parameters.
    pub life_support: LifeSupportConfig,
    /// Ice coupling.
    #[serde(deserialize_with = "ice_coupling")]
    pub ice: CouplingConfig,
    /// Regolith coupling.
    #[serde(deserialize_with = "regolith_coupling")]
    pub regolith: CouplingConfig,
    /// Distance in km that halves remote demand.
    pub trade_distance_scale: f64,
    /// Part flattening multipliers.
    pub part_flattening: PartFlattening,
    /// Scale of manufacturing input demand.
    pub manufacturing_input_factor: f64,
    /// Scale of food production input demand.
    pub food_production_input_factor: f64,
    /// Scale of construction input demand.
    pub construction_input_factor: f64,
    /// Parts an EVA suit is made of.
    pub eva_suit_parts: Vec<String>,
    /// Per-person demand for each EVA suit part.
    pub eva_part_factor: f64,
    /// Equipment drivers.
    pub equipment: EquipmentConfig,
    /// Vehicle drivers.
    pub vehicle: VehicleConfig,
    /// Active projections for bulk resources, summed in order.
    pub resource_projections: Vec<ProjectionKind>,
    /// Active projections for parts, summed in order.
    pub part_projections: Vec<ProjectionKind>,
    /// What the value cache holds for bulk resources.
    pub resource_value_caching: ResourceValueCaching,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            demand_bounds: Bounds::default(),
            max_projected_demand: 50_000.0,
            supply_bounds: Bounds::default(),
            resource_weights: BlendWeights::default(),
            part_weights: BlendWeights::default(),
            damping_ratio: 0.5,
            life_support: LifeSupportConfig::default(),
            ice: CouplingConfig::ice(),
            regolith: CouplingConfig::regolith(),
            trade_distance_scale: 1_000.0,
            part_flattening: PartFlattening::default(),
            manufacturing_input_factor: 1.0,
            food_production_input_factor: 0.1,
            construction_input_factor: 2.0,
            eva_suit_parts: vec![
                "eva helmet".to_string(),
                "helmet visor".to_string(),
                "pressure suit".to_string(),
                "coveralls".to_string(),
                "suit heating unit".to_string(),
                "eva gloves".to_string(),
                "eva boots".to_string(),
                "eva pads".to_string(),
                "eva backpack".to_string(),
                "eva antenna".to_string(),
                "eva battery".to_string(),
                "eva radio".to_string(),
            ],
            eva_part_factor: 0.5,
            equipment: EquipmentConfig::default(),
            vehicle: VehicleConfig::default(),
            resource_projections: vec![
                ProjectionKind::Ice,
                ProjectionKind::Regolith,
                ProjectionKind::LifeSupport,
            ],
            part_projections: vec![
                ProjectionKind::Maintenance,
                ProjectionKind::ManufacturingInput,
                ProjectionKind::Construction,
                ProjectionKind::EvaSuitParts,
            ],
            resource_value_caching: ResourceValueCaching::Demand,
        }
    }
}

impl ValuationConfig {
    /// Parse a configuration from a RON string.
    ///
    /// # Errors
    ///
    /// Fails on malformed RON or on values rejected by [`Self::validate`].
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(source).map_err(|e| EconomyError::parse("valuation config", &e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tuning the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Configuration`] for inverted or non-finite
    /// bounds, a negative projected demand cap, or non-finite ratios and
    /// scales.
    pub fn validate(&self) -> Result<()> {
        self.demand_bounds.check("demand_bounds")?;
        self.supply_bounds.check("supply_bounds")?;

        let finite_non_negative = [
            ("max_projected_demand", self.max_projected_demand),
            ("trade_distance_scale", self.trade_distance_scale),
        ];
        for (what, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EconomyError::Configuration(format!(
                    "{what} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.damping_ratio.is_finite() {
            return Err(EconomyError::Configuration(format!(
                "damping_ratio must be finite, got {}",
                self.damping_ratio
            )));
        }
        Ok(())
    }

    /// Whether the named part is an EVA suit component.
    #[must_use]
    pub fn is_eva_suit_part(&self, name: &str) -> bool {
        self.eva_suit_parts
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blend_weights_sum_to_one() {
        let w = BlendWeights::default();
        assert!((w.previous + w.average + w.projected + w.trade - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(0.05, 5_000.0);
        assert!((bounds.clamp(0.0) - 0.05).abs() < f64::EPSILON);
        assert!((bounds.clamp(1e9) - 5_000.0).abs() < f64::EPSILON);
        assert!((bounds.clamp(42.0) - 42.0).abs() < f64::EPSILON);
        assert!((bounds.clamp(f64::NAN) - 0.05).abs() < f64::EPSILON);
        assert!((bounds.clamp(f64::INFINITY) - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_ron_overrides_keep_defaults() {
        let config = ValuationConfig::from_ron_str(
            "ValuationConfig(damping_ratio: 0.25, life_support: (water_value_modifier: 4.0))",
        )
        .expect("valid config");
        assert!((config.damping_ratio - 0.25).abs() < f64::EPSILON);
        assert!((config.life_support.water_value_modifier - 4.0).abs() < f64::EPSILON);
        assert!((config.life_support.floor - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.ice.population_cap, 96);
        assert_eq!(config.resource_projections.len(), 3);
    }

    #[test]
    fn test_bad_ron_is_parse_error() {
        let result = ValuationConfig::from_ron_str("ValuationConfig(damping_ratio: \"half\")");
        assert!(matches!(result, Err(EconomyError::DataParse { .. })));
    }

    #[test]
    fn test_partial_bounds_and_coupling_overrides() {
        let config = ValuationConfig::from_ron_str(
            "ValuationConfig(demand_bounds: (max: 800.0), ice: (modifier: 0.2), regolith: (population_cap: 10))",
        )
        .expect("valid config");
        assert!((config.demand_bounds.min - 0.05).abs() < f64::EPSILON);
        assert!((config.demand_bounds.max - 800.0).abs() < f64::EPSILON);
        assert!((config.ice.modifier - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.ice.driver, "water");
        assert_eq!(config.ice.population_cap, 96);
        assert_eq!(config.regolith.driver, "sand");
        assert_eq!(config.regolith.population_cap, 10);
        assert!((config.regolith.modifier - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result =
            ValuationConfig::from_ron_str("ValuationConfig(demand_bounds: (min: 5000.0, max: 0.05))");
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
        let result = ValuationConfig::from_ron_str("ValuationConfig(supply_bounds: (min: -1.0))");
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
    }

    #[test]
    fn test_negative_projection_cap_rejected() {
        let result = ValuationConfig::from_ron_str("ValuationConfig(max_projected_demand: -1.0)");
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = ValuationConfig::default();
        config.damping_ratio = f64::NAN;
        assert!(config.validate().is_err());
        let mut config = ValuationConfig::default();
        config.demand_bounds.max = f64::INFINITY;
        assert!(config.validate().is_err());
        assert!(ValuationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_clamp_without_panic() {
        let bounds = Bounds::new(10.0, 1.0);
        assert!((bounds.clamp(5.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eva_suit_part_lookup() {
        let config = ValuationConfig::default();
        assert!(config.is_eva_suit_part("EVA Helmet"));
        assert!(!config.is_eva_suit_part("pipe valve"));
    }
}
