//! Small catalog shared by the valuation unit tests.

use crate::config::ValuationConfig;
use crate::context::SimulationContext;
use crate::data::{
    CatalogData, ConstructionStageData, EquipmentData, EquipmentKind, PartData, Phase,
    ProcessCatalog, ProcessData, ProcessItem, ResourceData, ResourceKind, VehicleClass,
    VehicleData,
};
use crate::goods::GoodId;
use crate::math::Coordinates;
use crate::settlement::{Job, SettlementSnapshot};

fn resource(id: u32, name: &str, phase: Phase, kind: ResourceKind, life_support: bool) -> ResourceData {
    ResourceData {
        id,
        name: name.to_string(),
        phase,
        kind,
        edible: false,
        life_support,
    }
}

fn part(id: u32, name: &str, mass: f64) -> PartData {
    PartData {
        id,
        name: name.to_string(),
        mass,
    }
}

fn vehicle(id: u32, name: &str, class: VehicleClass, crew: u32, cargo: f64, lab: bool) -> VehicleData {
    VehicleData {
        id,
        name: name.to_string(),
        class,
        crew_capacity: crew,
        cargo_capacity: cargo,
        has_lab: lab,
        base_speed: 30.0,
        drivetrain_efficiency: 3.0,
        mass: 3_000.0,
    }
}

pub(crate) fn catalog_data() -> CatalogData {
    CatalogData {
        resources: vec![
            resource(1, "water", Phase::Liquid, ResourceKind::Compound, true),
            resource(2, "oxygen", Phase::Gas, ResourceKind::Element, true),
            resource(3, "ice", Phase::Solid, ResourceKind::Standard, false),
            resource(4, "sand", Phase::Solid, ResourceKind::Mineral, false),
            resource(5, "regolith", Phase::Solid, ResourceKind::Regolith, false),
            resource(6, "hematite", Phase::Solid, ResourceKind::Mineral, false),
            resource(7, "food", Phase::Solid, ResourceKind::Derived, false),
            resource(8, "iron powder", Phase::Solid, ResourceKind::Element, false),
        ],
        parts: vec![
            part(1000, "pipe valve", 2.0),
            part(1001, "iron ingot", 5.0),
            part(1002, "eva helmet", 3.0),
            part(1003, "pressure suit", 4.0),
            part(1004, "oven", 20.0),
        ],
        equipment: vec![
            EquipmentData {
                id: 3000,
                name: "eva suit".to_string(),
                kind: EquipmentKind::EvaSuit,
                mass: 45.0,
                capacity: 0.0,
                phase: None,
            },
            EquipmentData {
                id: 3001,
                name: "barrel".to_string(),
                kind: EquipmentKind::Barrel,
                mass: 1.0,
                capacity: 100.0,
                phase: Some(Phase::Liquid),
            },
            EquipmentData {
                id: 3002,
                name: "bag".to_string(),
                kind: EquipmentKind::Bag,
                mass: 0.1,
                capacity: 50.0,
                phase: Some(Phase::Solid),
            },
        ],
        vehicles: vec![
            vehicle(2000, "cargo rover", VehicleClass::CargoRover, 2, 10_000.0, false),
            vehicle(2001, "explorer rover", VehicleClass::ExplorerRover, 4, 2_000.0, true),
            vehicle(2002, "light utility vehicle", VehicleClass::LightUtility, 1, 500.0, false),
            vehicle(2003, "delivery drone", VehicleClass::Drone, 0, 100.0, false),
        ],
    }
}

pub(crate) fn processes() -> ProcessCatalog {
    ProcessCatalog {
        manufacturing: vec![
            ProcessData {
                name: "make pipe valve".to_string(),
                inputs: vec![ProcessItem::new("iron ingot", 1.0)],
                outputs: vec![ProcessItem::new("pipe valve", 2.0)],
                labor_time: 50.0,
                power: 0.5,
                process_time: 100.0,
                skill_level: 1,
                tech_level: 1,
            },
            ProcessData {
                name: "cast iron ingot".to_string(),
                inputs: vec![ProcessItem::new("iron powder", 10.0)],
                outputs: vec![ProcessItem::new("iron ingot", 2.0)],
                labor_time: 20.0,
                power: 1.0,
                process_time: 200.0,
                skill_level: 1,
                tech_level: 2,
            },
        ],
        food_production: vec![ProcessData {
            name: "package food".to_string(),
            inputs: vec![ProcessItem::new("water", 1.0)],
            outputs: vec![ProcessItem::new("food", 1.0)],
            labor_time: 10.0,
            power: 0.1,
            process_time: 30.0,
            skill_level: 0,
            tech_level: 0,
        }],
        construction_stages: vec![ConstructionStageData {
            name: "lander hab frame".to_string(),
            inputs: vec![
                ProcessItem::new("pipe valve", 6.0),
                ProcessItem::new("sand", 400.0),
            ],
        }],
    }
}

pub(crate) fn context() -> SimulationContext {
    SimulationContext::new(ValuationConfig::default(), catalog_data(), processes())
        .expect("fixture catalog is valid")
}

pub(crate) fn settlement() -> SettlementSnapshot {
    SettlementSnapshot::new(1, "Base One", Coordinates::new(0.0, 0.0), 4)
        .with_job(Job::Areologist, 1)
        .with_job(Job::Engineer, 1)
        .with_job(Job::Trader, 1)
        .with_job(Job::Pilot, 1)
        .with_stored(GoodId(1), 0.0)
        .with_stored(GoodId(3), 50.0)
        .with_vehicles("cargo rover", 1)
}
