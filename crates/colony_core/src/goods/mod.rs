//! Tradeable goods: identifiers, categories, descriptors and the catalog.
//!
//! Good identifiers are partitioned into contiguous, non-overlapping ranges
//! so the broad kind of a good can be read off its id alone:
//!
//! | Range             | Kind            |
//! |-------------------|-----------------|
//! | `1..1000`         | bulk resources  |
//! | `1000..2000`      | discrete items  |
//! | `2000..3000`      | vehicles        |
//! | `3000..4000`      | equipment       |

mod catalog;
mod good;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{GoodCatalog, GoodsRegistry};
pub use good::{CostFactors, Good, GoodCost, GoodKind};

/// First id of the bulk resource range.
pub const RESOURCE_ID_START: u32 = 1;
/// First id of the discrete item range.
pub const ITEM_ID_START: u32 = 1_000;
/// First id of the vehicle range.
pub const VEHICLE_ID_START: u32 = 2_000;
/// First id of the equipment range.
pub const EQUIPMENT_ID_START: u32 = 3_000;
/// One past the last valid good id.
pub const GOOD_ID_END: u32 = 4_000;

/// Stable identifier of a tradeable good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoodId(pub u32);

impl GoodId {
    /// Create a new good id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The id range this id falls in, if any.
    #[must_use]
    pub const fn range(self) -> Option<IdRange> {
        match self.0 {
            RESOURCE_ID_START..ITEM_ID_START => Some(IdRange::Resource),
            ITEM_ID_START..VEHICLE_ID_START => Some(IdRange::Item),
            VEHICLE_ID_START..EQUIPMENT_ID_START => Some(IdRange::Vehicle),
            EQUIPMENT_ID_START..GOOD_ID_END => Some(IdRange::Equipment),
            _ => None,
        }
    }
}

impl fmt::Display for GoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The id partition a good belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdRange {
    /// Bulk resources.
    Resource,
    /// Discrete items (parts).
    Item,
    /// Vehicles.
    Vehicle,
    /// Equipment and containers.
    Equipment,
}

/// Valuation category of a good.
///
/// Each variant has its own recomputation algorithm in the valuation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoodCategory {
    /// Continuously divisible good measured by mass.
    BulkResource,
    /// Countable part.
    DiscreteItem,
    /// Wearable or tool equipment (EVA suits).
    Equipment,
    /// Storage container equipment.
    Container,
    /// Rover, light utility vehicle or drone.
    Vehicle,
}

impl GoodCategory {
    /// The id range goods of this category must be allocated from.
    #[must_use]
    pub const fn id_range(self) -> IdRange {
        match self {
            Self::BulkResource => IdRange::Resource,
            Self::DiscreteItem => IdRange::Item,
            Self::Vehicle => IdRange::Vehicle,
            Self::Equipment | Self::Container => IdRange::Equipment,
        }
    }

    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BulkResource => "resource",
            Self::DiscreteItem => "part",
            Self::Equipment => "equipment",
            Self::Container => "container",
            Self::Vehicle => "vehicle",
        }
    }
}

/// Normalize a good name: trimmed and lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
