//! The goods catalog and its build-once registry.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use super::good::{Good, GoodKind};
use super::{normalize_name, GoodCategory, GoodId};
use crate::data::{CatalogData, ProcessCatalog};
use crate::error::{EconomyError, Result};

/// Immutable universe of tradeable goods, keyed by stable id.
#[derive(Debug, Clone, Default)]
pub struct GoodCatalog {
    goods: BTreeMap<GoodId, Good>,
    by_name: HashMap<String, GoodId>,
}

impl GoodCatalog {
    /// Build the catalog from upstream data and run the cost pass.
    ///
    /// Populates bulk resources, discrete items, equipment and vehicles in
    /// that order, then computes the output cost of every entry.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Configuration`] on blank names, ids outside
    /// their category range, duplicate ids or names, or process entries
    /// naming goods that do not exist.
    pub fn build(data: &CatalogData, processes: &ProcessCatalog) -> Result<Self> {
        let mut catalog = Self::default();

        for resource in &data.resources {
            let kind = GoodKind::Resource {
                kind: resource.kind,
                phase: resource.phase,
                edible: resource.edible,
                life_support: resource.life_support,
            };
            catalog.insert(Good::new(GoodId(resource.id), &resource.name, kind, 1.0)?)?;
        }
        for part in &data.parts {
            catalog.insert(Good::new(GoodId(part.id), &part.name, GoodKind::Part, part.mass)?)?;
        }
        for equipment in &data.equipment {
            let kind = GoodKind::Equipment(equipment.kind);
            catalog.insert(Good::new(GoodId(equipment.id), &equipment.name, kind, equipment.mass)?)?;
        }
        for vehicle in &data.vehicles {
            let kind = GoodKind::Vehicle(vehicle.class);
            catalog.insert(Good::new(GoodId(vehicle.id), &vehicle.name, kind, vehicle.mass)?)?;
        }

        if let Some(unknown) = processes
            .mentioned_names()
            .find(|name| !catalog.by_name.contains_key(&normalize_name(name)))
        {
            return Err(EconomyError::Configuration(format!(
                "process catalog names unknown good '{unknown}'"
            )));
        }

        for good in catalog.goods.values() {
            good.compute_output_cost(processes, |name| catalog.mass_of(name));
        }

        tracing::info!(goods = catalog.goods.len(), "Goods catalog built");
        Ok(catalog)
    }

    fn insert(&mut self, good: Good) -> Result<()> {
        if self.goods.contains_key(&good.id()) {
            return Err(EconomyError::Configuration(format!(
                "duplicate good id {}",
                good.id()
            )));
        }
        if self.by_name.contains_key(good.name()) {
            return Err(EconomyError::Configuration(format!(
                "duplicate good name '{}'",
                good.name()
            )));
        }
        self.by_name.insert(good.name().to_string(), good.id());
        self.goods.insert(good.id(), good);
        Ok(())
    }

    /// Look up a good by id.
    pub fn get(&self, id: GoodId) -> Result<&Good> {
        self.goods.get(&id).ok_or(EconomyError::GoodNotFound(id))
    }

    /// Look up a good by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Result<&Good> {
        self.id_of(name)
            .and_then(|id| self.goods.get(&id))
            .ok_or_else(|| EconomyError::NameNotFound(name.to_string()))
    }

    /// Id of the named good, if it exists.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<GoodId> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    /// Look up a bulk resource by name.
    pub fn lookup_by_resource(&self, name: &str) -> Result<&Good> {
        self.by_name(name)
            .ok()
            .filter(|g| g.category() == GoodCategory::BulkResource)
            .ok_or_else(|| EconomyError::NameNotFound(name.to_string()))
    }

    /// Look up a vehicle good by vehicle type name.
    pub fn lookup_by_vehicle_name(&self, name: &str) -> Result<&Good> {
        self.by_name(name)
            .ok()
            .filter(|g| g.category() == GoodCategory::Vehicle)
            .ok_or_else(|| EconomyError::NameNotFound(name.to_string()))
    }

    /// Unit mass of the named good.
    #[must_use]
    pub fn mass_of(&self, name: &str) -> Option<f64> {
        self.by_name(name).ok().map(Good::unit_mass)
    }

    /// All goods in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Good> {
        self.goods.values()
    }

    /// All goods of a category in id order.
    pub fn of_category(&self, category: GoodCategory) -> impl Iterator<Item = &Good> {
        self.goods.values().filter(move |g| g.category() == category)
    }

    /// Number of goods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.goods.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goods.is_empty()
    }
}

/// Build-once holder of the goods catalog for one simulation instance.
///
/// The first caller of [`GoodsRegistry::populate`] builds the catalog under a
/// write lock; concurrent callers wait and then observe the finished result.
/// Nobody ever sees a half-built catalog.
#[derive(Debug)]
pub struct GoodsRegistry {
    data: Arc<CatalogData>,
    processes: Arc<ProcessCatalog>,
    built: RwLock<Option<Arc<GoodCatalog>>>,
}

impl GoodsRegistry {
    /// Create an unpopulated registry over the upstream catalogs.
    #[must_use]
    pub fn new(data: Arc<CatalogData>, processes: Arc<ProcessCatalog>) -> Self {
        Self {
            data,
            processes,
            built: RwLock::new(None),
        }
    }

    /// Build the catalog if needed and return it.
    ///
    /// Idempotent: only the first call does any work.
    pub fn populate(&self) -> Result<Arc<GoodCatalog>> {
        if let Some(catalog) = self
            .built
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(catalog));
        }

        let mut slot = self.built.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = slot.as_ref() {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(GoodCatalog::build(&self.data, &self.processes)?);
        *slot = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Whether the catalog has been built.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.built
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the built catalog. The next lookup rebuilds it.
    pub fn destroy(&self) {
        let mut slot = self.built.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::info!("Goods catalog destroyed");
        }
    }

    /// Look up a good by id, building the catalog first if needed.
    pub fn lookup(&self, id: GoodId) -> Result<Good> {
        self.populate()?.get(id).cloned()
    }

    /// Look up a good by name, building the catalog first if needed.
    pub fn lookup_by_name(&self, name: &str) -> Result<Good> {
        self.populate()?.by_name(name).cloned()
    }

    /// Look up a bulk resource by name.
    pub fn lookup_by_resource(&self, name: &str) -> Result<Good> {
        self.populate()?.lookup_by_resource(name).cloned()
    }

    /// Look up a vehicle good by vehicle type name.
    pub fn lookup_by_vehicle_name(&self, name: &str) -> Result<Good> {
        self.populate()?.lookup_by_vehicle_name(name).cloned()
    }

    /// Upstream catalog data.
    #[must_use]
    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    /// Production process catalogs.
    #[must_use]
    pub fn processes(&self) -> &ProcessCatalog {
        &self.processes
    }
}
