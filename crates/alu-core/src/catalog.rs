//! Immutable per-session snapshot of the selectable option sets.

use futures::{try_join, FutureExt};
use tracing::{debug, info};

use alu_domain::{
    find_by_name, Accessory, ChassisType, Finish, GlazingType, ProfileSeries,
};

use crate::{
    collaborators::CatalogProvider,
    error::{CatalogLoadError, CatalogSet},
};

/// All five option sets, loaded together. There are no mutation methods: a
/// catalog edited elsewhere takes effect in the next session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub chassis_types: Vec<ChassisType>,
    pub profile_series: Vec<ProfileSeries>,
    pub glazing_types: Vec<GlazingType>,
    pub finishes: Vec<Finish>,
    pub accessories: Vec<Accessory>,
}

impl Catalog {
    pub fn new(
        chassis_types: Vec<ChassisType>,
        profile_series: Vec<ProfileSeries>,
        glazing_types: Vec<GlazingType>,
        finishes: Vec<Finish>,
        accessories: Vec<Accessory>,
    ) -> Self {
        Self {
            chassis_types,
            profile_series,
            glazing_types,
            finishes,
            accessories,
        }
    }

    pub fn chassis_type(&self, name: &str) -> Option<&ChassisType> {
        find_by_name(&self.chassis_types, name)
    }

    pub fn series(&self, name: &str) -> Option<&ProfileSeries> {
        find_by_name(&self.profile_series, name)
    }

    pub fn glazing(&self, name: &str) -> Option<&GlazingType> {
        find_by_name(&self.glazing_types, name)
    }

    pub fn finish(&self, name: &str) -> Option<&Finish> {
        find_by_name(&self.finishes, name)
    }

    pub fn accessory(&self, name: &str) -> Option<&Accessory> {
        find_by_name(&self.accessories, name)
    }

    pub fn is_empty(&self) -> bool {
        self.chassis_types.is_empty()
            && self.profile_series.is_empty()
            && self.glazing_types.is_empty()
            && self.finishes.is_empty()
            && self.accessories.is_empty()
    }
}

/// Fetches the five sets concurrently. Any single failure fails the whole
/// load; no partial catalog is returned.
pub async fn load_catalog(provider: &dyn CatalogProvider) -> Result<Catalog, CatalogLoadError> {
    debug!("loading catalog");
    let failed = |set: CatalogSet| move |message: String| CatalogLoadError { set, message };

    let (chassis_types, profile_series, glazing_types, finishes, accessories) = try_join!(
        provider
            .chassis_types()
            .map(|res| res.map_err(failed(CatalogSet::ChassisTypes))),
        provider
            .profile_series()
            .map(|res| res.map_err(failed(CatalogSet::ProfileSeries))),
        provider
            .glazing_types()
            .map(|res| res.map_err(failed(CatalogSet::GlazingTypes))),
        provider
            .finishes()
            .map(|res| res.map_err(failed(CatalogSet::Finishes))),
        provider
            .accessories()
            .map(|res| res.map_err(failed(CatalogSet::Accessories))),
    )?;

    let catalog = Catalog::new(
        chassis_types,
        profile_series,
        glazing_types,
        finishes,
        accessories,
    );
    info!(
        chassis_types = catalog.chassis_types.len(),
        profile_series = catalog.profile_series.len(),
        glazing_types = catalog.glazing_types.len(),
        finishes = catalog.finishes.len(),
        accessories = catalog.accessories.len(),
        "catalog loaded"
    );
    Ok(catalog)
}
