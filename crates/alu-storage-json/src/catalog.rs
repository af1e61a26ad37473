use std::{fs, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use alu_core::CatalogProvider;
use alu_domain::{Accessory, ChassisType, Finish, GlazingType, ProfileSeries};

use crate::{write_json, StorageError};

/// On-disk layout of `catalog.json`. Missing sets read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogFile {
    #[serde(default)]
    pub chassis_types: Vec<ChassisType>,
    #[serde(default)]
    pub profile_series: Vec<ProfileSeries>,
    #[serde(default)]
    pub glazing_types: Vec<GlazingType>,
    #[serde(default)]
    pub finishes: Vec<Finish>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
}

/// Catalog provider reading a single JSON file. The file is re-read on every
/// call so edits show up in the next session.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<CatalogFile, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::NotFound(format!(
                "catalog file `{}`",
                self.path.display()
            )));
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, catalog: &CatalogFile) -> Result<(), StorageError> {
        write_json(&self.path, catalog)
    }

    fn read_set<T>(&self, pick: impl FnOnce(CatalogFile) -> Vec<T>) -> Result<Vec<T>, String> {
        self.load().map(pick).map_err(|err| err.to_string())
    }
}

#[async_trait]
impl CatalogProvider for JsonCatalog {
    async fn chassis_types(&self) -> Result<Vec<ChassisType>, String> {
        self.read_set(|file| file.chassis_types)
    }

    async fn profile_series(&self) -> Result<Vec<ProfileSeries>, String> {
        self.read_set(|file| file.profile_series)
    }

    async fn glazing_types(&self) -> Result<Vec<GlazingType>, String> {
        self.read_set(|file| file.glazing_types)
    }

    async fn finishes(&self) -> Result<Vec<Finish>, String> {
        self.read_set(|file| file.finishes)
    }

    async fn accessories(&self) -> Result<Vec<Accessory>, String> {
        self.read_set(|file| file.accessories)
    }
}
