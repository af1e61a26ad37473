use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

use alu_core::{build_save_payload, ItemLedger};
use alu_domain::{
    Accessory, ChassisType, ConfiguredItem, Finish, GlazingType, PricedBreakdown, ProfileSeries,
    SelectionState,
};
use alu_storage_json::{CatalogFile, JsonCatalog, JsonQuoteStore, StoragePaths};

/// Home directory with a local catalog, no quotes and default config.
pub fn seeded_home() -> TempDir {
    let home = TempDir::new().expect("create temp home");
    JsonCatalog::new(paths(home.path()).catalog_file)
        .save(&CatalogFile {
            chassis_types: vec![
                ChassisType::new("Fenêtre", (400, 2400), (300, 2200)),
                ChassisType::new("Porte", (700, 1200), (1900, 2500)),
            ],
            profile_series: vec![
                ProfileSeries::new("Serie 40", 85.0),
                ProfileSeries::new("Serie 60", 110.0),
            ],
            glazing_types: vec![GlazingType::new("Double 4/16/4", 320.0)],
            finishes: vec![Finish::new("Brut", 1.0), Finish::new("Laqué RAL", 1.15)],
            accessories: vec![
                Accessory::new("Poignée", 40.0),
                Accessory::new("Rail", 25.0).incompatible_with("Serie 60"),
            ],
        })
        .expect("seed catalog");
    home
}

pub fn paths(home: &Path) -> StoragePaths {
    StoragePaths::under(&home.join("data"))
}

/// Stores a two-item quote (100 x 2 + 250 x 1) and returns its id.
pub fn seed_quote(home: &Path) -> i64 {
    let mut selection = SelectionState::new();
    selection.chassis_type = Some("Fenêtre".into());
    selection.width = Some(1200);
    selection.height = Some(1000);
    selection.profile_series = Some("Serie 40".into());
    selection.glazing_type = Some("Double 4/16/4".into());
    selection.finish = Some("Brut".into());
    selection.accessories.insert("Poignée".into(), 1);
    selection.client_name = "Atelier Benali".into();
    let ledger = ItemLedger::from_items(vec![
        ConfiguredItem::new(selection.clone(), PricedBreakdown::with_total(100.0), 2),
        ConfiguredItem::new(selection, PricedBreakdown::with_total(250.0), 1),
    ]);
    JsonQuoteStore::new(paths(home).quotes_file)
        .save_payload(&build_save_payload(&ledger).expect("payload"))
        .expect("seed quote")
        .quote_id
}

/// The CLI binary in script mode, isolated under `home`.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("alu_configurator_cli").expect("binary");
    cmd.env("ALU_CONFIGURATOR_CLI_SCRIPT", "1")
        .env("ALU_CONFIGURATOR_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}
