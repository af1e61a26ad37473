//! Accessory/series compatibility.

use std::collections::BTreeSet;

use alu_domain::AccessoryQuantities;

use crate::catalog::Catalog;

/// Outcome of reconciling accessory quantities against a series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Accessories that cannot be combined with the series.
    pub forbidden: BTreeSet<String>,
    /// The input quantities minus every forbidden entry.
    pub accessories: AccessoryQuantities,
    /// Previously selected accessories dropped by this pass; callers refresh
    /// their quantity displays and accessory total for these.
    pub removed: Vec<String>,
    series: Option<String>,
}

impl Resolution {
    pub fn has_conflicts(&self) -> bool {
        !self.forbidden.is_empty()
    }

    /// Warning shown next to the accessory list while conflicts exist.
    pub fn warning(&self) -> Option<String> {
        match (&self.series, self.has_conflicts()) {
            (Some(series), true) => Some(format!(
                "Some accessories are not compatible with {series}: {}",
                self.forbidden.iter().cloned().collect::<Vec<_>>().join(", ")
            )),
            _ => None,
        }
    }
}

/// An accessory is forbidden iff its `incompatible_series` equals `series`
/// exactly. Without a series nothing is forbidden.
pub fn resolve(
    series: Option<&str>,
    accessories: &AccessoryQuantities,
    catalog: &Catalog,
) -> Resolution {
    let forbidden: BTreeSet<String> = match series {
        Some(series) => catalog
            .accessories
            .iter()
            .filter(|accessory| accessory.conflicts_with(series))
            .map(|accessory| accessory.name.clone())
            .collect(),
        None => BTreeSet::new(),
    };

    let mut kept = AccessoryQuantities::new();
    let mut removed = Vec::new();
    for (name, quantity) in accessories {
        if forbidden.contains(name) {
            removed.push(name.clone());
        } else if *quantity > 0 {
            kept.insert(name.clone(), *quantity);
        }
    }

    Resolution {
        forbidden,
        accessories: kept,
        removed,
        series: series.map(str::to_string),
    }
}

/// Σ unit price × quantity over selected accessories known to the catalog.
pub fn accessory_total(accessories: &AccessoryQuantities, catalog: &Catalog) -> f64 {
    accessories
        .iter()
        .filter_map(|(name, quantity)| {
            catalog
                .accessory(name)
                .map(|accessory| accessory.unit_price * f64::from(*quantity))
        })
        .sum()
}
