//! Catalog records offered by the wizard steps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{empty_string_as_none, CatalogEntry};

/// Frame family (window, sliding door, ...) with its manufacturable size range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChassisType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl ChassisType {
    pub fn new(name: impl Into<String>, width: (u32, u32), height: (u32, u32)) -> Self {
        Self {
            name: name.into(),
            description: None,
            min_width: width.0,
            max_width: width.1,
            min_height: height.0,
            max_height: height.1,
        }
    }

    pub fn accepts_width(&self, width: u32) -> bool {
        (self.min_width..=self.max_width).contains(&width)
    }

    pub fn accepts_height(&self, height: u32) -> bool {
        (self.min_height..=self.max_height).contains(&height)
    }

    /// Human readable bounds, e.g. `Width 400-2400 mm, height 400-2200 mm`.
    pub fn limits_label(&self) -> String {
        format!(
            "Width {}-{} mm, height {}-{} mm",
            self.min_width, self.max_width, self.min_height, self.max_height
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSeries {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_per_meter: f64,
}

impl ProfileSeries {
    pub fn new(name: impl Into<String>, price_per_meter: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price_per_meter,
        }
    }
}

/// Glass build-up or tint. Build-ups carry a surface price, tints a coefficient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlazingType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_mm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_m2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<f64>,
}

impl GlazingType {
    pub fn new(name: impl Into<String>, price_per_m2: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            thickness_mm: None,
            price_per_m2: Some(price_per_m2),
            coefficient: None,
        }
    }

    pub fn tint(name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            thickness_mm: None,
            price_per_m2: None,
            coefficient: Some(coefficient),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finish {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "price_coefficient", default = "Finish::standard_coefficient")]
    pub coefficient: f64,
}

impl Finish {
    pub fn new(name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            coefficient,
        }
    }

    fn standard_coefficient() -> f64 {
        1.0
    }

    pub fn is_standard(&self) -> bool {
        self.coefficient <= 1.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Accessory {
    pub name: String,
    pub unit_price: f64,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub incompatible_series: Option<String>,
}

impl Accessory {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            incompatible_series: None,
        }
    }

    pub fn incompatible_with(mut self, series: impl Into<String>) -> Self {
        self.incompatible_series = Some(series.into());
        self
    }

    /// Exact name match only; `"Serie 40"` does not conflict with `"Serie 4"`.
    pub fn conflicts_with(&self, series: &str) -> bool {
        self.incompatible_series.as_deref() == Some(series)
    }
}

/// Display label shared by price badges: `Standard` or `+15%`.
pub fn coefficient_badge(coefficient: f64) -> String {
    if coefficient > 1.0 {
        format!("+{:.0}%", (coefficient - 1.0) * 100.0)
    } else {
        "Standard".into()
    }
}

macro_rules! impl_catalog_entry {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CatalogEntry for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.name)
                }
            }
        )+
    };
}

impl_catalog_entry!(ChassisType, ProfileSeries, GlazingType, Finish, Accessory);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_accepts_service_field_name() {
        let finish: Finish =
            serde_json::from_str(r#"{"name":"RAL 9016","price_coefficient":1.15}"#).unwrap();
        assert_eq!(finish.coefficient, 1.15);
        assert_eq!(coefficient_badge(finish.coefficient), "+15%");
    }

    #[test]
    fn blank_incompatible_series_reads_as_none() {
        let accessory: Accessory = serde_json::from_str(
            r#"{"name":"Poignée","unit_price":45.0,"incompatible_series":""}"#,
        )
        .unwrap();
        assert!(accessory.incompatible_series.is_none());
        assert!(!accessory.conflicts_with(""));
    }

    #[test]
    fn conflict_requires_exact_series_name() {
        let accessory = Accessory::new("Rail", 12.0).incompatible_with("Serie 40");
        assert!(accessory.conflicts_with("Serie 40"));
        assert!(!accessory.conflicts_with("Serie 4"));
        assert!(!accessory.conflicts_with("serie 40"));
    }
}
