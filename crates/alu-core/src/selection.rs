//! Field-level commands on the in-progress selection.

use std::{fmt, str::FromStr};

use alu_domain::{find_by_name_loose, CatalogEntry, SelectionState};

use crate::{
    catalog::Catalog,
    error::{OptionKind, WizardError},
    wizard::parse_dimension,
};

/// Single-valued fields of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    ChassisType,
    Width,
    Height,
    ProfileSeries,
    GlazingType,
    Finish,
    ClientName,
    ClientEmail,
    ClientPhone,
    ClientNotes,
}

impl SelectionField {
    pub const CATALOG_BACKED: [SelectionField; 4] = [
        SelectionField::ChassisType,
        SelectionField::ProfileSeries,
        SelectionField::GlazingType,
        SelectionField::Finish,
    ];

    pub const CLIENT: [SelectionField; 4] = [
        SelectionField::ClientName,
        SelectionField::ClientEmail,
        SelectionField::ClientPhone,
        SelectionField::ClientNotes,
    ];

    pub fn option_kind(self) -> Option<OptionKind> {
        match self {
            SelectionField::ChassisType => Some(OptionKind::ChassisType),
            SelectionField::ProfileSeries => Some(OptionKind::ProfileSeries),
            SelectionField::GlazingType => Some(OptionKind::GlazingType),
            SelectionField::Finish => Some(OptionKind::Finish),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SelectionField::ChassisType => "chassis",
            SelectionField::Width => "width",
            SelectionField::Height => "height",
            SelectionField::ProfileSeries => "series",
            SelectionField::GlazingType => "glazing",
            SelectionField::Finish => "finish",
            SelectionField::ClientName => "name",
            SelectionField::ClientEmail => "email",
            SelectionField::ClientPhone => "phone",
            SelectionField::ClientNotes => "notes",
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field `{}`", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for SelectionField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value.trim().to_ascii_lowercase().as_str() {
            "chassis" | "chassis_type" | "chassistype" => SelectionField::ChassisType,
            "width" => SelectionField::Width,
            "height" => SelectionField::Height,
            "series" | "profile" | "profile_series" => SelectionField::ProfileSeries,
            "glazing" | "glazing_type" => SelectionField::GlazingType,
            "finish" => SelectionField::Finish,
            "name" | "client_name" => SelectionField::ClientName,
            "email" | "client_email" => SelectionField::ClientEmail,
            "phone" | "client_phone" => SelectionField::ClientPhone,
            "notes" | "client_notes" => SelectionField::ClientNotes,
            other => return Err(UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

/// What an accessory quantity adjustment did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessoryChange {
    Updated { quantity: u32 },
    Removed,
    /// Increase refused: the accessory conflicts with the selected series.
    Blocked,
    Unchanged,
}

/// Writes `value` into `field`. Catalog-backed fields resolve the name
/// case-insensitively and store the catalog's spelling; an empty value clears
/// the field.
pub fn apply_field(
    selection: &mut SelectionState,
    catalog: &Catalog,
    field: SelectionField,
    value: &str,
) -> Result<(), WizardError> {
    let value = value.trim();
    match field {
        SelectionField::ChassisType => {
            selection.chassis_type = resolve_option(&catalog.chassis_types, field, value)?;
        }
        SelectionField::ProfileSeries => {
            selection.profile_series = resolve_option(&catalog.profile_series, field, value)?;
        }
        SelectionField::GlazingType => {
            selection.glazing_type = resolve_option(&catalog.glazing_types, field, value)?;
        }
        SelectionField::Finish => {
            selection.finish = resolve_option(&catalog.finishes, field, value)?;
        }
        SelectionField::Width => selection.width = parse_dimension(value),
        SelectionField::Height => selection.height = parse_dimension(value),
        SelectionField::ClientName => selection.client_name = value.to_string(),
        SelectionField::ClientEmail => selection.client_email = value.to_string(),
        SelectionField::ClientPhone => selection.client_phone = value.to_string(),
        SelectionField::ClientNotes => selection.client_notes = value.to_string(),
    }
    Ok(())
}

fn resolve_option<T: CatalogEntry>(
    entries: &[T],
    field: SelectionField,
    value: &str,
) -> Result<Option<String>, WizardError> {
    if value.is_empty() {
        return Ok(None);
    }
    find_by_name_loose(entries, value)
        .map(|entry| Some(entry.name().to_string()))
        .ok_or_else(|| WizardError::UnknownOption {
            kind: field.option_kind().unwrap_or(OptionKind::Accessory),
            name: value.to_string(),
        })
}

/// Applies `delta` to an accessory quantity, clamping at zero and removing
/// the key when it reaches zero. Increases on a `forbidden` accessory are
/// refused without error.
pub fn adjust_accessory(
    selection: &mut SelectionState,
    name: &str,
    delta: i64,
    forbidden: bool,
) -> AccessoryChange {
    if delta > 0 && forbidden {
        return AccessoryChange::Blocked;
    }
    let current = i64::from(selection.accessory_quantity(name));
    let next = current.saturating_add(delta).clamp(0, i64::from(u32::MAX));
    if next == current {
        return AccessoryChange::Unchanged;
    }
    if next == 0 {
        selection.accessories.remove(name);
        return AccessoryChange::Removed;
    }
    let quantity = u32::try_from(next).unwrap_or(u32::MAX);
    selection.accessories.insert(name.to_string(), quantity);
    AccessoryChange::Updated { quantity }
}
