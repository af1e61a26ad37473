//! Step sequence and per-step gates.
//!
//! Gating is data: [`STEPS`] maps every step to its predicate, so adding or
//! reordering steps only touches the table.

use std::fmt;

use alu_domain::{ChassisType, SelectionState};

use crate::{
    catalog::Catalog,
    error::{Field, FieldIssue, ValidationError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    ChassisType,
    Dimensions,
    ProfileSeries,
    Glazing,
    Accessories,
    Finish,
    Client,
    Summary,
}

/// Predicate that must hold before leaving a step forwards.
pub type StepGate = fn(&SelectionState, &Catalog) -> Result<(), ValidationError>;

pub struct StepDefinition {
    pub step: WizardStep,
    pub title: &'static str,
    /// `None` for the terminal step, which is left by committing, not by `next`.
    pub gate: Option<StepGate>,
}

pub const STEPS: [StepDefinition; 8] = [
    StepDefinition {
        step: WizardStep::ChassisType,
        title: "Chassis type",
        gate: Some(chassis_chosen),
    },
    StepDefinition {
        step: WizardStep::Dimensions,
        title: "Dimensions",
        gate: Some(dimensions_within_bounds),
    },
    StepDefinition {
        step: WizardStep::ProfileSeries,
        title: "Profile series",
        gate: Some(series_chosen),
    },
    StepDefinition {
        step: WizardStep::Glazing,
        title: "Glazing",
        gate: Some(glazing_chosen),
    },
    StepDefinition {
        step: WizardStep::Accessories,
        title: "Accessories",
        gate: Some(always_open),
    },
    StepDefinition {
        step: WizardStep::Finish,
        title: "Finish",
        gate: Some(finish_chosen),
    },
    StepDefinition {
        step: WizardStep::Client,
        title: "Client",
        gate: Some(client_named),
    },
    StepDefinition {
        step: WizardStep::Summary,
        title: "Summary",
        gate: None,
    },
];

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::ChassisType;
    pub const COUNT: usize = STEPS.len();

    fn index(self) -> usize {
        self as usize
    }

    /// 1-based position, as shown to the operator.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| STEPS.get(index))
            .map(|definition| definition.step)
    }

    pub fn definition(self) -> &'static StepDefinition {
        &STEPS[self.index()]
    }

    pub fn title(self) -> &'static str {
        self.definition().title
    }

    pub fn following(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn preceding(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Evaluates this step's gate. The terminal step has none and always passes.
    pub fn check(self, selection: &SelectionState, catalog: &Catalog) -> Result<(), ValidationError> {
        match self.definition().gate {
            Some(gate) => gate(selection, catalog),
            None => Ok(()),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Width and height must both be present and inside the chassis type's bounds.
pub fn validate_dimensions(
    chassis: &ChassisType,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    if !width.is_some_and(|value| chassis.accepts_width(value)) {
        issues.push(FieldIssue {
            field: Field::Width,
            message: format!(
                "Width must be between {} and {} mm",
                chassis.min_width, chassis.max_width
            ),
        });
    }
    if !height.is_some_and(|value| chassis.accepts_height(value)) {
        issues.push(FieldIssue {
            field: Field::Height,
            message: format!(
                "Height must be between {} and {} mm",
                chassis.min_height, chassis.max_height
            ),
        });
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::from_issues(issues))
    }
}

/// Reads a millimetre value typed by the operator. Anything that is not a
/// whole number reads as absent and fails the dimensions gate.
pub fn parse_dimension(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

fn chassis_chosen(selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    require(selection.chassis_type.is_some(), Field::ChassisType, "Select a chassis type")
}

fn dimensions_within_bounds(
    selection: &SelectionState,
    catalog: &Catalog,
) -> Result<(), ValidationError> {
    let chassis = selection
        .chassis_type
        .as_deref()
        .and_then(|name| catalog.chassis_type(name))
        .ok_or_else(|| {
            ValidationError::new(
                Field::ChassisType,
                "Select a chassis type before entering dimensions",
            )
        })?;
    validate_dimensions(chassis, selection.width, selection.height)
}

fn series_chosen(selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    require(
        selection.profile_series.is_some(),
        Field::ProfileSeries,
        "Select a profile series",
    )
}

fn glazing_chosen(selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    require(
        selection.glazing_type.is_some(),
        Field::GlazingType,
        "Select a glazing type",
    )
}

fn always_open(_selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    Ok(())
}

fn finish_chosen(selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    require(selection.finish.is_some(), Field::Finish, "Select a finish")
}

fn client_named(selection: &SelectionState, _catalog: &Catalog) -> Result<(), ValidationError> {
    require(selection.has_client_name(), Field::ClientName, "Enter the client name")
}

fn require(holds: bool, field: Field, message: &str) -> Result<(), ValidationError> {
    if holds {
        Ok(())
    } else {
        Err(ValidationError::new(field, message))
    }
}
