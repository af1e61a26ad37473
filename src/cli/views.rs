//! Read-only renderings of the session for the shell.

use alu_core::{Catalog, SelectionField, WizardStep};
use alu_domain::{coefficient_badge, CatalogEntry, SelectionState};

use crate::cli::core::ShellContext;
use crate::cli::output::{line, section};
use crate::cli::io;

pub(crate) fn option_names(catalog: &Catalog, field: SelectionField) -> Vec<String> {
    match field {
        SelectionField::ChassisType => names(&catalog.chassis_types),
        SelectionField::ProfileSeries => names(&catalog.profile_series),
        SelectionField::GlazingType => names(&catalog.glazing_types),
        SelectionField::Finish => names(&catalog.finishes),
        _ => Vec::new(),
    }
}

fn names<T: CatalogEntry>(entries: &[T]) -> Vec<String> {
    entries.iter().map(|entry| entry.name().to_string()).collect()
}

pub(crate) fn field_value(selection: &SelectionState, field: SelectionField) -> Option<String> {
    let text = |value: &str| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    match field {
        SelectionField::ChassisType => selection.chassis_type.clone(),
        SelectionField::Width => selection.width.map(|value| value.to_string()),
        SelectionField::Height => selection.height.map(|value| value.to_string()),
        SelectionField::ProfileSeries => selection.profile_series.clone(),
        SelectionField::GlazingType => selection.glazing_type.clone(),
        SelectionField::Finish => selection.finish.clone(),
        SelectionField::ClientName => text(&selection.client_name),
        SelectionField::ClientEmail => text(&selection.client_email),
        SelectionField::ClientPhone => text(&selection.client_phone),
        SelectionField::ClientNotes => text(&selection.client_notes),
    }
}

pub(crate) fn print_welcome(context: &ShellContext) {
    section("Aluminium joinery configurator");
    io::print_info(format!(
        "Backend: {} | Currency: {}",
        context.backend.kind, context.config.currency
    ));
    io::print_info("Type `help` for commands, `status` to see where you are.");
    print_step(context);
}

/// Heading for the current step plus the gate message while it is unmet.
pub(crate) fn print_step(context: &ShellContext) {
    let session = &context.session;
    let step = session.step();
    section(format!(
        "Step {}/{}: {}",
        step.number(),
        WizardStep::COUNT,
        step.title()
    ));
    if let Some(index) = session.ledger().editing_index() {
        io::print_info(format!("Editing item {}", index + 1));
    }
    match step {
        WizardStep::Dimensions => {
            if let Some(chassis) = session
                .selection()
                .chassis_type
                .as_deref()
                .and_then(|name| session.catalog().chassis_type(name))
            {
                context.print_hint(&chassis.limits_label());
            }
        }
        WizardStep::Accessories => print_accessories(context),
        _ => {}
    }
    if let Some(message) = session.pending_message() {
        context.print_hint(&message);
    }
}

pub(crate) fn print_status(context: &ShellContext) {
    let session = &context.session;
    let selection = session.selection();
    print_step(context);

    for field in [
        SelectionField::ChassisType,
        SelectionField::ProfileSeries,
        SelectionField::GlazingType,
        SelectionField::Finish,
        SelectionField::ClientName,
        SelectionField::ClientEmail,
        SelectionField::ClientPhone,
        SelectionField::ClientNotes,
    ] {
        line(format!(
            "  {:<10} {}",
            field.key(),
            field_value(selection, field).unwrap_or_else(|| "-".into())
        ));
    }
    let dimension = |value: Option<u32>| value.map_or("?".to_string(), |mm| mm.to_string());
    line(format!(
        "  {:<10} {} x {} mm",
        "size",
        dimension(selection.width),
        dimension(selection.height)
    ));
    if let (Some(surface), Some(perimeter)) = (selection.surface_m2(), selection.perimeter_m()) {
        line(format!(
            "  {:<10} {} / {}",
            "measures",
            context.formatters.surface(surface),
            context.formatters.length(perimeter)
        ));
    }
    let accessories = if selection.accessories.is_empty() {
        "-".to_string()
    } else {
        selection
            .accessories
            .iter()
            .map(|(name, quantity)| format!("{name} x{quantity}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    line(format!("  {:<10} {}", "extras", accessories));
    if let Some(warning) = session.compatibility_warning() {
        io::print_warning(warning);
    }
    if let Some(breakdown) = session.breakdown() {
        line(format!(
            "  {:<10} {} x {}",
            "priced",
            context.formatters.money(breakdown.total_price),
            session.item_quantity()
        ));
    }
    print_totals(context);
}

pub(crate) fn print_accessories(context: &ShellContext) {
    let session = &context.session;
    section("Accessories");
    if session.catalog().accessories.is_empty() {
        io::print_info("No accessories in the catalog.");
        return;
    }
    for accessory in &session.catalog().accessories {
        let quantity = session.selection().accessory_quantity(&accessory.name);
        let status = if session.is_forbidden(&accessory.name) {
            " (not available with this series)"
        } else {
            ""
        };
        line(format!(
            "  {:<24} {:>12}  x{}{}",
            accessory.name,
            context.formatters.money(accessory.unit_price),
            quantity,
            status
        ));
    }
    if let Some(warning) = session.compatibility_warning() {
        io::print_warning(warning);
    }
    line(format!(
        "  Accessories total: {}",
        context.formatters.money(session.accessory_total())
    ));
}

pub(crate) fn print_summary(context: &ShellContext) {
    let session = &context.session;
    let Some(breakdown) = session.breakdown() else {
        io::print_info("Not priced yet. Run `summary` from the client step.");
        return;
    };
    section("Summary");
    let selection = session.selection();
    line(format!(
        "  {} {}",
        selection.chassis_type.as_deref().unwrap_or("-"),
        match (selection.width, selection.height) {
            (Some(width), Some(height)) => format!("{width} x {height} mm"),
            _ => String::new(),
        }
    ));
    line(format!(
        "  {} / {} / {}",
        selection.profile_series.as_deref().unwrap_or("-"),
        selection.glazing_type.as_deref().unwrap_or("-"),
        selection.finish.as_deref().unwrap_or("-")
    ));
    line(format!("  Client: {}", selection.client_name));
    for (label, amount) in breakdown.display_rows() {
        line(format!(
            "  {:<20} {:>14}",
            label,
            context.formatters.money(amount)
        ));
    }
    line(format!(
        "  Quantity {} -> {}",
        session.item_quantity(),
        context
            .formatters
            .money(breakdown.line_total(session.item_quantity()))
    ));
    if session.item_committed() {
        io::print_info("Added to the quote. `another` starts the next item.");
    } else {
        context.print_hint("`qty <n>` to change the quantity, `commit` to add it to the quote.");
    }
}

pub(crate) fn print_items(context: &ShellContext) {
    let ledger = context.session.ledger();
    section("Quote items");
    if ledger.is_empty() {
        io::print_info("No items yet.");
        return;
    }
    for (index, item) in ledger.items().iter().enumerate() {
        let marker = if ledger.editing_index() == Some(index) {
            " (editing)"
        } else {
            ""
        };
        line(format!(
            "  {}. {:<32} {:>12} x{:<3} {:>14}{}",
            index + 1,
            item.label(),
            context.formatters.money(item.breakdown.total_price),
            item.quantity,
            context.formatters.money(item.line_total()),
            marker
        ));
    }
    print_totals(context);
}

pub(crate) fn print_totals(context: &ShellContext) {
    let totals = context.session.totals();
    if totals.item_count == 0 {
        return;
    }
    line(format!(
        "  Quote: {} items, {} units, total {}",
        totals.item_count,
        totals.unit_count,
        context.formatters.money(totals.total_price)
    ));
}

pub(crate) fn print_catalog(context: &ShellContext) {
    let catalog = context.session.catalog();
    let money = &context.formatters;

    section("Chassis types");
    for chassis in &catalog.chassis_types {
        line(format!("  {:<28} {}", chassis.name, chassis.limits_label()));
    }
    section("Profile series");
    for series in &catalog.profile_series {
        line(format!(
            "  {:<28} {}/m",
            series.name,
            money.money(series.price_per_meter)
        ));
    }
    section("Glazing types");
    for glazing in &catalog.glazing_types {
        let price = match (glazing.price_per_m2, glazing.coefficient) {
            (Some(price), _) => format!("{}/m²", money.money(price)),
            (None, Some(coefficient)) => coefficient_badge(coefficient),
            (None, None) => "-".to_string(),
        };
        line(format!("  {:<28} {}", glazing.name, price));
    }
    section("Finishes");
    for finish in &catalog.finishes {
        line(format!(
            "  {:<28} {}",
            finish.name,
            coefficient_badge(finish.coefficient)
        ));
    }
    section("Accessories");
    for accessory in &catalog.accessories {
        let note = accessory
            .incompatible_series
            .as_deref()
            .map(|series| format!(" (not with {series})"))
            .unwrap_or_default();
        line(format!(
            "  {:<28} {}{}",
            accessory.name,
            money.money(accessory.unit_price),
            note
        ));
    }
}
