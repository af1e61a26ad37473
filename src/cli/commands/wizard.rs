//! Commands that fill in the current configuration and move between steps.

use std::str::FromStr;

use alu_core::{validate_dimensions, AccessoryChange, CalculationOutcome, SelectionField};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::views;

const CHOOSE_USAGE: &str = "choose <chassis|series|glazing|finish> <name>";
const CLIENT_USAGE: &str = "client <name|email|phone|notes> <value>";
const ACC_USAGE: &str = "acc [+|- <name> [count]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show the current step and configuration",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "choose",
            "Pick a catalog option (empty name clears it)",
            CHOOSE_USAGE,
            cmd_choose,
        )
        .with_keywords(&["chassis", "series", "glazing", "finish"]),
        CommandEntry::new("dims", "Set width and height in mm", "dims <width> <height>", cmd_dims),
        CommandEntry::new("client", "Set a client detail", CLIENT_USAGE, cmd_client)
            .with_keywords(&["name", "email", "phone", "notes"]),
        CommandEntry::new(
            "acc",
            "List accessories or change a quantity",
            ACC_USAGE,
            cmd_acc,
        )
        .with_keywords(&["add", "remove"]),
        CommandEntry::new("next", "Go to the next step", "next", cmd_next),
        CommandEntry::new("prev", "Go back one step", "prev", cmd_prev).with_aliases(&["back"]),
        CommandEntry::new(
            "summary",
            "Price the configuration and show the summary",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    views::print_status(context);
    Ok(())
}

fn cmd_choose(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = args
        .first()
        .and_then(|raw| SelectionField::from_str(raw).ok())
        .filter(|field| SelectionField::CATALOG_BACKED.contains(field))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {CHOOSE_USAGE}")))?;

    let value = if args.len() > 1 {
        args[1..].join(" ")
    } else if context.can_prompt() {
        let names = views::option_names(context.session.catalog(), field);
        match io::select_option(&context.theme, &format!("Select {field}"), &names)? {
            Some(index) => names[index].clone(),
            None => return Ok(()),
        }
    } else {
        return Err(CommandError::InvalidArguments(format!("usage: {CHOOSE_USAGE}")));
    };

    let removed = context.session.set_field(field, &value)?;
    match views::field_value(context.session.selection(), field) {
        Some(chosen) => io::print_success(format!("{field} set to {chosen}")),
        None => io::print_info(format!("{field} cleared")),
    }
    if !removed.is_empty() {
        io::print_warning(format!(
            "Removed accessories not available with this series: {}",
            removed.join(", ")
        ));
    }
    if field == SelectionField::ChassisType {
        if let Some(chassis) = context
            .session
            .selection()
            .chassis_type
            .as_deref()
            .and_then(|name| context.session.catalog().chassis_type(name))
        {
            context.print_hint(&chassis.limits_label());
        }
    }
    Ok(())
}

fn cmd_dims(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (width, height) = match args {
        [width, height] => (*width, *height),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: dims <width> <height>".into(),
            ))
        }
    };
    context.session.set_field(SelectionField::Width, width)?;
    context.session.set_field(SelectionField::Height, height)?;

    let selection = context.session.selection();
    if let (Some(surface), Some(perimeter)) = (selection.surface_m2(), selection.perimeter_m()) {
        io::print_info(format!(
            "Surface {}, perimeter {}",
            context.formatters.surface(surface),
            context.formatters.length(perimeter)
        ));
    }
    let chassis = selection
        .chassis_type
        .as_deref()
        .and_then(|name| context.session.catalog().chassis_type(name));
    if let Some(chassis) = chassis {
        if let Err(validation) = validate_dimensions(chassis, selection.width, selection.height) {
            for issue in &validation.issues {
                io::print_warning(&issue.message);
            }
        }
    }
    Ok(())
}

fn cmd_client(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = args
        .first()
        .and_then(|raw| SelectionField::from_str(raw).ok())
        .filter(|field| SelectionField::CLIENT.contains(field))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {CLIENT_USAGE}")))?;
    let value = args[1..].join(" ");
    context.session.set_field(field, &value)?;
    if value.trim().is_empty() {
        io::print_info(format!("Client {field} cleared"));
    } else {
        io::print_success(format!("Client {field} set"));
    }
    Ok(())
}

fn cmd_acc(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        views::print_accessories(context);
        return Ok(());
    }
    let (sign, name, count) = match args {
        [op, name] => (parse_sign(op)?, *name, 1),
        [op, name, count] => {
            let count = count
                .parse::<i64>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("count must be a positive number".into())
                })?;
            (parse_sign(op)?, *name, count)
        }
        _ => return Err(CommandError::InvalidArguments(format!("usage: {ACC_USAGE}"))),
    };

    match context.session.adjust_accessory(name, sign * count)? {
        AccessoryChange::Updated { quantity } => {
            io::print_success(format!("{name}: {quantity}"));
        }
        AccessoryChange::Removed => io::print_info(format!("{name} removed")),
        AccessoryChange::Blocked => io::print_warning(format!(
            "{name} is not available with the selected profile series"
        )),
        AccessoryChange::Unchanged => io::print_info(format!("{name}: no change")),
    }
    io::print_info(format!(
        "Accessories total: {}",
        context.formatters.money(context.session.accessory_total())
    ));
    Ok(())
}

fn parse_sign(op: &str) -> Result<i64, CommandError> {
    match op {
        "+" | "add" => Ok(1),
        "-" | "remove" => Ok(-1),
        _ => Err(CommandError::InvalidArguments(format!("usage: {ACC_USAGE}"))),
    }
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.next()?;
    views::print_step(context);
    Ok(())
}

fn cmd_prev(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.prev()?;
    views::print_step(context);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let pricing = context.backend.services.pricing.clone();
    let outcome = context.runtime.block_on(alu_core::view_summary(
        &mut context.session,
        pricing.as_ref(),
    ))?;
    match outcome {
        CalculationOutcome::Applied => views::print_summary(context),
        CalculationOutcome::Discarded => context.print_warning(
            "The configuration changed while it was being priced. Run `summary` again.",
        ),
    }
    Ok(())
}
