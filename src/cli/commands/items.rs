use alu_core::{CommitOutcome, WizardStep};

use crate::cli::commands::parse_position;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::views;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "qty",
            "Set the quantity of the priced item",
            "qty <n> | qty +<n> | qty -<n>",
            cmd_qty,
        ),
        CommandEntry::new("commit", "Add the priced item to the quote", "commit", cmd_commit),
        CommandEntry::new(
            "another",
            "Start the next item, keeping the client",
            "another",
            cmd_another,
        ),
        CommandEntry::new("items", "List the items in the quote", "items", cmd_items),
        CommandEntry::new("edit", "Re-open a quote item from step 1", "edit <n>", cmd_edit),
        CommandEntry::new("remove", "Remove an item from the quote", "remove <n>", cmd_remove),
    ]
}

fn cmd_qty(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: qty <n>".into()))?;
    let invalid = || CommandError::InvalidArguments(format!("invalid quantity `{raw}`"));
    let quantity = if raw.starts_with('+') || raw.starts_with('-') {
        let delta = raw.parse::<i64>().map_err(|_| invalid())?;
        context.session.adjust_item_quantity(delta)?
    } else {
        let quantity = raw.parse::<u32>().map_err(|_| invalid())?;
        context.session.set_item_quantity(quantity)?
    };
    let line_total = context
        .session
        .breakdown()
        .map(|breakdown| breakdown.line_total(quantity))
        .unwrap_or_default();
    io::print_success(format!(
        "Quantity {quantity}, line total {}",
        context.formatters.money(line_total)
    ));
    Ok(())
}

fn cmd_commit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.commit_item()? {
        CommitOutcome::Appended { index } => {
            io::print_success(format!("Item {} added to the quote.", index + 1));
        }
        CommitOutcome::Replaced { index } => {
            io::print_success(format!("Item {} updated.", index + 1));
        }
    }
    views::print_totals(context);
    context.print_hint("`another` configures the next item, `finalize` saves the quote.");
    Ok(())
}

fn cmd_another(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.step() == WizardStep::Summary && !context.session.item_committed() {
        context.print_warning("The priced configuration was not added to the quote.");
    }
    context.session.reset_for_next_item();
    io::print_info(format!(
        "Configuring item {}.",
        context.session.ledger().len() + 1
    ));
    views::print_step(context);
    Ok(())
}

fn cmd_items(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    views::print_items(context);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position = parse_position(args.first(), "edit <n>")?;
    context.session.edit_item(position - 1)?;
    io::print_info(format!(
        "Editing item {position}. Walk through the steps and `commit` to replace it."
    ));
    views::print_step(context);
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position = parse_position(args.first(), "remove <n>")?;
    let label = context
        .session
        .ledger()
        .get(position - 1)
        .map(|item| item.label())
        .ok_or(alu_core::WizardError::ItemNotFound(position - 1))?;
    if !context.confirm(&format!("Remove item {position} ({label})?"))? {
        io::print_info("Nothing removed.");
        return Ok(());
    }
    context.session.remove_item(position - 1)?;
    io::print_success(format!("Removed item {position} ({label})."));
    views::print_totals(context);
    if !context.session.can_finalize() {
        context.print_hint("The quote is empty. Commit an item before `finalize`.");
    }
    Ok(())
}
