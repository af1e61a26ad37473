//! Saving the quote, reopening stored quotes, and starting over.

use std::fs;

use tracing::warn;

use alu_config::BackendKind;
use alu_core::{finalize, open_quote_for_edit, FinalizeError, FinalizedQuote};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::cli::views;

const QUOTE_USAGE: &str = "quote list | quote edit <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "finalize",
            "Save the quote and produce its document",
            "finalize",
            cmd_finalize,
        ),
        CommandEntry::new("quote", "List or re-open saved quotes", QUOTE_USAGE, cmd_quote)
            .with_keywords(&["list", "edit"]),
        CommandEntry::new(
            "reset",
            "Drop everything and start a new session",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_finalize(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.session.totals();
    if context.session.can_finalize()
        && !context.confirm(&format!(
            "Save quote with {} items for {}?",
            totals.item_count,
            context.formatters.money(totals.total_price)
        ))?
    {
        io::print_info("Quote not saved.");
        return Ok(());
    }

    let services = context.backend.services.clone();
    let result = context.runtime.block_on(finalize(
        &context.session,
        services.quotes.as_ref(),
        services.documents.as_ref(),
    ));
    match result {
        Ok(finalized) => {
            io::print_success(format!(
                "Quote {} saved (id {}): {} items, total {}.",
                finalized.saved.quote_number,
                finalized.saved.quote_id,
                finalized.item_count,
                context.formatters.money(finalized.total_price)
            ));
            report_document(context, &finalized);
            context.session.reset();
            Ok(())
        }
        Err(err @ FinalizeError::Document { .. }) => {
            // Already stored; only the document is missing.
            context.session.reset();
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn report_document(context: &ShellContext, finalized: &FinalizedQuote) {
    let quote_id = finalized.saved.quote_id;
    match (context.backend.kind, &context.backend.data_dir) {
        (BackendKind::Local, Some(data_dir)) => {
            let path = data_dir
                .join(alu_storage_json::DOCUMENTS_DIR)
                .join(format!("devis_{quote_id}.txt"));
            io::print_info(format!("Document written to {}", path.display()));
        }
        _ => {
            let dir = context.home.join(alu_storage_json::DOCUMENTS_DIR);
            let path = dir.join(format!("devis_{quote_id}.pdf"));
            match fs::create_dir_all(&dir).and_then(|_| fs::write(&path, &finalized.document)) {
                Ok(()) => io::print_info(format!("Document saved to {}", path.display())),
                Err(err) => {
                    warn!(quote_id, error = %err, "could not store quote document");
                    io::print_warning(format!("Could not store the document: {err}"));
                }
            }
        }
    }
}

fn cmd_quote(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["list"] => list_quotes(context),
        ["edit", id] => {
            let quote_id = id.parse::<i64>().map_err(|_| {
                CommandError::InvalidArguments(format!("invalid quote id `{id}`"))
            })?;
            edit_quote(context, quote_id)
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {QUOTE_USAGE}"))),
    }
}

fn list_quotes(context: &mut ShellContext) -> CommandResult {
    let book = context.backend.quote_book.as_ref().ok_or_else(|| {
        CommandError::Message("Quote listing is only available with the local backend.".into())
    })?;
    let quotes = book.list()?;
    section("Saved quotes");
    if quotes.is_empty() {
        io::print_info("No saved quotes.");
        return Ok(());
    }
    for quote in quotes {
        line(format!(
            "  {:>4}  {:<18} {:<12} {:<24} {:>3} items {:>14}",
            quote.id,
            quote.quote_number,
            quote.quote_date,
            quote.client_name,
            quote.item_count,
            context.formatters.money(quote.total_price)
        ));
    }
    Ok(())
}

fn edit_quote(context: &mut ShellContext, quote_id: i64) -> CommandResult {
    if !context.session.ledger().is_empty()
        && !context.confirm("Discard the current quote and open the saved one?")?
    {
        return Ok(());
    }
    let quotes = context.backend.services.quotes.clone();
    context.runtime.block_on(open_quote_for_edit(
        &mut context.session,
        quotes.as_ref(),
        quote_id,
    ))?;
    io::print_success(format!(
        "Loaded quote {quote_id}: {} items.",
        context.session.ledger().len()
    ));
    views::print_items(context);
    views::print_step(context);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.session.ledger().is_empty()
        && !context.confirm("Discard the current quote and start over?")?
    {
        return Ok(());
    }
    context.start_new_session()?;
    io::print_success("New session started.");
    views::print_step(context);
    Ok(())
}
