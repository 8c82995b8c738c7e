use std::io::Write;

use engine::{Engine, ErrorKind};
use tokio_util::sync::CancellationToken;

use crate::{
    args::{AddArgs, Command, DeleteArgs},
    render,
};

const ADD_USAGE: &str = "Please provide description and amount. Example: add -desc 'Lunch' -amount 50";
const DELETE_USAGE: &str = "Usage: delete -id 1";

/// Run one subcommand, printing the outcome to `out`.
///
/// Failures are reported as text, never as an error: only a broken `out` is.
pub async fn run(
    engine: &Engine,
    command: Command,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match command {
        Command::Add(args) => add(engine, args, cancel, out).await,
        Command::List => list(engine, cancel, out).await,
        Command::Delete(args) => delete(engine, args, cancel, out).await,
    }
}

async fn add(
    engine: &Engine,
    args: AddArgs,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> std::io::Result<()> {
    // A zero amount cannot be told apart from a missing one.
    let amount = args.amount.unwrap_or_default();
    if args.desc.is_empty() || amount == 0.0 {
        return writeln!(out, "{ADD_USAGE}");
    }

    match engine
        .register_expense(&args.desc, amount, &args.cat, cancel)
        .await
    {
        Ok(expense) => writeln!(out, "Expense added successfully! ID: {}", expense.id),
        Err(err) if err.kind() == ErrorKind::Validation => writeln!(out, "{err}"),
        Err(err) => writeln!(out, "Error saving data: {err}"),
    }
}

async fn list(
    engine: &Engine,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match engine.list_expenses(cancel).await {
        Ok(expenses) => write!(out, "{}", render::expense_table(&expenses)),
        Err(err) => writeln!(out, "Error loading data: {err}"),
    }
}

async fn delete(
    engine: &Engine,
    args: DeleteArgs,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> std::io::Result<()> {
    // Same zero-as-unset rule as `add`.
    let id = args.id.unwrap_or_default();
    if id == 0 {
        return writeln!(out, "{DELETE_USAGE}");
    }

    match engine.remove_expense(id, cancel).await {
        Ok(()) => writeln!(out, "Expense deleted successfully! ID: {id}"),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            writeln!(out, "Expense with ID {id} not found")
        }
        Err(err) => writeln!(out, "Error saving data: {err}"),
    }
}
