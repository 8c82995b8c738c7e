use std::{ffi::OsString, path::PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "expense_cli")]
#[command(about = "Track expenses in a local JSON file")]
pub struct Cli {
    /// JSON file holding the expenses (also read from `EXPENSES_FILE`).
    #[arg(
        long,
        global = true,
        env = "EXPENSES_FILE",
        default_value = "expenses.json"
    )]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense.
    Add(AddArgs),
    /// Print every expense as a table.
    List,
    /// Delete an expense by id.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Description of the expense
    #[arg(long = "desc", default_value = "")]
    pub desc: String,
    /// Amount of the expense
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    /// Category of the expense
    #[arg(long = "cat", default_value = "General")]
    pub cat: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ID of the expense to delete
    #[arg(long, allow_negative_numbers = true)]
    pub id: Option<i64>,
}

/// Parse the process arguments, accepting single-dash long flags (`-desc`).
pub fn parse() -> Cli {
    Cli::parse_from(normalize(std::env::args_os()))
}

/// Rewrite `-name` and `-name=value` into their `--` form.
///
/// Single-letter flags (`-h`) and negative numbers (`-5`) are left alone.
pub fn normalize<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut out: Vec<OsString> = args.next().into_iter().collect();

    for arg in args {
        let rewritten = arg.to_str().and_then(|s| {
            let name = s.strip_prefix('-')?;
            let flag = name.split('=').next().unwrap_or_default();
            let is_long = flag.len() > 1
                && flag.starts_with(|c: char| c.is_ascii_alphabetic())
                && flag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            is_long.then(|| OsString::from(format!("--{name}")))
        });
        out.push(rewritten.unwrap_or(arg));
    }

    out
}
