use std::fmt::Write;

use engine::Expense;

const SEPARATOR_WIDTH: usize = 60;

/// Fixed-width table with one row per expense.
pub fn expense_table(expenses: &[Expense]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{:<5} | {:<20} | {:<10} | {:<15}",
        "ID", "Description", "Amount", "Category"
    );
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    for e in expenses {
        let _ = writeln!(
            out,
            "{:<5} | {:<20} | {:<10.2} | {:<15}",
            e.id, e.description, e.amount, e.category
        );
    }
    out
}
