//! Expense listing command

use std::path::Path;

use anyhow::{anyhow, Result};
use outlay_core::models::{Category, ExpenseFilter};

use super::open_db;

pub fn cmd_expenses(
    db_path: &Path,
    limit: i64,
    category: Option<&str>,
    summary: bool,
) -> Result<()> {
    let db = open_db(db_path)?;

    if summary {
        let totals = db.category_totals()?;
        if totals.is_empty() {
            println!("No expenses yet. Process a receipt with: outlay process --file receipt.jpg");
            return Ok(());
        }

        println!("📊 Spending by category");
        println!("   ─────────────────────────────");
        for total in totals {
            println!(
                "   {:<14} {:>10.2}  ({} expense{})",
                total.category,
                total.total_amount,
                total.expense_count,
                if total.expense_count == 1 { "" } else { "s" }
            );
        }
        return Ok(());
    }

    let category = category
        .map(|c| {
            c.parse::<Category>()
                .map_err(|e| anyhow!("{} (use travel, food, office, fuel or miscellaneous)", e))
        })
        .transpose()?;

    let filter = ExpenseFilter {
        category,
        limit: Some(limit),
        offset: None,
    };

    let expenses = db.list_expenses(&filter)?;
    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!("🧾 Expenses ({} shown)", expenses.len());
    println!("   ─────────────────────────────");
    for expense in expenses {
        println!(
            "   #{:<5} {:<10} {:>10.2}  {:<14} {}",
            expense.id,
            expense.date,
            expense.amount,
            expense.category,
            expense.description
        );
    }

    Ok(())
}
