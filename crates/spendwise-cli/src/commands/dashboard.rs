//! Dashboard command implementation

use std::fmt::Write;

use anyhow::Result;
use spendwise_core::{format_currency, Ledger, TransactionKind};

use super::truncate;

/// Number of transactions shown in the recent list
const RECENT_LIMIT: usize = 10;

/// Show the dashboard over the sample ledger
pub fn cmd_dashboard() -> Result<()> {
    let ledger = Ledger::with_sample_data();
    print!("{}", render_dashboard(&ledger)?);
    Ok(())
}

/// Render the dashboard as plain text
pub fn render_dashboard(ledger: &Ledger) -> Result<String> {
    let mut out = String::new();
    let summary = ledger.summary();

    writeln!(out, "💰 SpendWise Dashboard")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    writeln!(out, "  Total Income:   {:>14}", format_currency(summary.total_income))?;
    writeln!(out, "  Total Expenses: {:>14}", format_currency(summary.total_expenses))?;
    writeln!(out, "  Balance:        {:>14}", format_currency(summary.balance))?;
    writeln!(out)?;

    writeln!(out, "📊 Spending by Category")?;
    let spending = ledger.spending_by_category();
    if spending.is_empty() {
        writeln!(out, "  No expenses recorded yet.")?;
    } else {
        for entry in &spending {
            let share = if summary.total_expenses > 0.0 {
                entry.amount / summary.total_expenses * 100.0
            } else {
                0.0
            };
            writeln!(
                out,
                "  {:<16} {:>12}  {:>5.1}%",
                entry.category,
                format_currency(entry.amount),
                share
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "🎯 Savings Goals")?;
    writeln!(
        out,
        "  Total saved this period: {}",
        format_currency(ledger.total_savings())
    )?;
    if ledger.goals().is_empty() {
        writeln!(out, "  No goals yet.")?;
    }
    for goal in ledger.goals() {
        let progress = goal.progress_percent();
        let filled = (progress / 5.0).round() as usize;
        writeln!(
            out,
            "  {:<20} [{}{}] {:>5.1}%  {} / {}",
            truncate(&goal.name, 20),
            "#".repeat(filled),
            ".".repeat(20 - filled.min(20)),
            progress,
            format_currency(goal.current_amount),
            format_currency(goal.target_amount)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "🧾 Recent Transactions")?;
    for tx in ledger.transactions().iter().take(RECENT_LIMIT) {
        let amount = match tx.kind {
            TransactionKind::Income => format_currency(tx.amount),
            TransactionKind::Expense => format_currency(-tx.amount),
        };
        writeln!(
            out,
            "  {}  {:<28} {:<16} {:>12}",
            tx.date.format("%b %d, %Y"),
            truncate(&tx.description, 28),
            tx.category,
            amount
        )?;
    }

    Ok(out)
}
