// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{BudgetChange, upsert_budget};
use crate::currency::get_currency;
use crate::db::{load_ledger, save_budget};
use crate::ledger::Ledger;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut ledger = load_ledger(conn)?;
    let change = set_budget(conn, &mut ledger, cat, amount)?;
    let verb = match change {
        BudgetChange::Updated(_) => "updated",
        BudgetChange::Created(_) => "set",
    };
    println!(
        "Budget for {} {} to {}.",
        cat.trim(),
        verb,
        get_currency(conn)?.format(amount)
    );
    Ok(())
}

/// Upserts the budget of the category named `category` and patches `ledger`.
pub fn set_budget(
    conn: &Connection,
    ledger: &mut Ledger,
    category: &str,
    amount: Decimal,
) -> Result<BudgetChange> {
    let cat_id = ledger
        .category_by_name(category)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("Category '{}' not found", category.trim()))?;
    let change = upsert_budget(&ledger.budgets, &cat_id, amount)?;
    save_budget(conn, &change)?;
    ledger.apply_budget(&change);
    info!(category_id = %cat_id, %amount, "budget saved");
    Ok(change)
}

pub fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let progress = ledger.budget_progress();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &progress)? {
        let ccy = get_currency(conn)?;
        let data = progress
            .into_iter()
            .map(|p| {
                vec![
                    p.category_name,
                    ccy.format(p.budget.amount),
                    ccy.format(p.spent),
                    format!("{:.1}%", p.progress_percent.round_dp(1)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Progress"], data)
        );
    }
    Ok(())
}
