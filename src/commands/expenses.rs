// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ai::{Assistant, CategorySuggestion, GeminiClient, suggest_category};
use crate::config::Config;
use crate::currency::{format_amount, get_currency};
use crate::db::{insert_expense, load_ledger};
use crate::ledger::{Ledger, UNCATEGORIZED, category_map};
use crate::models::{Category, Expense, NewExpense};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let description = sub.get_one::<String>("description").unwrap().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let category = if sub.get_flag("auto") {
        let client = GeminiClient::from_config(&cfg.ai).context("AI error")?;
        auto_category(&client, &ledger, &description)?
    } else {
        let name = sub.get_one::<String>("category").unwrap();
        ledger
            .category_by_name(name)
            .cloned()
            .ok_or_else(|| anyhow!("Category '{}' not found", name.trim()))?
    };

    let expense = record(
        conn,
        NewExpense {
            description,
            amount,
            category_id: category.id.clone(),
            date: Some(date),
        },
    )?;
    let ccy = get_currency(conn)?;
    println!(
        "Expense added: {} for {} ({}, {})",
        expense.description,
        ccy.format(expense.amount),
        category.name,
        expense.date
    );
    Ok(())
}

/// Validates and stores one expense.
pub fn record(conn: &Connection, new: NewExpense) -> Result<Expense> {
    let expense = new.validate()?;
    insert_expense(conn, &expense)?;
    info!(id = %expense.id, amount = %expense.amount, "expense added");
    Ok(expense)
}

/// Asks the assistant for a category. A suggestion outside the user's list
/// is reported back instead of being dropped or guessed.
pub fn auto_category(
    assistant: &dyn Assistant,
    ledger: &Ledger,
    description: &str,
) -> Result<Category> {
    match suggest_category(assistant, description, &ledger.categories)
        .map_err(|e| anyhow!("AI error: could not auto-categorize expense ({})", e))?
    {
        CategorySuggestion::Matched {
            category,
            confidence,
        } => {
            println!(
                "Auto-categorized as \"{}\" with {}% confidence.",
                category.name,
                (confidence * 100.0).round()
            );
            Ok(category)
        }
        CategorySuggestion::Unresolved { suggested, .. } => bail!(
            "AI suggested \"{}\", but it's not in your list. Please add it or choose another with --category.",
            suggested
        ),
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Vec<ExpenseRow> {
    let by_id = category_map(&ledger.categories);
    let wanted = sub.get_one::<String>("category").map(|s| s.trim().to_string());
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    ledger
        .expenses
        .iter()
        .map(|e| {
            let category = by_id
                .get(e.category_id.as_str())
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            (e, category)
        })
        .filter(|(_, category)| wanted.as_deref().is_none_or(|w| w == category))
        .take(limit)
        .map(|(e, category)| ExpenseRow {
            id: e.id.clone(),
            date: e.date.to_string(),
            description: e.description.clone(),
            category,
            amount: format_amount(e.amount),
        })
        .collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let data = query_rows(&ledger, sub);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.date, r.description, r.category, r.amount])
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount"], rows)
        );
    }
    Ok(())
}
