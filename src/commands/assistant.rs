// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ai::{CategorySuggestion, GeminiClient, generate_saving_tips, suggest_category};
use crate::config::Config;
use crate::currency::get_currency;
use crate::db::load_ledger;
use crate::utils::maybe_print_json;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("categorize", sub)) => categorize(conn, cfg, sub)?,
        Some(("tips", _)) => tips(conn, cfg)?,
        _ => {}
    }
    Ok(())
}

fn categorize(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("description").unwrap();
    let ledger = load_ledger(conn)?;
    let client = GeminiClient::from_config(&cfg.ai).map_err(|e| anyhow!("AI error: {}", e))?;
    let suggestion = suggest_category(&client, description, &ledger.categories)
        .map_err(|e| anyhow!("AI error: could not auto-categorize expense ({})", e))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &suggestion)? {
        return Ok(());
    }
    match suggestion {
        CategorySuggestion::Matched {
            category,
            confidence,
        } => println!(
            "Categorized as \"{}\" with {}% confidence.",
            category.name,
            (confidence * 100.0).round()
        ),
        CategorySuggestion::Unresolved { suggested, .. } => println!(
            "AI suggested \"{}\", but it's not in your list. Please add it or choose another.",
            suggested
        ),
    }
    Ok(())
}

fn tips(conn: &Connection, cfg: &Config) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let ccy = get_currency(conn)?;
    let client = GeminiClient::from_config(&cfg.ai).map_err(|e| anyhow!("AI error: {}", e))?;
    let tips = generate_saving_tips(&client, &ledger, &ccy)
        .map_err(|e| anyhow!("AI error: could not generate saving tips ({})", e))?;
    println!("{}", tips);
    Ok(())
}
