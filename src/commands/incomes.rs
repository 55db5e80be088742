// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{format_amount, get_currency};
use crate::db::{insert_income, load_incomes};
use crate::models::NewIncome;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let income = NewIncome {
                description: sub.get_one::<String>("description").unwrap().to_string(),
                amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
                date: Some(date),
            }
            .validate()?;
            insert_income(conn, &income)?;
            info!(id = %income.id, amount = %income.amount, "income added");
            println!(
                "Income added: {} for {}",
                income.description,
                get_currency(conn)?.format(income.amount)
            );
        }
        Some(("list", sub)) => {
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
            let incomes: Vec<_> = load_incomes(conn)?.into_iter().take(limit).collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &incomes)? {
                let rows = incomes
                    .into_iter()
                    .map(|i| vec![i.date.to_string(), i.description, format_amount(i.amount)])
                    .collect();
                println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
