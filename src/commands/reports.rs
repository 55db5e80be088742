// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{Currency, get_currency};
use crate::db::load_ledger;
use crate::ledger::{Ledger, Totals};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("spending", sub)) => spending(conn, sub)?,
        Some(("budgets", sub)) => crate::commands::budgets::report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(flatten)]
    pub totals: Totals,
    pub total_loan_balance: Decimal,
    pub currency: Currency,
}

pub fn build_summary(ledger: &Ledger, currency: Currency) -> Summary {
    Summary {
        totals: ledger.totals(),
        total_loan_balance: ledger.total_loan_balance(),
        currency,
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let s = build_summary(&ledger, get_currency(conn)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let ccy = s.currency;
        let data = vec![
            vec!["Total Income".into(), ccy.format(s.totals.total_income)],
            vec!["Total Spending".into(), ccy.format(s.totals.total_spent)],
            vec!["Remaining Balance".into(), ccy.format(s.totals.remaining_balance)],
            vec!["Outstanding Loans".into(), ccy.format(s.total_loan_balance)],
        ];
        println!("{}", pretty_table(&["", ccy.code], data));
    }
    Ok(())
}

fn spending(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = load_ledger(conn)?;
    let by_cat = ledger.spending_by_category();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &by_cat)? {
        let ccy = get_currency(conn)?;
        let mut items: Vec<_> = by_cat.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1));
        let data = items
            .into_iter()
            .map(|(cat, amt)| vec![cat, ccy.format(amt)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
