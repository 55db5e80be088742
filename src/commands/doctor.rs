// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_ledger;
use crate::ledger::{Ledger, category_map};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Dangling references that the reports silently bucket as
/// "Uncategorized" or "Unknown", plus loans without a tracked balance.
pub fn find_issues(ledger: &Ledger) -> Vec<Vec<String>> {
    let by_id = category_map(&ledger.categories);
    let mut rows = Vec::new();

    for e in &ledger.expenses {
        if !by_id.contains_key(e.category_id.as_str()) {
            rows.push(vec![
                "expense_unknown_category".into(),
                format!("{} {} ({})", e.date, e.description, e.category_id),
            ]);
        }
    }
    for b in &ledger.budgets {
        if !by_id.contains_key(b.category_id.as_str()) {
            rows.push(vec![
                "budget_unknown_category".into(),
                format!("{} ({})", b.amount, b.category_id),
            ]);
        }
    }
    for l in &ledger.loans {
        if l.current_balance.is_none() {
            rows.push(vec!["loan_missing_balance".into(), l.name.clone()]);
        }
    }
    rows
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(&load_ledger(conn)?);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
