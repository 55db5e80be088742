// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::get_currency;
use crate::db::{insert_loan, load_ledger, load_loans};
use crate::loans::{LoanTransaction, find_loan, update_loan};
use crate::models::NewLoan;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let loan = NewLoan {
        name: sub.get_one::<String>("name").unwrap().to_string(),
        lender: sub.get_one::<String>("lender").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        date: Some(date),
    }
    .validate()?;
    insert_loan(conn, &loan)?;
    info!(id = %loan.id, amount = %loan.initial_amount, "loan added");
    println!(
        "Loan \"{}\" for {} has been logged (id {}).",
        loan.name,
        get_currency(conn)?.format(loan.initial_amount),
        loan.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let loans = load_loans(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &loans)? {
        let ccy = get_currency(conn)?;
        let rows = loans
            .into_iter()
            .map(|l| {
                let balance = ccy.format(l.balance());
                vec![
                    l.id,
                    l.date.to_string(),
                    l.name,
                    l.lender,
                    ccy.format(l.initial_amount),
                    balance,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Name", "Lender", "Initial", "Balance"], rows)
        );
    }
    Ok(())
}

fn update(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("loan").unwrap();
    let kind: LoanTransaction = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;

    let mut ledger = load_ledger(conn)?;
    let loan = find_loan(&ledger.loans, key)?.clone();
    let outcome = update_loan(conn, &loan, kind, amount, today())
        .with_context(|| format!("Could not update loan \"{}\"", loan.name))?;
    ledger.apply_loan_update(&outcome);

    let ccy = get_currency(conn)?;
    println!(
        "Loan \"{}\" balance is now {}.",
        outcome.loan.name,
        ccy.format(outcome.loan.balance())
    );
    if let Some(e) = &outcome.expense {
        println!("A payment of {} was logged.", ccy.format(e.amount));
    }
    println!(
        "Total outstanding across loans: {}",
        ccy.format(ledger.total_loan_balance())
    );
    Ok(())
}
