// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use claritybudget::commands::{doctor, expenses, reports};
use claritybudget::currency::Currency;
use claritybudget::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO categories(id, name) VALUES ('c1', 'Groceries'), ('c2', 'Transport');
        INSERT INTO expenses(id, description, amount, category_id, date) VALUES
            ('e1', 'Weekly grocery run', '75.50', 'c1', '2024-05-20'),
            ('e2', 'Bus pass', '55', 'c2', '2024-05-15'),
            ('e3', 'Market', '10', 'c1', '2024-05-10'),
            ('e4', 'Old gym', '30', 'deleted', '2024-05-01');
        INSERT INTO incomes(id, description, amount, date) VALUES ('i1', 'Salary', '500', '2024-05-01');
        INSERT INTO budgets(id, category_id, amount) VALUES ('b1', 'c1', '100'), ('b2', 'gone', '20');
        INSERT INTO loans(id, name, lender, initial_amount, current_balance, date) VALUES
            ('l1', 'Car', 'Bank', '1000', '400', '2024-01-01'),
            ('l2', 'Laptop', 'Shop', '80', NULL, '2023-06-01');
        "#,
    )
    .unwrap();
    conn
}

fn expense_list_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("expense", m)) => match m.subcommand() {
            Some(("list", list_m)) => list_m.clone(),
            _ => panic!("no list subcommand"),
        },
        _ => panic!("no expense subcommand"),
    }
}

#[test]
fn expense_list_filters_and_limits() {
    let conn = setup();
    let ledger = db::load_ledger(&conn).unwrap();

    let m = expense_list_matches(&["claritybudget", "expense", "list", "--limit", "2"]);
    let rows = expenses::query_rows(&ledger, &m);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2024-05-20");
    assert_eq!(rows[0].amount, "75.50");

    let m = expense_list_matches(&["claritybudget", "expense", "list", "-c", "Groceries"]);
    let rows = expenses::query_rows(&ledger, &m);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.category == "Groceries"));

    let m = expense_list_matches(&["claritybudget", "expense", "list", "-c", "Uncategorized"]);
    let rows = expenses::query_rows(&ledger, &m);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Old gym");
}

#[test]
fn summary_combines_totals_and_loans() {
    let conn = setup();
    let ledger = db::load_ledger(&conn).unwrap();
    let s = reports::build_summary(&ledger, Currency::default());
    assert_eq!(s.totals.total_income, Decimal::new(500, 0));
    assert_eq!(s.totals.total_spent, Decimal::new(17050, 2));
    assert_eq!(s.totals.remaining_balance, Decimal::new(32950, 2));
    assert_eq!(s.total_loan_balance, Decimal::new(480, 0));
}

#[test]
fn doctor_lists_dangling_references() {
    let conn = setup();
    let issues = doctor::find_issues(&db::load_ledger(&conn).unwrap());
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        kinds,
        [
            "expense_unknown_category",
            "budget_unknown_category",
            "loan_missing_balance"
        ]
    );
}

#[test]
fn loan_update_defaults_to_repayment() {
    let matches = cli::build_cli().get_matches_from([
        "claritybudget",
        "loan",
        "update",
        "--loan",
        "Car",
        "--amount",
        "40",
    ]);
    let Some(("loan", loan_m)) = matches.subcommand() else {
        panic!("loan command not parsed");
    };
    let Some(("update", upd)) = loan_m.subcommand() else {
        panic!("update not parsed");
    };
    assert_eq!(upd.get_one::<String>("type").unwrap(), "decrease");
    assert_eq!(upd.get_one::<String>("amount").unwrap(), "40");
}

#[test]
fn expense_add_needs_category_or_auto() {
    let missing = cli::build_cli().try_get_matches_from([
        "claritybudget",
        "expense",
        "add",
        "-m",
        "Milk",
        "-a",
        "2",
    ]);
    assert!(missing.is_err());

    let both = cli::build_cli().try_get_matches_from([
        "claritybudget", "expense", "add", "-m", "Milk", "-a", "2", "-c", "Groceries", "--auto",
    ]);
    assert!(both.is_err());

    let auto = cli::build_cli().try_get_matches_from([
        "claritybudget", "--profile", "work", "expense", "add", "-m", "Milk", "-a", "2", "--auto",
    ]);
    let auto = auto.unwrap();
    assert_eq!(auto.get_one::<String>("profile").unwrap(), "work");
}

#[test]
fn loan_type_is_restricted() {
    let res = cli::build_cli().try_get_matches_from([
        "claritybudget", "loan", "update", "--loan", "Car", "-a", "1", "-t", "forgive",
    ]);
    assert!(res.is_err());
}

#[test]
fn listed_amounts_round_like_reports() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO categories(id, name) VALUES ('c1', 'Coffee');
        INSERT INTO expenses(id, description, amount, category_id, date)
            VALUES ('e1', 'Latte', '2.999', 'c1', '2024-05-20');
        "#,
    )
    .unwrap();
    let ledger = db::load_ledger(&conn).unwrap();
    let m = expense_list_matches(&["claritybudget", "expense", "list"]);
    let rows = expenses::query_rows(&ledger, &m);
    assert_eq!(rows[0].amount, "3.00");
    assert_eq!(Currency::default().format(ledger.expenses[0].amount), "$3.00");
}

#[test]
fn summary_json_is_camel_case() {
    let conn = setup();
    let s = reports::build_summary(&db::load_ledger(&conn).unwrap(), Currency::default());
    let v = serde_json::to_value(&s).unwrap();
    assert!(v.get("totalIncome").is_some());
    assert!(v.get("totalSpent").is_some());
    assert!(v.get("totalLoanBalance").is_some());
    assert_eq!(v["currency"]["code"], "USD");
}
