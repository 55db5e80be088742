// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use claritybudget::config::{Config, DEFAULT_AI_MODEL, DEFAULT_PROFILE};
use claritybudget::currency::{Currency, get_currency, set_currency};
use claritybudget::db;
use claritybudget::error::LedgerError;
use claritybudget::models::{DEFAULT_CATEGORIES, NewExpense, NewIncome, new_category};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tempfile::tempdir;

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 5, d)
}

#[test]
fn first_open_seeds_default_categories_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("me.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        let names: Vec<String> = db::load_categories(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, DEFAULT_CATEGORIES);
    }
    let conn = db::open_at(&path).unwrap();
    assert_eq!(db::load_categories(&conn).unwrap().len(), DEFAULT_CATEGORIES.len());
}

#[test]
fn duplicate_category_names_are_rejected() {
    let conn = db::open_in_memory().unwrap();
    db::insert_category(&conn, &new_category("Pets").unwrap()).unwrap();
    let err = db::insert_category(&conn, &new_category(" Pets ").unwrap()).unwrap_err();
    assert!(matches!(err, LedgerError::Duplicate { .. }));
    assert!(new_category("  ").is_err());
}

#[test]
fn records_round_trip_newest_first() {
    let conn = db::open_in_memory().unwrap();
    let food = new_category("Food").unwrap();
    db::insert_category(&conn, &food).unwrap();
    for (desc, amount, d) in [("old", "1.10", 1), ("new", "2.20", 9), ("mid", "3.30", 5)] {
        let e = NewExpense {
            description: desc.into(),
            amount: amount.parse().unwrap(),
            category_id: food.id.clone(),
            date: day(d),
        }
        .validate()
        .unwrap();
        db::insert_expense(&conn, &e).unwrap();
    }
    let income = NewIncome {
        description: "Salary".into(),
        amount: Decimal::new(300000, 2),
        date: day(1),
    }
    .validate()
    .unwrap();
    db::insert_income(&conn, &income).unwrap();

    let ledger = db::load_ledger(&conn).unwrap();
    let order: Vec<&str> = ledger.expenses.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(order, ["new", "mid", "old"]);
    assert_eq!(ledger.expenses[0].amount, Decimal::new(220, 2));
    assert_eq!(ledger.incomes, vec![income]);
    assert_eq!(ledger.totals().remaining_balance, Decimal::new(299340, 2));
}

#[test]
fn input_validation_names_the_field() {
    let bad = NewExpense {
        description: " ".into(),
        amount: Decimal::ONE,
        category_id: "c".into(),
        date: day(1),
    };
    assert!(matches!(
        bad.validate(),
        Err(LedgerError::Validation { field: "description", .. })
    ));
    let bad = NewExpense {
        description: "Milk".into(),
        amount: Decimal::ZERO,
        category_id: "c".into(),
        date: day(1),
    };
    assert!(matches!(
        bad.validate(),
        Err(LedgerError::Validation { field: "amount", .. })
    ));
    let bad = NewIncome {
        description: "Gift".into(),
        amount: Decimal::ONE,
        date: None,
    };
    assert!(matches!(
        bad.validate(),
        Err(LedgerError::Validation { field: "date", .. })
    ));
}

#[test]
fn corrupt_amount_is_reported() {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO incomes(id, description, amount, date) VALUES ('i', 'x', 'lots', '2024-01-01')",
        [],
    )
    .unwrap();
    let err = db::load_incomes(&conn).unwrap_err();
    assert!(matches!(err, LedgerError::Corrupt { table: "incomes", .. }));
}

#[test]
fn currency_preference_persists_with_fallback() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(get_currency(&conn).unwrap().code, "USD");

    let c = set_currency(&conn, " gbp").unwrap();
    assert_eq!(c.symbol, "£");
    assert_eq!(get_currency(&conn).unwrap().code, "GBP");

    assert!(set_currency(&conn, "XYZ").is_err());
    assert_eq!(get_currency(&conn).unwrap().code, "GBP");

    db::set_setting(&conn, "currency", "DOGE").unwrap();
    assert_eq!(get_currency(&conn).unwrap(), Currency::default());
}

#[test]
fn currency_formats_two_decimals() {
    let usd = Currency::default();
    assert_eq!(usd.format(Decimal::new(5, 0)), "$5.00");
    assert_eq!(usd.format(Decimal::new(12345, 3)), "$12.35");
    assert_eq!(usd.format(Decimal::new(-15, 0)), "$-15.00");
}

#[test]
fn config_reads_environment() {
    let env: HashMap<&str, &str> = [
        ("CLARITY_PROFILE", "work"),
        ("GEMINI_API_KEY", "k-1"),
        ("CLARITY_AI_MODEL", "  "),
    ]
    .into_iter()
    .collect();
    let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.profile, "work");
    assert_eq!(cfg.ai.api_key.as_deref(), Some("k-1"));
    assert_eq!(cfg.ai.model, DEFAULT_AI_MODEL);
    assert!(cfg.data_dir.is_none());

    let cfg = cfg.with_profile(Some("home"));
    assert_eq!(cfg.profile, "home");
    let cfg = Config::from_lookup(|_| None).with_profile(None);
    assert_eq!(cfg.profile, DEFAULT_PROFILE);
}

#[test]
fn profile_gets_its_own_database_file() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();
    let cfg = Config::from_lookup(|k| (k == "CLARITY_DATA_DIR").then(|| data_dir.clone()))
        .with_profile(Some("alice"));
    let path = cfg.db_path().unwrap();
    assert_eq!(path, dir.path().join("alice.sqlite"));
    db::open_or_init(&cfg).unwrap();
    assert!(path.exists());

    let bad = cfg.with_profile(Some("../etc"));
    assert!(bad.db_path().is_err());
}
