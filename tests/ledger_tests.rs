// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use claritybudget::ledger::{
    Ledger, compute_budget_progress, compute_spending_by_category, compute_total_loan_balance,
    compute_totals,
};
use claritybudget::models::{Budget, Category, Expense, Income, Loan};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

fn cat(id: &str, name: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
    }
}

fn expense(amount: &str, category_id: &str) -> Expense {
    Expense {
        id: format!("e-{}-{}", category_id, amount),
        description: "x".into(),
        amount: d(amount),
        category_id: category_id.into(),
        date: day(),
    }
}

fn income(amount: &str) -> Income {
    Income {
        id: format!("i-{}", amount),
        description: "salary".into(),
        amount: d(amount),
        date: day(),
    }
}

fn budget(category_id: &str, amount: &str) -> Budget {
    Budget {
        id: format!("b-{}", category_id),
        category_id: category_id.into(),
        amount: d(amount),
    }
}

#[test]
fn totals_are_exact_decimals() {
    let incomes = vec![income("0.1"), income("0.2"), income("1000.05")];
    let expenses = vec![expense("0.3", "c1"), expense("75.50", "c1")];
    let t = compute_totals(&incomes, &expenses);
    assert_eq!(t.total_income, d("1000.35"));
    assert_eq!(t.total_spent, d("75.80"));
    assert_eq!(t.remaining_balance, d("924.55"));
    assert_eq!(t.total_income - t.total_spent, t.remaining_balance);
}

#[test]
fn totals_of_empty_collections_are_zero() {
    let t = compute_totals(&[], &[]);
    assert_eq!(t.total_income, Decimal::ZERO);
    assert_eq!(t.total_spent, Decimal::ZERO);
    assert_eq!(t.remaining_balance, Decimal::ZERO);
}

#[test]
fn overspending_gives_negative_remaining() {
    let t = compute_totals(&[income("10")], &[expense("25", "c1")]);
    assert_eq!(t.remaining_balance, d("-15"));
}

#[test]
fn loan_balance_falls_back_to_initial_amount() {
    let mk = |initial: &str, current: Option<&str>| Loan {
        id: initial.into(),
        name: "car".into(),
        lender: "bank".into(),
        initial_amount: d(initial),
        current_balance: current.map(d),
        date: day(),
    };
    let loans = vec![mk("500", Some("120")), mk("300", None), mk("50", Some("0"))];
    // paid-off loan counts as 0, not its initial amount
    assert_eq!(compute_total_loan_balance(&loans), d("420"));
    assert_eq!(compute_total_loan_balance(&[]), Decimal::ZERO);
}

#[test]
fn spending_buckets_unknown_categories() {
    let categories = vec![cat("c1", "Food")];
    let expenses = vec![expense("30", "c1"), expense("20", "c2")];
    let by_cat = compute_spending_by_category(&expenses, &categories);
    assert_eq!(by_cat.len(), 2);
    assert_eq!(by_cat["Food"], d("30"));
    assert_eq!(by_cat["Uncategorized"], d("20"));
}

#[test]
fn spending_merges_all_unknown_ids_into_one_bucket() {
    let categories = vec![cat("c1", "Food")];
    let expenses = vec![
        expense("1.25", "gone-1"),
        expense("2.50", "gone-2"),
        expense("4", "c1"),
        expense("6", "c1"),
    ];
    let by_cat = compute_spending_by_category(&expenses, &categories);
    assert_eq!(by_cat["Uncategorized"], d("3.75"));
    assert_eq!(by_cat["Food"], d("10"));
}

#[test]
fn budget_progress_percent_and_order() {
    let categories = vec![cat("c1", "Groceries"), cat("c2", "Dining Out")];
    let budgets = vec![budget("c2", "150"), budget("c1", "400")];
    let expenses = vec![
        expense("45", "c2"),
        expense("75.50", "c1"),
        expense("24.50", "c1"),
    ];
    let p = compute_budget_progress(&budgets, &expenses, &categories);
    assert_eq!(p.len(), 2);
    assert_eq!(p[0].category_name, "Dining Out");
    assert_eq!(p[0].spent, d("45"));
    assert_eq!(p[0].progress_percent, d("30"));
    assert_eq!(p[1].category_name, "Groceries");
    assert_eq!(p[1].spent, d("100"));
    assert_eq!(p[1].progress_percent, d("25"));
}

#[test]
fn budget_progress_handles_zero_amount_and_unknown_category() {
    let budgets = vec![budget("c1", "0"), budget("missing", "50")];
    let expenses = vec![expense("10", "c1"), expense("60", "missing")];
    let p = compute_budget_progress(&budgets, &expenses, &[cat("c1", "Fun")]);
    assert_eq!(p[0].spent, d("10"));
    assert_eq!(p[0].progress_percent, Decimal::ZERO);
    assert_eq!(p[1].category_name, "Unknown");
    assert_eq!(p[1].progress_percent, d("120"));
}

#[test]
fn ledger_views_match_free_functions() {
    let ledger = Ledger {
        categories: vec![cat("c1", "Food")],
        expenses: vec![expense("30", "c1"), expense("20", "c2")],
        incomes: vec![income("100")],
        budgets: vec![budget("c1", "60")],
        loans: vec![],
    };
    assert_eq!(ledger.totals().remaining_balance, d("50"));
    assert_eq!(
        ledger.spending_by_category(),
        compute_spending_by_category(&ledger.expenses, &ledger.categories)
    );
    assert_eq!(ledger.budget_progress()[0].progress_percent, d("50"));
    assert_eq!(ledger.category_by_name(" Food ").unwrap().id, "c1");
    assert!(ledger.category_by_name("food").is_none());
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let incomes = vec![
        Income {
            amount: Decimal::MAX,
            ..income("1")
        },
        Income {
            amount: Decimal::MAX,
            ..income("2")
        },
    ];
    let t = compute_totals(&incomes, &[expense("10", "c1")]);
    assert_eq!(t.total_income, Decimal::MAX);
    assert_eq!(t.remaining_balance, Decimal::MAX - d("10"));

    let huge = Expense {
        amount: Decimal::MAX,
        ..expense("1", "c1")
    };
    let by_cat = compute_spending_by_category(&[huge.clone(), huge], &[cat("c1", "Food")]);
    assert_eq!(by_cat["Food"], Decimal::MAX);
}

#[test]
fn unrepresentable_progress_reports_max() {
    let budgets = vec![budget("c1", "0.0000000001")];
    let expenses = vec![expense("1000000000000000000", "c1")];
    let p = compute_budget_progress(&budgets, &expenses, &[cat("c1", "Rent")]);
    assert_eq!(p[0].spent, d("1000000000000000000"));
    assert_eq!(p[0].progress_percent, Decimal::MAX);
}

#[test]
fn views_serialize_in_camel_case() {
    let t = compute_totals(&[income("5")], &[]);
    let v = serde_json::to_value(t).unwrap();
    assert!(v.get("totalIncome").is_some());
    assert!(v.get("remainingBalance").is_some());

    let p = compute_budget_progress(&[budget("c1", "10")], &[], &[cat("c1", "Food")]);
    let v = serde_json::to_value(&p[0]).unwrap();
    assert_eq!(v["categoryName"], "Food");
    assert!(v.get("progressPercent").is_some());
    assert_eq!(v["budget"]["categoryId"], "c1");
}
