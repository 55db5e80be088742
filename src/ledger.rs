// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the ledger collections.
//!
//! Nothing here is cached: every view is recomputed from the collections it
//! is handed, so callers may invoke these after every change.
//!
//! Sums saturate at the `Decimal` range instead of panicking. A progress
//! figure that cannot be represented reports `Decimal::MAX`.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::budget::BudgetChange;
use crate::loans::LoanUpdateOutcome;
use crate::models::{Budget, Category, Expense, Income, Loan};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: Decimal,
    pub total_spent: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category_name: String,
    pub spent: Decimal,
    pub progress_percent: Decimal,
}

pub fn category_map(categories: &[Category]) -> HashMap<&str, &Category> {
    categories.iter().map(|c| (c.id.as_str(), c)).collect()
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn compute_totals(incomes: &[Income], expenses: &[Expense]) -> Totals {
    let total_income = saturating_sum(incomes.iter().map(|i| i.amount));
    let total_spent = saturating_sum(expenses.iter().map(|e| e.amount));
    Totals {
        total_income,
        total_spent,
        remaining_balance: total_income.saturating_sub(total_spent),
    }
}

pub fn compute_total_loan_balance(loans: &[Loan]) -> Decimal {
    saturating_sum(loans.iter().map(Loan::balance))
}

/// Sums expenses per category name; unresolved ids land in "Uncategorized".
pub fn compute_spending_by_category(
    expenses: &[Expense],
    categories: &[Category],
) -> BTreeMap<String, Decimal> {
    let by_id = category_map(categories);
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in expenses {
        let name = by_id
            .get(e.category_id.as_str())
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED);
        let slot = out.entry(name.to_string()).or_insert(Decimal::ZERO);
        *slot = slot.saturating_add(e.amount);
    }
    out
}

/// One entry per budget, in budget order. A non-positive budget amount
/// reports 0% progress.
pub fn compute_budget_progress(
    budgets: &[Budget],
    expenses: &[Expense],
    categories: &[Category],
) -> Vec<BudgetProgress> {
    let by_id = category_map(categories);
    budgets
        .iter()
        .map(|b| {
            let spent = saturating_sum(
                expenses
                    .iter()
                    .filter(|e| e.category_id == b.category_id)
                    .map(|e| e.amount),
            );
            let progress_percent = if b.amount > Decimal::ZERO {
                spent
                    .checked_div(b.amount)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::MAX)
            } else {
                Decimal::ZERO
            };
            BudgetProgress {
                budget: b.clone(),
                category_name: by_id
                    .get(b.category_id.as_str())
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                spent,
                progress_percent,
            }
        })
        .collect()
}

/// In-memory copy of one profile's collections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub budgets: Vec<Budget>,
    pub loans: Vec<Loan>,
}

impl Ledger {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.incomes, &self.expenses)
    }

    pub fn total_loan_balance(&self) -> Decimal {
        compute_total_loan_balance(&self.loans)
    }

    pub fn spending_by_category(&self) -> BTreeMap<String, Decimal> {
        compute_spending_by_category(&self.expenses, &self.categories)
    }

    pub fn budget_progress(&self) -> Vec<BudgetProgress> {
        compute_budget_progress(&self.budgets, &self.expenses, &self.categories)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories.iter().find(|c| c.name == name)
    }

    // Patches below mirror a write that already succeeded in the store.

    pub fn push_expense(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    pub fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn apply_budget(&mut self, change: &BudgetChange) {
        match change {
            BudgetChange::Updated(b) => {
                if let Some(existing) = self.budgets.iter_mut().find(|x| x.id == b.id) {
                    existing.amount = b.amount;
                }
            }
            BudgetChange::Created(b) => self.budgets.push(b.clone()),
        }
    }

    pub fn apply_loan_update(&mut self, outcome: &LoanUpdateOutcome) {
        if let Some(loan) = self.loans.iter_mut().find(|l| l.id == outcome.loan.id) {
            loan.current_balance = outcome.loan.current_balance;
        }
        if let Some(c) = &outcome.created_category {
            self.push_category(c.clone());
        }
        if let Some(e) = &outcome.expense {
            self.push_expense(e.clone());
        }
    }
}
