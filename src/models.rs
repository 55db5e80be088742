// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Reserved category that loan repayments are booked against.
pub const LOAN_REPAYMENT_CATEGORY: &str = "Loan Repayment";

/// Categories created for a profile on first use.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Groceries",
    "Dining Out",
    "Transport",
    "Entertainment",
    "Utilities",
    "Shopping",
    "Health",
];

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub name: String,
    pub lender: String,
    pub initial_amount: Decimal,
    /// Absent only on records written before balances were tracked.
    pub current_balance: Option<Decimal>,
    pub date: NaiveDate,
}

impl Loan {
    /// Outstanding balance, falling back to the initial amount.
    pub fn balance(&self) -> Decimal {
        self.current_balance.unwrap_or(self.initial_amount)
    }
}

// Input records, validated before anything is written.

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewIncome {
    pub description: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub name: String,
    pub lender: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

fn required(field: &'static str, value: &str, message: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, message));
    }
    Ok(())
}

pub(crate) fn positive(field: &'static str, amount: Decimal, message: &str) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(field, message));
    }
    Ok(())
}

fn date_given(date: Option<NaiveDate>) -> LedgerResult<NaiveDate> {
    date.ok_or_else(|| LedgerError::validation("date", "Date is required."))
}

impl NewExpense {
    pub fn validate(self) -> LedgerResult<Expense> {
        required("description", &self.description, "Description is required.")?;
        positive("amount", self.amount, "Amount must be positive.")?;
        required("categoryId", &self.category_id, "Category is required.")?;
        let date = date_given(self.date)?;
        Ok(Expense {
            id: new_id(),
            description: self.description.trim().to_string(),
            amount: self.amount,
            category_id: self.category_id,
            date,
        })
    }
}

impl NewIncome {
    pub fn validate(self) -> LedgerResult<Income> {
        required("description", &self.description, "Description is required.")?;
        positive("amount", self.amount, "Amount must be positive.")?;
        let date = date_given(self.date)?;
        Ok(Income {
            id: new_id(),
            description: self.description.trim().to_string(),
            amount: self.amount,
            date,
        })
    }
}

impl NewLoan {
    /// A new loan starts with its full amount outstanding.
    pub fn validate(self) -> LedgerResult<Loan> {
        required("name", &self.name, "A name for the loan is required.")?;
        required("lender", &self.lender, "Lender is required.")?;
        positive("amount", self.amount, "Initial amount must be positive.")?;
        let date = date_given(self.date)?;
        Ok(Loan {
            id: new_id(),
            name: self.name.trim().to_string(),
            lender: self.lender.trim().to_string(),
            initial_amount: self.amount,
            current_balance: Some(self.amount),
            date,
        })
    }
}

pub fn new_category(name: &str) -> LedgerResult<Category> {
    required("name", name, "Category name is required.")?;
    Ok(Category {
        id: new_id(),
        name: name.trim().to_string(),
    })
}
