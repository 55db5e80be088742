// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Borrow/repay bookkeeping for loans.
//!
//! A repayment lowers the balance and books a matching expense under the
//! reserved "Loan Repayment" category. Both land in one store transaction.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::db::{insert_expense, resolve_or_create_category};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Expense, LOAN_REPAYMENT_CATEGORY, Loan, new_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanTransaction {
    /// Borrow more.
    Increase,
    /// Repay.
    Decrease,
}

impl FromStr for LoanTransaction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" => Ok(LoanTransaction::Increase),
            "decrease" => Ok(LoanTransaction::Decrease),
            other => Err(LedgerError::validation(
                "type",
                format!("Unknown loan transaction '{}' (increase|decrease)", other),
            )),
        }
    }
}

impl fmt::Display for LoanTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanTransaction::Increase => f.write_str("increase"),
            LoanTransaction::Decrease => f.write_str("decrease"),
        }
    }
}

/// Expense to book for a repayment, before its category is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentDraft {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanUpdatePlan {
    /// The loan carrying its new balance.
    pub loan: Loan,
    pub repayment: Option<RepaymentDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanUpdateOutcome {
    pub loan: Loan,
    pub expense: Option<Expense>,
    pub created_category: Option<Category>,
}

pub fn repayment_description(loan_name: &str) -> String {
    format!("Payment for \"{}\"", loan_name)
}

/// Computes the new balance and the repayment expense, if any. Rejects
/// anything that would leave the balance below zero.
pub fn plan_loan_update(
    loan: &Loan,
    kind: LoanTransaction,
    amount: Decimal,
    today: NaiveDate,
) -> LedgerResult<LoanUpdatePlan> {
    if amount < Decimal::new(1, 2) {
        return Err(LedgerError::validation(
            "amount",
            "Amount must be a positive number.",
        ));
    }
    let balance = loan.balance();
    let new_balance = match kind {
        LoanTransaction::Increase => balance.checked_add(amount),
        LoanTransaction::Decrease => balance.checked_sub(amount),
    }
    .ok_or_else(|| LedgerError::validation("amount", "Amount is too large."))?;
    if new_balance < Decimal::ZERO {
        return Err(LedgerError::NegativeBalance { balance, amount });
    }

    let repayment = match kind {
        LoanTransaction::Increase => None,
        LoanTransaction::Decrease => Some(RepaymentDraft {
            description: repayment_description(&loan.name),
            amount,
            date: today,
        }),
    };
    Ok(LoanUpdatePlan {
        loan: Loan {
            current_balance: Some(new_balance),
            ..loan.clone()
        },
        repayment,
    })
}

/// Writes a plan atomically: the balance, the repayment category when it
/// does not exist yet, and the repayment expense.
pub fn commit_loan_update(
    conn: &mut Connection,
    plan: LoanUpdatePlan,
) -> LedgerResult<LoanUpdateOutcome> {
    let tx = conn.transaction()?;
    let balance = plan.loan.balance();
    let n = tx.execute(
        "UPDATE loans SET current_balance=?1 WHERE id=?2",
        params![balance.to_string(), plan.loan.id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("Loan", plan.loan.id.clone()));
    }

    let mut expense = None;
    let mut created_category = None;
    if let Some(draft) = plan.repayment {
        let (category, created) = resolve_or_create_category(&tx, LOAN_REPAYMENT_CATEGORY)?;
        let e = Expense {
            id: new_id(),
            description: draft.description,
            amount: draft.amount,
            category_id: category.id.clone(),
            date: draft.date,
        };
        insert_expense(&tx, &e)?;
        expense = Some(e);
        if created {
            created_category = Some(category);
        }
    }
    tx.commit()?;

    Ok(LoanUpdateOutcome {
        loan: plan.loan,
        expense,
        created_category,
    })
}

pub fn update_loan(
    conn: &mut Connection,
    loan: &Loan,
    kind: LoanTransaction,
    amount: Decimal,
    today: NaiveDate,
) -> LedgerResult<LoanUpdateOutcome> {
    let plan = match plan_loan_update(loan, kind, amount, today) {
        Ok(p) => p,
        Err(e) => {
            warn!(loan = %loan.id, %kind, %amount, error = %e, "loan update rejected");
            return Err(e);
        }
    };
    let outcome = commit_loan_update(conn, plan)?;
    info!(
        loan = %outcome.loan.id,
        %kind,
        %amount,
        balance = %outcome.loan.balance(),
        "loan updated"
    );
    Ok(outcome)
}

/// Finds a loan by id, or by name when the name is unique.
pub fn find_loan<'a>(loans: &'a [Loan], key: &str) -> LedgerResult<&'a Loan> {
    let key = key.trim();
    if let Some(l) = loans.iter().find(|l| l.id == key) {
        return Ok(l);
    }
    let mut by_name = loans.iter().filter(|l| l.name == key);
    match (by_name.next(), by_name.next()) {
        (Some(l), None) => Ok(l),
        (Some(_), Some(_)) => Err(LedgerError::Ambiguous {
            entity: "Loan",
            key: key.to_string(),
        }),
        _ => Err(LedgerError::not_found("Loan", key)),
    }
}
