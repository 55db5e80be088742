// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, new_id, positive};

/// Result of setting a budget: at most one budget exists per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", content = "budget", rename_all = "lowercase")]
pub enum BudgetChange {
    Updated(Budget),
    Created(Budget),
}

impl BudgetChange {
    pub fn budget(&self) -> &Budget {
        match self {
            BudgetChange::Updated(b) | BudgetChange::Created(b) => b,
        }
    }
}

/// Decide how setting `amount` for `category_id` lands on `budgets`.
///
/// An existing budget for the category keeps its id and takes the new
/// amount; otherwise a fresh budget is minted. `budgets` is not touched.
pub fn upsert_budget(
    budgets: &[Budget],
    category_id: &str,
    amount: Decimal,
) -> LedgerResult<BudgetChange> {
    let category_id = category_id.trim();
    if category_id.is_empty() {
        return Err(LedgerError::validation("categoryId", "Category is required."));
    }
    positive("amount", amount, "Amount must be positive.")?;

    Ok(match budgets.iter().find(|b| b.category_id == category_id) {
        Some(existing) => BudgetChange::Updated(Budget {
            amount,
            ..existing.clone()
        }),
        None => BudgetChange::Created(Budget {
            id: new_id(),
            category_id: category_id.to_string(),
            amount,
        }),
    })
}
