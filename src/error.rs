// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of ledger operations. None of them leave partial writes behind.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// User input rejected before touching any state.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Invalid amount: balance cannot be negative ({balance} - {amount})")]
    NegativeBalance { balance: Decimal, amount: Decimal },
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} '{key}' is ambiguous; use its id instead")]
    Ambiguous { entity: &'static str, key: String },
    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },
    #[error("Invalid stored value '{value}' in {table}.{column}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    #[error("Storage error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity,
            key: key.into(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
