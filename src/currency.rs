// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::db::{get_setting, set_setting};
use crate::error::{LedgerError, LedgerResult};

const SETTING_KEY: &str = "currency";

/// Display currency. Affects formatting only, never amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: [Currency; 8] = [
    Currency { code: "USD", symbol: "$", name: "US Dollar" },
    Currency { code: "EUR", symbol: "€", name: "Euro" },
    Currency { code: "GBP", symbol: "£", name: "British Pound" },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee" },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar" },
    Currency { code: "CHF", symbol: "CHF ", name: "Swiss Franc" },
];

impl Currency {
    pub fn find(code: &str) -> Option<Currency> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .copied()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{}", self.symbol, format_amount(amount))
    }
}

/// Two decimal places, half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

impl Default for Currency {
    fn default() -> Self {
        CURRENCIES[0]
    }
}

/// Stored preference, or the default when unset or no longer recognised.
pub fn get_currency(conn: &Connection) -> LedgerResult<Currency> {
    Ok(get_setting(conn, SETTING_KEY)?
        .and_then(|code| Currency::find(&code))
        .unwrap_or_default())
}

pub fn set_currency(conn: &Connection, code: &str) -> LedgerResult<Currency> {
    let ccy = Currency::find(code).ok_or_else(|| {
        LedgerError::validation(
            "currency",
            format!(
                "Unsupported currency '{}' (one of {})",
                code.trim(),
                CURRENCIES.map(|c| c.code).join(", ")
            ),
        )
    })?;
    set_setting(conn, SETTING_KEY, ccy.code)?;
    Ok(ccy)
}
