// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info};

use crate::budget::BudgetChange;
use crate::config::Config;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{Budget, Category, DEFAULT_CATEGORIES, Expense, Income, Loan, new_id};

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    let path = cfg.db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    let seeded = seed_default_categories(&mut conn)?;
    if !seeded.is_empty() {
        info!(count = seeded.len(), path = %path.display(), "seeded default categories");
    }
    Ok(conn)
}

/// Schema only, no seeding. Used for scratch connections.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id TEXT NOT NULL,
        date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS incomes(
        id TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS budgets(
        id TEXT PRIMARY KEY,
        category_id TEXT NOT NULL UNIQUE,
        amount TEXT NOT NULL
    );

    -- current_balance is NULL only for rows that predate balance tracking
    CREATE TABLE IF NOT EXISTS loans(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        lender TEXT NOT NULL,
        initial_amount TEXT NOT NULL,
        current_balance TEXT,
        date TEXT NOT NULL
    );
    "#,
    )
}

/// Creates the default categories when the profile has none yet.
pub fn seed_default_categories(conn: &mut Connection) -> LedgerResult<Vec<Category>> {
    let tx = conn.transaction()?;
    let count: i64 = tx.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(DEFAULT_CATEGORIES.len());
    for name in DEFAULT_CATEGORIES {
        let c = Category {
            id: new_id(),
            name: name.to_string(),
        };
        tx.execute(
            "INSERT INTO categories(id, name) VALUES (?1, ?2)",
            params![c.id, c.name],
        )?;
        out.push(c);
    }
    tx.commit()?;
    Ok(out)
}

fn decimal(table: &'static str, column: &'static str, raw: String) -> LedgerResult<Decimal> {
    raw.parse::<Decimal>().map_err(|_| LedgerError::Corrupt {
        table,
        column,
        value: raw,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

pub fn load_ledger(conn: &Connection) -> LedgerResult<Ledger> {
    Ok(Ledger {
        categories: load_categories(conn)?,
        expenses: load_expenses(conn)?,
        incomes: load_incomes(conn)?,
        budgets: load_budgets(conn)?,
        loans: load_loans(conn)?,
    })
}

pub fn load_categories(conn: &Connection) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY rowid")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn load_expenses(conn: &Connection) -> LedgerResult<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, category_id, date FROM expenses
         ORDER BY date DESC, rowid DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(Expense {
            id: r.get(0)?,
            description: r.get(1)?,
            amount: decimal("expenses", "amount", r.get(2)?)?,
            category_id: r.get(3)?,
            date: r.get(4)?,
        });
    }
    Ok(out)
}

pub fn load_incomes(conn: &Connection) -> LedgerResult<Vec<Income>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, date FROM incomes ORDER BY date DESC, rowid DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(Income {
            id: r.get(0)?,
            description: r.get(1)?,
            amount: decimal("incomes", "amount", r.get(2)?)?,
            date: r.get(3)?,
        });
    }
    Ok(out)
}

pub fn load_budgets(conn: &Connection) -> LedgerResult<Vec<Budget>> {
    let mut stmt = conn.prepare("SELECT id, category_id, amount FROM budgets ORDER BY rowid")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(Budget {
            id: r.get(0)?,
            category_id: r.get(1)?,
            amount: decimal("budgets", "amount", r.get(2)?)?,
        });
    }
    Ok(out)
}

pub fn load_loans(conn: &Connection) -> LedgerResult<Vec<Loan>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, lender, initial_amount, current_balance, date FROM loans
         ORDER BY date DESC, rowid DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let current: Option<String> = r.get(4)?;
        out.push(Loan {
            id: r.get(0)?,
            name: r.get(1)?,
            lender: r.get(2)?,
            initial_amount: decimal("loans", "initial_amount", r.get(3)?)?,
            current_balance: current
                .map(|s| decimal("loans", "current_balance", s))
                .transpose()?,
            date: r.get(5)?,
        });
    }
    Ok(out)
}

pub fn insert_category(conn: &Connection, category: &Category) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO categories(id, name) VALUES (?1, ?2)",
        params![category.id, category.name],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            LedgerError::Duplicate {
                entity: "Category",
                key: category.name.clone(),
            }
        } else {
            e.into()
        }
    })?;
    debug!(id = %category.id, name = %category.name, "inserted category");
    Ok(())
}

/// Returns the category named `name`, creating it if missing. The flag is
/// true when this call created it.
pub fn resolve_or_create_category(conn: &Connection, name: &str) -> LedgerResult<(Category, bool)> {
    let created = conn.execute(
        "INSERT OR IGNORE INTO categories(id, name) VALUES (?1, ?2)",
        params![new_id(), name],
    )? == 1;
    let id: String = conn.query_row(
        "SELECT id FROM categories WHERE name=?1",
        params![name],
        |r| r.get(0),
    )?;
    if created {
        debug!(%id, name, "created category on demand");
    }
    Ok((
        Category {
            id,
            name: name.to_string(),
        },
        created,
    ))
}

pub fn insert_expense(conn: &Connection, e: &Expense) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO expenses(id, description, amount, category_id, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![e.id, e.description, e.amount.to_string(), e.category_id, e.date],
    )?;
    debug!(id = %e.id, amount = %e.amount, "inserted expense");
    Ok(())
}

pub fn insert_income(conn: &Connection, i: &Income) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO incomes(id, description, amount, date) VALUES (?1, ?2, ?3, ?4)",
        params![i.id, i.description, i.amount.to_string(), i.date],
    )?;
    debug!(id = %i.id, amount = %i.amount, "inserted income");
    Ok(())
}

pub fn insert_loan(conn: &Connection, l: &Loan) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO loans(id, name, lender, initial_amount, current_balance, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            l.id,
            l.name,
            l.lender,
            l.initial_amount.to_string(),
            l.current_balance.map(|d| d.to_string()),
            l.date
        ],
    )?;
    debug!(id = %l.id, name = %l.name, "inserted loan");
    Ok(())
}

pub fn save_budget(conn: &Connection, change: &BudgetChange) -> LedgerResult<()> {
    match change {
        BudgetChange::Updated(b) => {
            let n = conn.execute(
                "UPDATE budgets SET amount=?1 WHERE id=?2",
                params![b.amount.to_string(), b.id],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("Budget", b.id.clone()));
            }
        }
        BudgetChange::Created(b) => {
            conn.execute(
                "INSERT INTO budgets(id, category_id, amount) VALUES (?1, ?2, ?3)
                 ON CONFLICT(category_id) DO UPDATE SET amount=excluded.amount",
                params![b.id, b.category_id, b.amount.to_string()],
            )?;
        }
    }
    debug!(category_id = %change.budget().category_id, amount = %change.budget().amount, "saved budget");
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> LedgerResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
