// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{CURRENCIES, get_currency, set_currency};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let current = get_currency(conn)?;
            let data = CURRENCIES
                .iter()
                .map(|c| {
                    let mark = if c.code == current.code { "*" } else { "" };
                    vec![
                        c.code.to_string(),
                        c.symbol.to_string(),
                        c.name.to_string(),
                        mark.to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Code", "Symbol", "Name", "Selected"], data)
            );
        }
        Some(("show", _)) => {
            let c = get_currency(conn)?;
            println!("{} ({}) {}", c.name, c.code, c.symbol);
        }
        Some(("set", sub)) => {
            let c = set_currency(conn, sub.get_one::<String>("code").unwrap())?;
            println!("Display currency set to {} ({})", c.name, c.code);
        }
        _ => {}
    }
    Ok(())
}
