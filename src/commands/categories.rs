// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{insert_category, load_categories};
use crate::models::{LOAN_REPAYMENT_CATEGORY, new_category};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let category = new_category(name)?;
            insert_category(conn, &category)?;
            info!(id = %category.id, name = %category.name, "category added");
            println!("Added category '{}'", category.name);
        }
        Some(("list", sub)) => {
            let cats = load_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| {
                        let kind = if c.name == LOAN_REPAYMENT_CATEGORY {
                            "system"
                        } else {
                            "user"
                        };
                        vec![c.name, kind.to_string()]
                    })
                    .collect();
                println!("{}", pretty_table(&["Category", "Kind"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
