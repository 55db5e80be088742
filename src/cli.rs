// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn amount_arg(help: &'static str) -> Arg {
    Arg::new("amount")
        .long("amount")
        .short('a')
        .required(true)
        .allow_hyphen_values(true)
        .help(help)
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .short('d')
        .help("YYYY-MM-DD (defaults to today)")
}

pub fn build_cli() -> Command {
    command!()
        .name("claritybudget")
        .about("Track expenses, income, budgets and loans; get AI saving tips")
        .arg(
            Arg::new("profile")
                .long("profile")
                .short('p')
                .global(true)
                .help("Profile name (one database per profile)"),
        )
        .subcommand(Command::new("init").about("Create the profile database"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("list").about("List categories").args(json_args())),
        )
        .subcommand(
            Command::new("expense")
                .about("Log and list expenses")
                .subcommand(
                    Command::new("add")
                        .about("Log an expense")
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('m')
                                .required(true),
                        )
                        .arg(amount_arg("Positive amount"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .required_unless_present("auto")
                                .help("Category name"),
                        )
                        .arg(
                            Arg::new("auto")
                                .long("auto")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category")
                                .help("Let the AI pick the category"),
                        )
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List expenses, newest first")
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Log and list income")
                .subcommand(
                    Command::new("add")
                        .about("Log income")
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('m')
                                .required(true),
                        )
                        .arg(amount_arg("Positive amount"))
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List income, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Per-category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Set (or replace) the budget of a category")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .required(true),
                        )
                        .arg(amount_arg("Positive budget amount")),
                )
                .subcommand(
                    Command::new("list")
                        .about("Budgets with spending progress")
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("loan")
                .about("Loans and repayments")
                .subcommand(
                    Command::new("add")
                        .about("Record a loan")
                        .arg(Arg::new("name").long("name").short('n').required(true))
                        .arg(
                            Arg::new("lender")
                                .long("lender")
                                .short('l')
                                .required(true),
                        )
                        .arg(amount_arg("Initial amount"))
                        .arg(date_arg()),
                )
                .subcommand(Command::new("list").about("List loans").args(json_args()))
                .subcommand(
                    Command::new("update")
                        .about("Borrow more (increase) or repay (decrease)")
                        .arg(
                            Arg::new("loan")
                                .long("loan")
                                .required(true)
                                .help("Loan id or unique name"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .value_parser(["increase", "decrease"])
                                .default_value("decrease"),
                        )
                        .arg(amount_arg("Transaction amount")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand(
                    Command::new("summary")
                        .about("Income, spending, balance and loans")
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("spending")
                        .about("Spending by category")
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("budgets")
                        .about("Budget progress")
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("ai")
                .about("AI helpers")
                .subcommand(
                    Command::new("categorize")
                        .about("Suggest a category for a description")
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('m')
                                .required(true),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("tips").about("Personalised saving tips")),
        )
        .subcommand(
            Command::new("currency")
                .about("Display currency")
                .subcommand(Command::new("list").about("Supported currencies"))
                .subcommand(Command::new("show").about("Current display currency"))
                .subcommand(
                    Command::new("set")
                        .about("Choose the display currency")
                        .arg(Arg::new("code").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Report dangling category references"))
}
