mod cli;
mod cmd;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use std::process;

use nutrilog::error;
use nutrilog::output;

fn init_logging() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "nutrilog=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries the JSON envelope; logs go to stderr.
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let (name, result) = match cli.command {
        Commands::Init { skip } => ("init", cmd::init::run(skip)),
        Commands::Add {
            slot,
            code,
            name,
            brand,
            calories,
            protein,
            carbs,
            fat,
            fiber,
            grams,
        } => {
            let food = match code {
                Some(code) => cmd::add::FoodInput::Barcode(code),
                None => cmd::add::FoodInput::Manual {
                    name: name.unwrap_or_default(),
                    brand,
                    calories: calories.unwrap_or_default(),
                    protein: protein.unwrap_or_default(),
                    carbs: carbs.unwrap_or_default(),
                    fat: fat.unwrap_or_default(),
                    fiber: fiber.unwrap_or_default(),
                },
            };
            (
                "add",
                cmd::add::run(slot, food, &grams, cli.date, cli.human).await,
            )
        }
        Commands::Search { query, limit } => {
            ("search", cmd::search::run(&query, limit, cli.human).await)
        }
        Commands::Show => ("show", cmd::show::run(cli.date, cli.human).await),
        Commands::Edit { slot, index, grams } => (
            "edit",
            cmd::edit::run_edit(slot, index, &grams, cli.date, cli.human).await,
        ),
        Commands::Remove { slot, index } => (
            "remove",
            cmd::edit::run_remove(slot, index, cli.date, cli.human).await,
        ),
        Commands::Month { month } => (
            "month",
            cmd::month::run(month.as_deref(), cli.date, cli.human),
        ),
        Commands::Energy => ("energy", cmd::energy::run(cli.date, cli.human)),
        Commands::Backfill => ("backfill", cmd::backfill::run(cli.date, cli.human).await),
        Commands::Config { action } => (
            "config",
            match action {
                ConfigAction::Show => cmd::config::run_show(cli.human),
                ConfigAction::Set { key, value } => cmd::config::run_set(&key, &value),
            },
        ),
        Commands::Completions { shell } => ("completions", cmd::completions::run(shell)),
    };

    if let Err(e) = result {
        let err = output::error(name, error::error_code(&e), &format!("{:#}", e));
        eprintln!("{}", err);
        process::exit(1);
    }
}
