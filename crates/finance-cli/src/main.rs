// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod presenter;

use anyhow::{Context, Result};
use config::Config;
use finance_core::{Controller, EventProcessor};
use finance_db::Store;
use finance_testkit::LedgerFaker;
use presenter::JsonLinesPresenter;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_SEED: u64 = 2024;
const DEMO_ENTRIES: usize = 12;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `finance-analyzer --print-example-config` for a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    init_logging(config.log_filter())?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or {}",
            db_path.display(),
            finance_db::DB_PATH_ENV
        )
    })?;
    if options.demo {
        seed_demo_ledger(&store)?;
    }
    if options.check_only {
        let status = store.ensure_schema()?;
        info!(?status, path = %db_path.display(), "database ok");
        return store.close();
    }

    let processor = EventProcessor::new(store);
    let presenter = JsonLinesPresenter::new(io::stdin().lock(), io::stdout().lock());
    Controller::new(processor, presenter).run()?;
    Ok(())
}

// Logs go to stderr; stdout carries the reply stream.
fn init_logging(config_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config_filter)
            .with_context(|| format!("invalid log filter {config_filter:?}"))?,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .context("install log subscriber")
}

fn seed_demo_ledger(store: &Store) -> Result<()> {
    store.ensure_schema()?;
    let entries = LedgerFaker::new(DEMO_SEED).entries(DEMO_ENTRIES);
    store.in_transaction(|store| {
        for entry in &entries {
            store.update_ledger_row(entry)?;
        }
        Ok(())
    })?;
    info!(entries = entries.len(), "seeded demo ledger");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("finance-analyzer");
    println!("  Reads one JSON event per line on stdin, writes one JSON reply per line on stdout.");
    println!();
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Start with demo ledger entries (in-memory)");
    println!("  --check                  Open the database, create tables if needed, and exit");
    println!("  --help                   Show this help");
}
