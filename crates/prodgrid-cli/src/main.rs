// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use prodgrid_app::ViewState;
use prodgrid_data::Catalog;
use runtime::{CatalogRuntime, CatalogSource};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    let stdout = io::stdout();
    let Some(startup) = prepare(&options, &mut stdout.lock())? else {
        return Ok(());
    };

    let mut state = ViewState::new(startup.config.initial_paging());
    let mut runtime = CatalogRuntime::with_catalog(startup.source, startup.catalog);
    prodgrid_tui::run_app(&mut state, &mut runtime)
}

/// What the UI starts from once config and catalog have been loaded.
struct Startup {
    config: Config,
    source: CatalogSource,
    catalog: Catalog,
}

/// Handles the flags that print and exit. Returns `None` when there is
/// nothing left to run.
fn prepare(options: &CliOptions, out: &mut impl Write) -> Result<Option<Startup>> {
    if options.show_help {
        print_help(out)?;
        return Ok(None);
    }

    if options.print_config_path {
        writeln!(out, "{}", options.config_path.display())?;
        return Ok(None);
    }

    if options.print_example {
        write!(out, "{}", Config::example_config(&options.config_path))?;
        return Ok(None);
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `prodgrid --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(&config, &options.config_path)?;

    let source = config.catalog_source();
    let catalog = source.load()?;
    if options.check_only {
        writeln!(
            out,
            "ok: {} categories, {} products",
            catalog.categories().len(),
            catalog.products().len()
        )?;
        return Ok(None);
    }

    Ok(Some(Startup {
        config,
        source,
        catalog,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
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
            "--print-example-config" => {
                options.print_example = true;
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

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "prodgrid: browse products by category")?;
    writeln!(out, "  --config <path>          Use a specific config path")?;
    writeln!(out, "  --print-config-path      Print resolved config path")?;
    writeln!(out, "  --print-example-config   Print a config template")?;
    writeln!(out, "  --check                  Validate config + catalog, then exit")?;
    writeln!(out, "  --help                   Show this help")
}
