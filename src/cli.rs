use std::io::{self, Write};

use tracing::warn;

use crate::catalog::{normalize_catalog, CatalogView};
use crate::config::AppConfig;
use crate::report::{render_table, status_notice, view_json, write_csv};
use crate::server;
use crate::source::{read_catalog_file, CatalogSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Fetch,
    Open,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("fetch") => Some(Command::Fetch),
        Some("open") => Some(Command::Open),
        Some("summary") => Some(Command::Summary),
        _ => None,
    }
}

/// `--json` / `--csv` anywhere after the command; the last one wins.
pub fn parse_output_format(args: &[String]) -> OutputFormat {
    args.iter()
        .skip(2)
        .filter_map(|arg| match arg.as_str() {
            "--json" => Some(OutputFormat::Json),
            "--csv" => Some(OutputFormat::Csv),
            "--table" => Some(OutputFormat::Table),
            _ => None,
        })
        .last()
        .unwrap_or(OutputFormat::Table)
}

fn positional(args: &[String]) -> Option<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .find(|arg| !arg.starts_with("--"))
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("usage: metaview <serve|fetch|open|summary>");
        return 2;
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return 2;
        }
    };

    match command {
        Command::Serve => handle_serve(&config),
        Command::Fetch => handle_fetch(args, &config),
        Command::Open => handle_open(args),
        Command::Summary => handle_summary(args, &config),
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_fetch(args: &[String], config: &AppConfig) -> i32 {
    let url = positional(args).unwrap_or(config.default_url.as_str());
    let source = CatalogSource::Url(url.to_string());
    match source.load(&config.source) {
        Ok(catalog) => emit_view(&normalize_catalog(&catalog), parse_output_format(args)),
        Err(err) => {
            eprintln!("load failed: {err}");
            1
        }
    }
}

fn handle_open(args: &[String]) -> i32 {
    let Some(path) = positional(args) else {
        eprintln!("usage: metaview open <path-to-data.json> [--json|--csv]");
        return 2;
    };

    match read_catalog_file(path) {
        Ok(catalog) => emit_view(&normalize_catalog(&catalog), parse_output_format(args)),
        Err(err) => {
            eprintln!("load failed: {err}");
            1
        }
    }
}

fn handle_summary(args: &[String], config: &AppConfig) -> i32 {
    let Some(target) = positional(args) else {
        eprintln!("usage: metaview summary <path-or-url>");
        return 2;
    };

    match CatalogSource::detect(target).load(&config.source) {
        Ok(catalog) => {
            println!("{}", status_notice(&normalize_catalog(&catalog)));
            0
        }
        Err(err) => {
            eprintln!("load failed: {err}");
            1
        }
    }
}

fn emit_view(view: &CatalogView, format: OutputFormat) -> i32 {
    let result = match format {
        OutputFormat::Json => view_json(view).map(|payload| println!("{payload}")),
        OutputFormat::Csv => write_csv(view, io::stdout().lock()),
        OutputFormat::Table => {
            let notice = status_notice(view);
            if view.status().is_warning() {
                warn!(status = %view.status(), "catalog loaded with warnings");
                eprintln!("warning: {notice}");
            } else {
                println!("{notice}");
            }
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(render_table(view).as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(Into::into)
        }
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("output failed: {err}");
            1
        }
    }
}
