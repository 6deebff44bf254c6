use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use roster_core::core_api::{Engine, Session};
use roster_core::language::Language;
use roster_render::{
    TextRenderOptions, render_factions_text, render_incidents_text, render_json_faction,
    render_json_full, render_json_unit, render_unit_text,
};
use serde_json::Value as JsonValue;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Feed snapshot (JSON, optionally gzip-compressed).
    #[arg(value_name = "FEED")]
    path: PathBuf,
    #[arg(long = "lang", value_name = "es|en|fr|1|2|3", value_parser = parse_language)]
    language: Option<Language>,
    #[arg(long)]
    json: bool,
    #[arg(long = "unit", value_name = "ID", conflicts_with = "faction")]
    unit: Option<i32>,
    #[arg(long = "faction", value_name = "ID")]
    faction: Option<u8>,
    #[arg(long, conflicts_with_all = ["unit", "faction"])]
    incidents: bool,
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = TextRenderOptions {
        verbose: cli.verbose,
    };

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new();
    let session = engine.open_bytes(&bytes, cli.language).unwrap_or_else(|e| {
        eprintln!("Error decoding feed snapshot: {}", cli.path.display());
        eprintln!("  {}", e);
        process::exit(2);
    });
    tracing::info!(
        target: "roster_cli",
        language = %session.language(),
        units = session.summary().units,
        incidents = session.incidents().len(),
        "feed.opened"
    );

    if cli.incidents {
        if cli.json {
            print_json(&render_json_full(&session)["incidents"]);
        } else {
            print!("{}", render_incidents_text(session.incidents()));
        }
        return;
    }

    if let Some(id) = cli.unit {
        let (_, unit) = session.unit(id).unwrap_or_else(|e| exit_selection(e));
        if cli.json {
            print_json(&render_json_unit(unit));
        } else {
            print!("{}", render_unit_text(unit, options));
        }
        return;
    }

    if let Some(id) = cli.faction {
        let faction = session.faction(id).unwrap_or_else(|e| exit_selection(e));
        if cli.json {
            print_json(&render_json_faction(faction));
        } else {
            print!(
                "{}",
                render_factions_text(std::slice::from_ref(faction), options)
            );
        }
        return;
    }

    if cli.json {
        print_json(&render_json_full(&session));
        return;
    }

    print_outline(&session, options);
}

fn print_outline(session: &Session, options: TextRenderOptions) {
    let summary = session.summary();
    println!(
        "{} roster: {} factions, {} sectors, {} units, {} loadouts",
        session.language(),
        summary.factions,
        summary.sectors,
        summary.units,
        summary.loadouts
    );
    let incidents = summary.incidents.malformed_records + summary.incidents.name_mismatches;
    if incidents > 0 {
        println!("{incidents} incidents (see --incidents)");
    }
    println!();
    print!("{}", render_factions_text(session.factions(), options));
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn exit_selection(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    process::exit(2);
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::parse(value).ok_or_else(|| {
        format!("invalid language '{value}', expected one of: es, en, fr, 1, 2, 3")
    })
}
