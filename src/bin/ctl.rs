use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;

use transit_catalogue::io::{Envelope, StatResponse};
use transit_catalogue::orchestrator::Orchestrator;

/// Runs a single ingest-then-query session: reads a JSON envelope,
/// builds the catalogue, answers every stat request, writes the JSON
/// response array back out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input envelope path, or omit/`-` for stdin.
    #[arg(long)]
    input: Option<String>,

    /// Output response path, or omit for stdout.
    #[arg(long)]
    output: Option<String>,
}

fn main() -> transit_catalogue::error::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = read_input(args.input.as_deref()).unwrap_or_else(|err| {
        eprintln!("failed to read input: {err}");
        std::process::exit(1);
    });

    let mut envelope: Envelope = serde_json::from_str(&input).unwrap_or_else(|err| {
        eprintln!("malformed request envelope: {err}");
        std::process::exit(1);
    });
    let stat_requests = std::mem::take(&mut envelope.stat_requests);

    let orchestrator = Orchestrator::build(envelope)?;
    log::debug!("answering {} stat requests", stat_requests.len());

    let responses: Vec<StatResponse> = stat_requests
        .into_iter()
        .map(|request| orchestrator.handle(request))
        .collect();

    let output = serde_json::to_string_pretty(&responses).expect("responses are always valid JSON");
    write_output(args.output.as_deref(), &output).unwrap_or_else(|err| {
        eprintln!("failed to write output: {err}");
        std::process::exit(1);
    });

    Ok(())
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path),
    }
}

fn write_output(path: Option<&str>, contents: &str) -> io::Result<()> {
    match path {
        None => {
            io::stdout().write_all(contents.as_bytes())?;
            io::stdout().write_all(b"\n")
        }
        Some(path) => fs::write(path, contents),
    }
}
