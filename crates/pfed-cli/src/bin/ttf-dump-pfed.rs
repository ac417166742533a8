//! Dump a font's PfEd table as JSON
use clap::Parser;
use pfed_cli::{load_pfed, read_input, Dump};
use std::process;

/// Dump a font's PfEd table as JSON
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase logging
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,

    /// Input is a bare PfEd table rather than a font file
    #[clap(long)]
    raw: bool,

    /// Pretty-print the JSON output
    #[clap(short, long)]
    pretty: bool,

    /// Input file (defaults to standard input)
    input: Option<String>,
}

fn main() {
    let args = Args::parse();

    env_logger::init_from_env(env_logger::Env::default().filter_or(
        env_logger::DEFAULT_FILTER_ENV,
        match args.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        },
    ));

    let pfed = match read_input(args.input.as_deref()).and_then(|data| load_pfed(&data, args.raw))
    {
        Ok(pfed) => pfed,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };
    let dump = Dump::from(&pfed);
    let json = if args.pretty {
        serde_json::to_string_pretty(&dump)
    } else {
        serde_json::to_string(&dump)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Could not serialize PfEd table: {}", e);
            process::exit(1);
        }
    }
}
