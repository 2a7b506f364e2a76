use clap::{App, Arg, ArgMatches};
use colored::{Color, Colorize};
use roundtrip::{
    destination, write_discards, write_table, Config, Input, OutputFormat, Processor,
    ProgressBar, Resolver, Result, RoundtripError,
};
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn create_clap_app(version: &str) -> clap::App<'_, '_> {
    App::new("roundtrip")
        .version(version)
        .about("Checks that forward and reverse DNS agree for every host or address in a CSV file")
        .usage("roundtrip [--out=out.csv] [file.csv]")
        .arg(
            Arg::with_name("input-file")
                .help("CSV file to read, stdin if missing or '-'")
                .index(1),
        )
        .arg(
            Arg::with_name("column")
                .help("Look for addresses or hostnames in this column, by number or header name")
                .long("column")
                .default_value("1")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("out")
                .help("Send output to this file instead of stdout")
                .short("o")
                .long("out")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("discards")
                .help("Write input rows that are neither an address nor a hostname to this csv file")
                .long("discards")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .help("roundtrip -f json hosts.csv")
                .short("f")
                .long("format")
                .possible_values(&["csv", "json"])
                .default_value("csv")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("concurrency")
                .help("Rows to resolve at once. Output keeps the input order.")
                .short("c")
                .long("concurrency")
                .default_value("1")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbosity")
                .help("roundtrip hosts.csv -v roundtrip=debug")
                .short("v")
                .long("verbosity")
                .takes_value(true),
        )
}

fn config(matches: &ArgMatches) -> Result<Config> {
    Ok(Config {
        input: matches.value_of("input-file").map(PathBuf::from),
        output: matches.value_of("out").map(PathBuf::from),
        discards: matches.value_of("discards").map(PathBuf::from),
        column: matches.value_of("column").unwrap_or("1").to_string(),
        format: matches.value_of("format").unwrap_or("csv").parse::<OutputFormat>()?,
        concurrency: matches.value_of("concurrency").unwrap_or("1").parse()?,
    })
}

fn use_color() -> bool {
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stderr().is_terminal()
}

fn status(color: Color, msg: String) {
    eprintln!("{}", msg.color(color));
}

fn init_logging(matches: &ArgMatches) -> Result<()> {
    let filter = match matches.value_of("verbosity") {
        Some(directives) => EnvFilter::new(directives),
        None if env::var_os("RUST_LOG").is_some() => EnvFilter::from_default_env(),
        None => return Ok(()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| RoundtripError::Logging(e.to_string()))
}

async fn run(config: Config) -> Result<()> {
    let input = Input::open(config.input.as_deref())?;
    status(
        Color::Green,
        format!("Read {} lines from {}", input.lines(), input.source()),
    );

    let column = input.column(&config.column)?;
    status(
        Color::Green,
        format!(
            "using column {} ({}) as input column",
            column + 1,
            input.header()[column]
        ),
    );

    let processor = Processor::new(Resolver::system()?).concurrency(config.concurrency);
    let mut progress = ProgressBar::stderr();
    let report = processor.run(input, column, &mut progress).await;

    let out = destination(config.output_path())?;
    write_table(out, config.format, &report.header, &report.rows)?;
    status(
        Color::Green,
        format!(
            "{} lines written to {} ({} round trips ok)",
            report.rows.len() + 1,
            config.output_name(),
            report.consistent()
        ),
    );

    if !report.discards.is_empty() {
        match &config.discards {
            None => status(
                Color::Yellow,
                format!(
                    "{} rows discarded (use --discards to see them)",
                    report.discards.len()
                ),
            ),
            Some(path) => {
                write_discards(path, &report.input_header, &report.discards)?;
                status(
                    Color::Yellow,
                    format!(
                        "{} discarded rows written to {}",
                        report.discards.len(),
                        path.display()
                    ),
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = create_clap_app(env!("CARGO_PKG_VERSION"));
    let matches = args.get_matches();
    colored::control::set_override(use_color());

    let result = match init_logging(&matches).and_then(|_| config(&matches)) {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        status(Color::Red, format!("ERROR: {}", e));
        process::exit(1);
    }
}
