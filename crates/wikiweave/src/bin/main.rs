//! Wikiweave CLI

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use wikiweave::{ParserBuilder, ParserProfile};

/// Convert wiki markup to an HTML fragment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Wiki source file; stdin when absent or `-`
    input: Option<PathBuf>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Option profile (full, post, comments, simple-comments)
    #[arg(short, long, default_value = "full", env = "WIKIWEAVE_PROFILE")]
    profile: ParserProfile,

    /// YAML or JSON option file applied over the profile
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override one option, e.g. `--set active_auto_br=true`
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Extra `TERM : Expansion` acronym file
    #[arg(short, long = "acronyms", value_name = "FILE")]
    acronyms: Vec<PathBuf>,

    /// Print the effective options as JSON and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    print_options: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn builder(args: &Args) -> Result<ParserBuilder> {
    let mut builder = ParserBuilder::new(args.profile);
    if let Some(config) = &args.config {
        builder = builder.config_file(config);
    }
    for pair in &args.set {
        builder = builder
            .set_pair(pair)
            .with_context(|| format!("Invalid --set {}", pair))?;
    }
    for path in &args.acronyms {
        builder = builder.acronyms_file(path);
    }
    Ok(builder)
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_output(output: Option<&PathBuf>, html: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{}\n", html))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", html).context("Failed to write stdout")
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let builder = builder(&args)?;
    if args.print_options {
        let options = builder.options().context("Invalid options")?;
        let json = serde_json::to_string_pretty(&options)?;
        return write_output(args.output.as_ref(), &json);
    }

    let parser = builder.build().context("Failed to configure parser")?;
    log::info!("Wikiweave v{} ({} profile)", env!("CARGO_PKG_VERSION"), args.profile.name());

    let text = read_input(args.input.as_ref())?;
    let html = parser.transform(&text);
    write_output(args.output.as_ref(), &html)
}
