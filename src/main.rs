//! suds - allowlist HTML sanitizer

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;

use suds::{Policy, Result, sanitize, text_to_html};

#[derive(Parser)]
#[command(name = "suds")]
#[command(version, about = "Allowlist HTML sanitizer", long_about = None)]
#[command(after_help = "EXAMPLES:
    suds pasted.html                Sanitize a fragment to stdout
    suds pasted.html -o clean.html  Sanitize to a file
    pbpaste | suds                  Sanitize stdin
    suds notes.txt --text           Escape plain text into markup")]
struct Cli {
    /// Input file (reads stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output file (writes stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Extra tag names to allow, besides the defaults
    #[arg(long = "allow-tag", value_name = "TAG")]
    allow_tags: Vec<String>,

    /// Extra attribute names to allow
    #[arg(long = "allow-attribute", value_name = "NAME")]
    allow_attributes: Vec<String>,

    /// Extra style property names to allow
    #[arg(long = "allow-style", value_name = "PROPERTY")]
    allow_styles: Vec<String>,

    /// Treat input as plain text: escape it and map newlines to <br>
    #[arg(short, long)]
    text: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_input(cli.input.as_deref())?;

    let cleaned = if cli.text {
        text_to_html(&input)
    } else {
        let policy = Policy::default()
            .with_tags(&cli.allow_tags)
            .with_attributes(&cli.allow_attributes)
            .with_style_properties(&cli.allow_styles);
        sanitize(&input, &policy)
    };

    match &cli.output {
        Some(path) => std::fs::write(path, cleaned)?,
        None => println!("{cleaned}"),
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}
