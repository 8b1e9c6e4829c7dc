use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use hmdb_rdf::app::Converter;
use hmdb_rdf::config::{ConfigLoader, ConfigOverrides};
use hmdb_rdf::error::HmdbError;
use hmdb_rdf::fs_util;
use hmdb_rdf::output::{JsonOutput, LogProgress};

#[derive(Parser)]
#[command(name = "hmdb-rdf")]
#[command(about = "Convert HMDB metabolite XML into Turtle")]
#[command(version, author)]
struct Cli {
    #[arg(short, long, help = "Path to an HMDB metabolite XML file (.xml, .gz or .zip)")]
    input: Option<Utf8PathBuf>,

    #[arg(short, long, help = "Path to a ChemOnt OBO file")]
    chemont: Option<Utf8PathBuf>,

    #[arg(short, long, help = "Write Turtle here instead of stdout")]
    output: Option<Utf8PathBuf>,

    #[arg(long, help = "JSON config file")]
    config: Option<String>,

    #[arg(long, help = "Omit rdfs:subClassOf ont:root for top-level terms")]
    no_root_links: bool,

    #[arg(long, help = "Print a JSON run summary on stderr")]
    summary: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<HmdbError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HmdbError) -> u8 {
    match error {
        HmdbError::MissingInput(_) | HmdbError::ConfigRead(_) | HmdbError::ConfigParse(_) => 2,
        HmdbError::MissingField { .. }
        | HmdbError::InvalidAccession(_)
        | HmdbError::XmlParse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        input: cli.input,
        chemont: cli.chemont,
        output: cli.output,
        no_root_links: cli.no_root_links,
    };
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;

    let converter = Converter::from_config(&config)?;
    let xml = fs_util::read_document(&config.input)?;

    let summary = match &config.output {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            converter.convert_to_turtle(&xml, BufWriter::new(file), &LogProgress)?
        }
        None => {
            let stdout = BufWriter::new(io::stdout().lock());
            converter.convert_to_turtle(&xml, stdout, &LogProgress)?
        }
    };

    if cli.summary {
        JsonOutput::print_summary(&summary).into_diagnostic()?;
    }
    Ok(())
}
