use anyhow::Context;
use chemtab::config::Config;
use chemtab::logging;
use chemtab::lookup::LookupIndex;
use chemtab::pipeline::Pipeline;
use chemtab::storage::CsvStorage;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "chemtab")]
#[command(about = "Scrapes the glossary of chemical formulae into a CSV file")]
#[command(version)]
struct Cli {
    /// Config file (defaults to chemtab.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page to scrape
    #[arg(long, global = true)]
    url: Option<String>,

    /// Output file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the page and write the formulae table (default)
    Fetch,
    /// Look up formulae by synonym, reading queries from stdin
    Lookup {
        /// Use the existing output file instead of fetching first
        #[arg(long)]
        no_fetch: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_overrides(cli.url, cli.output);
    config.validate().context("invalid configuration")?;

    let _guard = logging::init_logging(&config.logging);
    debug!(?config, "configuration loaded");

    match cli.command.unwrap_or(Commands::Fetch) {
        Commands::Fetch => {
            fetch(&config)?;
        }
        Commands::Lookup { no_fetch } => {
            if !no_fetch {
                fetch(&config)?;
            }
            let storage = CsvStorage::new(
                config.output.path.clone(),
                config.output.delimiter_byte()?,
            );
            let table = storage
                .read()
                .with_context(|| format!("reading {}", storage.path().display()))?;
            let index = LookupIndex::from_table(&table)?;
            if index.is_empty() {
                warn!(path = %storage.path().display(), "no synonyms to look up");
            }
            let stdin = io::stdin();
            index.run_interactive(stdin.lock(), io::stdout().lock(), config.lookup.limit)?;
        }
    }
    Ok(())
}

fn fetch(config: &Config) -> anyhow::Result<()> {
    let result = Pipeline::run(config)
        .with_context(|| format!("scraping {}", config.source.url))?;
    info!(
        tables_found = result.tables_found,
        tables_kept = result.tables_kept,
        rows = result.rows_written,
        sha256 = %result.sha256,
        "pipeline finished"
    );
    Ok(())
}
